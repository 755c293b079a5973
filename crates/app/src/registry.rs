//! Regions and their lazily created bridge drivers.
//!
//! A region is materialised the first time a request touches it: the
//! [`DriverFactory`] builds its driver and the region starts with every zone
//! unknown. The registry is owned by the command processor and is never
//! shared, so no locking is involved.

use std::collections::BTreeMap;

use lumen_domain::aggregate::BridgeZones;
use lumen_domain::command::{ZoneCommand, ZoneId};
use lumen_domain::config::{ConfiguredZone, RegionConfig, RegionsConfig};
use lumen_domain::error::{LumenError, NotFoundError};
use lumen_domain::settings::{RegionSettings, SettingsPatch};
use lumen_domain::snapshot::{Snapshot, ZoneSnapshot};

use crate::ports::{BridgeDriver, DriverFactory};

/// One bridge, the desired state of its zones and the zones exposed to users.
pub struct Region<D> {
    name: String,
    driver: D,
    zones: BridgeZones,
    configured: Vec<ConfiguredZone>,
}

impl<D: BridgeDriver> Region<D> {
    /// Create a region with every zone in the unknown state.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::InvalidArgument`] when a configured zone key is
    /// not a bridge zone.
    pub fn new(
        name: impl Into<String>,
        driver: D,
        config: &RegionConfig,
    ) -> Result<Self, LumenError> {
        Ok(Self {
            name: name.into(),
            driver,
            zones: BridgeZones::default(),
            configured: config.configured_zones()?,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn zones(&self) -> &BridgeZones {
        &self.zones
    }

    fn resolve(&self, key: &str) -> Result<ZoneId, NotFoundError> {
        self.configured
            .iter()
            .find(|zone| zone.key == key)
            .map(|zone| zone.id)
            .ok_or_else(|| NotFoundError {
                entity: "Zone",
                id: format!("{}/{key}", self.name),
            })
    }

    /// Apply per-zone settings in key order, sending the resulting commands
    /// after each zone is committed.
    ///
    /// # Errors
    ///
    /// Stops at the first unknown zone, rejected value or transport failure.
    /// Zones applied before the failure keep their new state.
    pub async fn apply(&mut self, settings: &RegionSettings) -> Result<(), LumenError> {
        for (key, zone_settings) in settings {
            let zone = self.resolve(key)?;
            let commands = self.zones.apply(zone, zone_settings)?;
            self.transmit(commands).await?;
        }
        Ok(())
    }

    /// Re-send the known state of every zone.
    ///
    /// # Errors
    ///
    /// Returns the first transport failure.
    pub async fn sync(&mut self) -> Result<(), LumenError> {
        let commands = self.zones.sync_commands();
        self.transmit(commands).await
    }

    async fn transmit(&mut self, commands: Vec<ZoneCommand>) -> Result<(), LumenError> {
        for command in commands {
            self.driver.send(command).await?;
        }
        Ok(())
    }

    /// State of every configured zone, keyed as in the configuration.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, ZoneSnapshot> {
        self.configured
            .iter()
            .map(|zone| {
                (
                    zone.key.clone(),
                    ZoneSnapshot::new(&self.zones.state(zone.id), zone.name.clone()),
                )
            })
            .collect()
    }
}

/// Every configured region, created on first use.
pub struct Registry<F: DriverFactory> {
    config: RegionsConfig,
    factory: F,
    regions: BTreeMap<String, Region<F::Driver>>,
}

impl<F: DriverFactory> Registry<F> {
    #[must_use]
    pub fn new(config: RegionsConfig, factory: F) -> Self {
        Self {
            config,
            factory,
            regions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegionsConfig {
        &self.config
    }

    /// Return the region called `name`, creating its driver on first use.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] for an unconfigured region and
    /// whatever the factory reports when the driver can't be built.
    pub async fn find_or_create(
        &mut self,
        name: &str,
    ) -> Result<&mut Region<F::Driver>, LumenError> {
        if !self.regions.contains_key(name) {
            let config = self.config.get(name).ok_or_else(|| NotFoundError {
                entity: "Region",
                id: name.to_string(),
            })?;
            let driver = self.factory.create(name, config).await?;
            let region = Region::new(name, driver, config)?;
            tracing::info!(region = name, driver = %config.driver, "bridge driver created");
            self.regions.insert(name.to_string(), region);
        }
        self.regions.get_mut(name).ok_or_else(|| {
            NotFoundError {
                entity: "Region",
                id: name.to_string(),
            }
            .into()
        })
    }

    /// Apply a patch region by region, in key order.
    ///
    /// # Errors
    ///
    /// Stops at the first failure; earlier regions and zones stay applied.
    pub async fn apply(&mut self, patch: &SettingsPatch) -> Result<(), LumenError> {
        for (name, settings) in patch.iter() {
            self.find_or_create(name).await?.apply(settings).await?;
        }
        Ok(())
    }

    /// Re-send the known state of every configured region.
    ///
    /// A failing region doesn't prevent the others from being synced.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered.
    pub async fn sync(&mut self) -> Result<(), LumenError> {
        let mut first_error = None;
        for name in self.region_names() {
            let result = match self.find_or_create(&name).await {
                Ok(region) => region.sync().await,
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                tracing::warn!(region = %name, error = %err.describe(), "region sync failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Snapshot of every configured region and zone.
    ///
    /// # Errors
    ///
    /// Returns the failure of the first region whose driver can't be built.
    pub async fn snapshot(&mut self) -> Result<Snapshot, LumenError> {
        let mut snapshot = Snapshot::default();
        for name in self.region_names() {
            let zones = self.find_or_create(&name).await?.snapshot();
            snapshot.insert_region(name, zones);
        }
        Ok(snapshot)
    }

    fn region_names(&self) -> Vec<String> {
        self.config.keys().cloned().collect()
    }
}
