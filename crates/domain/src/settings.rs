//! Settings patches — partial `region → zone → attribute` mutations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RegionsConfig;
use crate::error::{LumenError, NotFoundError};

/// Attributes to change on one zone. Absent (or `null`) attributes are left
/// untouched; `name` is accepted for symmetry with snapshots and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,
}

impl ZoneSettings {
    #[must_use]
    pub fn with_power(mut self, power: bool) -> Self {
        self.power = Some(power);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_brightness(mut self, brightness: i64) -> Self {
        self.brightness = Some(brightness);
        self
    }
}

/// Zone settings keyed by zone id, for one region.
pub type RegionSettings = BTreeMap<String, ZoneSettings>;

/// A full settings patch keyed by region name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsPatch(BTreeMap<String, RegionSettings>);

impl SettingsPatch {
    /// Decode a patch from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::MalformedPayload`] when the value is not a
    /// `region → zone → attributes` object or names an unknown attribute.
    pub fn from_value(value: serde_json::Value) -> Result<Self, LumenError> {
        Ok(serde_json::from_value(value)?)
    }

    /// A patch touching a single region.
    #[must_use]
    pub fn for_region(region: impl Into<String>, settings: RegionSettings) -> Self {
        Self(BTreeMap::from([(region.into(), settings)]))
    }

    /// A patch touching a single zone.
    #[must_use]
    pub fn for_zone(
        region: impl Into<String>,
        zone: impl Into<String>,
        settings: ZoneSettings,
    ) -> Self {
        Self::default().with_zone(region, zone, settings)
    }

    /// Add (or replace) the settings of one zone.
    #[must_use]
    pub fn with_zone(
        mut self,
        region: impl Into<String>,
        zone: impl Into<String>,
        settings: ZoneSettings,
    ) -> Self {
        self.0
            .entry(region.into())
            .or_default()
            .insert(zone.into(), settings);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionSettings)> {
        self.0.iter().map(|(name, zones)| (name.as_str(), zones))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Check that every region and zone of the patch is configured.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for the first unknown region or zone.
    pub fn validate(&self, regions: &RegionsConfig) -> Result<(), NotFoundError> {
        for (region, zones) in &self.0 {
            let config = regions.get(region).ok_or_else(|| NotFoundError {
                entity: "Region",
                id: region.clone(),
            })?;
            if let Some(zone) = zones.keys().find(|zone| !config.zones.contains_key(*zone)) {
                return Err(NotFoundError {
                    entity: "Zone",
                    id: format!("{region}/{zone}"),
                });
            }
        }
        Ok(())
    }
}
