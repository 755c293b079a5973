//! Static region configuration, read once at startup.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::command::ZoneId;
use crate::error::InvalidArgument;

/// Regions keyed by their stable name.
pub type RegionsConfig = BTreeMap<String, RegionConfig>;

/// One physical bridge and the zones it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionConfig {
    /// Driver type, e.g. `"limitlessled-rgbw"`.
    #[serde(rename = "type")]
    pub driver: String,
    /// Bridge host name or IP address.
    #[serde(default)]
    pub host: Option<String>,
    /// Bridge UDP port.
    #[serde(default)]
    pub port: Option<u16>,
    /// Zones keyed by their id as written in the configuration (`"0"`..`"4"`).
    #[serde(default)]
    pub zones: BTreeMap<String, ZoneConfig>,
}

/// Per-zone configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ZoneConfig {
    /// Display name, defaults to the zone key.
    #[serde(default)]
    pub name: Option<String>,
}

/// A configured zone resolved to its bridge address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredZone {
    /// Key as written in the configuration, used in patches and snapshots.
    pub key: String,
    pub id: ZoneId,
    pub name: String,
}

impl RegionConfig {
    /// Resolve every configured zone key to a [`ZoneId`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::Zone`] for the first key that is not `0..=4`.
    pub fn configured_zones(&self) -> Result<Vec<ConfiguredZone>, InvalidArgument> {
        self.zones
            .iter()
            .map(|(key, zone)| {
                Ok(ConfiguredZone {
                    key: key.clone(),
                    id: key.parse()?,
                    name: zone.name.clone().unwrap_or_else(|| key.clone()),
                })
            })
            .collect()
    }
}
