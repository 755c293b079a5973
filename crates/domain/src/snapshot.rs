//! Full-state snapshots returned to callers and used as sequence baselines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::settings::{SettingsPatch, ZoneSettings};
use crate::zone::ZoneState;

/// Observable state of one configured zone. `null` means unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub power: Option<bool>,
    pub color: Option<String>,
    pub brightness: Option<u8>,
    pub name: String,
}

impl ZoneSnapshot {
    #[must_use]
    pub fn new(state: &ZoneState, name: impl Into<String>) -> Self {
        Self {
            power: state.power(),
            color: state.color().map(|color| color.to_string()),
            brightness: state.brightness(),
            name: name.into(),
        }
    }

    /// Settings that would restore this snapshot; unknown attributes are left
    /// out since the hardware cannot be made "unknown" again.
    #[must_use]
    pub fn to_settings(&self) -> ZoneSettings {
        ZoneSettings {
            name: None,
            power: self.power,
            color: self.color.clone(),
            brightness: self.brightness.map(i64::from),
        }
    }
}

/// `region → zone → state` for every configured zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, BTreeMap<String, ZoneSnapshot>>);

impl Snapshot {
    pub fn insert_region(
        &mut self,
        region: impl Into<String>,
        zones: BTreeMap<String, ZoneSnapshot>,
    ) {
        self.0.insert(region.into(), zones);
    }

    #[must_use]
    pub fn zone(&self, region: &str, zone: &str) -> Option<&ZoneSnapshot> {
        self.0.get(region).and_then(|zones| zones.get(zone))
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The patch that re-applies this snapshot.
    #[must_use]
    pub fn to_patch(&self) -> SettingsPatch {
        self.0
            .iter()
            .flat_map(|(region, zones)| {
                zones
                    .iter()
                    .map(move |(zone, snapshot)| (region, zone, snapshot.to_settings()))
            })
            .fold(SettingsPatch::default(), |patch, (region, zone, settings)| {
                patch.with_zone(region.clone(), zone.clone(), settings)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_zone() -> ZoneState {
        let mut state = ZoneState::default();
        state
            .apply(
                &ZoneSettings::default()
                    .with_power(true)
                    .with_color("Red")
                    .with_brightness(10),
            )
            .unwrap();
        state
    }

    #[test]
    fn should_serialize_unknown_attributes_as_null() {
        let snapshot = ZoneSnapshot::new(&ZoneState::default(), "Couch");
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"power": null, "color": null, "brightness": null, "name": "Couch"})
        );
    }

    #[test]
    fn should_report_normalised_color() {
        let snapshot = ZoneSnapshot::new(&lit_zone(), "Couch");
        assert_eq!(snapshot.color.as_deref(), Some("#ff0000"));
        assert_eq!(snapshot.brightness, Some(10));
        assert_eq!(snapshot.power, Some(true));
    }

    #[test]
    fn should_convert_to_restoring_patch() {
        let mut snapshot = Snapshot::default();
        snapshot.insert_region(
            "kitchen",
            BTreeMap::from([("1".to_string(), ZoneSnapshot::new(&lit_zone(), "Sink"))]),
        );

        let expected = SettingsPatch::for_zone(
            "kitchen",
            "1",
            ZoneSettings::default()
                .with_power(true)
                .with_color("#ff0000")
                .with_brightness(10),
        );
        assert_eq!(snapshot.to_patch(), expected);
    }

    #[test]
    fn should_look_up_zone() {
        let mut snapshot = Snapshot::default();
        snapshot.insert_region(
            "kitchen",
            BTreeMap::from([(
                "2".to_string(),
                ZoneSnapshot::new(&ZoneState::default(), "2"),
            )]),
        );
        assert!(snapshot.zone("kitchen", "2").is_some());
        assert!(snapshot.zone("kitchen", "1").is_none());
        assert_eq!(snapshot.regions().collect::<Vec<_>>(), vec!["kitchen"]);
    }
}
