//! Recording fakes shared by the unit tests of this crate.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use lumen_domain::command::ZoneCommand;
use lumen_domain::config::{RegionConfig, RegionsConfig, ZoneConfig};
use lumen_domain::error::{LumenError, NoDriverFound};

use crate::ports::{BridgeDriver, DriverFactory};

pub(crate) const DRIVER: &str = "recording";

/// Every command sent by any recording driver, tagged with its region.
#[derive(Clone, Default)]
pub(crate) struct CommandLog(Arc<Mutex<Vec<(String, ZoneCommand)>>>);

impl CommandLog {
    pub(crate) fn take(&self) -> Vec<(String, ZoneCommand)> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    pub(crate) fn commands(&self) -> Vec<ZoneCommand> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|(_, command)| *command)
            .collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

pub(crate) struct RecordingDriver {
    region: String,
    log: CommandLog,
}

impl BridgeDriver for RecordingDriver {
    fn send(
        &mut self,
        command: ZoneCommand,
    ) -> impl Future<Output = Result<(), LumenError>> + Send {
        self.log.0.lock().unwrap().push((self.region.clone(), command));
        async { Ok(()) }
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingFactory {
    pub(crate) log: CommandLog,
}

impl DriverFactory for RecordingFactory {
    type Driver = RecordingDriver;

    fn create(
        &self,
        region: &str,
        config: &RegionConfig,
    ) -> impl Future<Output = Result<RecordingDriver, LumenError>> + Send {
        let result = if config.driver == DRIVER {
            Ok(RecordingDriver {
                region: region.to_string(),
                log: self.log.clone(),
            })
        } else {
            Err(NoDriverFound {
                region: region.to_string(),
                driver: config.driver.clone(),
            }
            .into())
        };
        async { result }
    }
}

pub(crate) fn region(driver: &str, zones: &[(&str, &str)]) -> RegionConfig {
    RegionConfig {
        driver: driver.to_string(),
        host: None,
        port: None,
        zones: zones
            .iter()
            .map(|(key, name)| {
                (
                    (*key).to_string(),
                    ZoneConfig {
                        name: Some((*name).to_string()),
                    },
                )
            })
            .collect(),
    }
}

/// `kitchen` exposes every zone, `porch` only zone 1.
pub(crate) fn regions() -> RegionsConfig {
    BTreeMap::from([
        (
            "kitchen".to_string(),
            region(
                DRIVER,
                &[
                    ("0", "All"),
                    ("1", "Sink"),
                    ("2", "Table"),
                    ("3", "Counter"),
                    ("4", "Pantry"),
                ],
            ),
        ),
        ("porch".to_string(), region(DRIVER, &[("1", "Door")])),
    ])
}
