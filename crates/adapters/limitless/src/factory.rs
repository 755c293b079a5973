//! Driver selection for a region configuration.

use std::future::Future;

use lumen_app::ports::{BridgeDriver, DriverFactory};
use lumen_domain::command::ZoneCommand;
use lumen_domain::config::RegionConfig;
use lumen_domain::error::{LumenError, NoDriverFound};

use crate::driver::LimitlessLed;
use crate::transport::UdpTransport;

/// Bridge host used when a region doesn't name one.
pub const DEFAULT_HOST: &str = "localhost";
/// Bridge port used when a region doesn't name one.
pub const DEFAULT_PORT: u16 = 8899;

/// Every bridge type this adapter can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    LimitlessLedRgbw,
}

impl DriverKind {
    pub const ALL: [Self; 1] = [Self::LimitlessLedRgbw];

    /// The `type` value that selects this driver.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LimitlessLedRgbw => "limitlessled-rgbw",
        }
    }

    #[must_use]
    pub fn handles(self, config: &RegionConfig) -> bool {
        config.driver == self.name()
    }

    /// The single driver claiming `config`.
    ///
    /// # Errors
    ///
    /// Returns [`NoDriverFound`] when no driver, or more than one, claims it.
    pub fn for_config(region: &str, config: &RegionConfig) -> Result<Self, NoDriverFound> {
        let mut claiming = Self::ALL.into_iter().filter(|kind| kind.handles(config));
        match (claiming.next(), claiming.next()) {
            (Some(kind), None) => Ok(kind),
            _ => Err(NoDriverFound {
                region: region.to_string(),
                driver: config.driver.clone(),
            }),
        }
    }
}

/// A connected bridge of any supported kind.
pub enum Bridge {
    LimitlessLed(LimitlessLed<UdpTransport>),
}

impl BridgeDriver for Bridge {
    fn send(
        &mut self,
        command: ZoneCommand,
    ) -> impl Future<Output = Result<(), LumenError>> + Send {
        async move {
            match self {
                Self::LimitlessLed(driver) => driver.execute(command).await.map_err(LumenError::from),
            }
        }
    }
}

/// Builds and connects the bridge for a region.
#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeFactory;

impl DriverFactory for BridgeFactory {
    type Driver = Bridge;

    fn create(
        &self,
        region: &str,
        config: &RegionConfig,
    ) -> impl Future<Output = Result<Bridge, LumenError>> + Send {
        let kind = DriverKind::for_config(region, config);
        let host = config
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = config.port.unwrap_or(DEFAULT_PORT);
        async move {
            match kind? {
                DriverKind::LimitlessLedRgbw => {
                    let transport = UdpTransport::connect(&host, port).await?;
                    Ok(Bridge::LimitlessLed(LimitlessLed::new(transport)))
                }
            }
        }
    }
}
