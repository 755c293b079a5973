//! Bridge driver ports — how commands leave the process.

use std::future::Future;

use lumen_domain::command::ZoneCommand;
use lumen_domain::config::RegionConfig;
use lumen_domain::error::LumenError;

/// Delivers commands to one physical bridge.
///
/// Drivers are owned by the command processor and only ever called from it,
/// hence `&mut self`: a driver may keep pacing or connection state without
/// locking.
pub trait BridgeDriver: Send {
    /// Send one command. Implementations honour the bridge's pacing
    /// requirements before returning.
    fn send(&mut self, command: ZoneCommand)
    -> impl Future<Output = Result<(), LumenError>> + Send;
}

/// Builds the driver for a region the first time the region is used.
pub trait DriverFactory: Send + Sync {
    type Driver: BridgeDriver;

    /// Create the driver for `region`.
    ///
    /// Exactly one known driver must claim `config`; zero or several matches
    /// are reported as [`LumenError::NoDriverFound`].
    fn create(
        &self,
        region: &str,
        config: &RegionConfig,
    ) -> impl Future<Output = Result<Self::Driver, LumenError>> + Send;
}
