//! # lumen-adapter-limitless
//!
//! Driver for LimitlessLED / MiLight RGBW WiFi bridges (protocol v3–v5).
//!
//! ## Responsibilities
//! - Encode zone commands into the bridge's 3-byte UDP datagrams
//! - Space consecutive datagrams to one bridge by at least 100 ms
//! - Select the driver claimed by a region configuration
//!
//! ## Dependency rule
//! Depends on `lumen-domain` and `lumen-app` (implements the
//! `BridgeDriver` and `DriverFactory` ports).

pub mod driver;
pub mod error;
pub mod factory;
pub mod opcode;
pub mod transport;

pub use driver::LimitlessLed;
pub use error::LimitlessError;
pub use factory::{Bridge, BridgeFactory, DriverKind};
pub use transport::{Transport, UdpTransport};
