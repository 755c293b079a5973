//! # lumen-app
//!
//! Application layer — bridge driver **ports** and the serialized command
//! processor.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `BridgeDriver` — deliver one zone command to a bridge
//!   - `DriverFactory` — build the driver for a configured region
//! - Own the lazily created regions in a `Registry`
//! - Run every request through a single `CommandProcessor` so the in-memory
//!   state and the bridge traffic are never interleaved
//! - Periodically re-assert the full state with the resync ticker
//!
//! ## Dependency rule
//! Depends on `lumen-domain` only (plus `tokio` for channels, timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod processor;
pub mod registry;
pub mod ticker;

#[cfg(test)]
pub(crate) mod testing;
