//! # lumen-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON settings API (`/settings`, `/settings/{region}`,
//!   `/settings/{region}/{zone}`, `/sequence`)
//! - Reject requests naming unconfigured regions or zones before they reach
//!   the command processor
//! - Submit every request through the `ProcessorHandle` and answer with the
//!   resulting snapshot
//!
//! ## Dependency rule
//! Depends on `lumen-app` (for the processor handle) and `lumen-domain`
//! (for request decoding and snapshots). Never leaks axum types into the
//! domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
