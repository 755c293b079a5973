//! # lumen-domain
//!
//! Pure domain model for the lumen lighting controller.
//!
//! ## Responsibilities
//! - Foundational types: zone addresses, error conventions, colors
//! - Define **Zone State** and the diff algorithm mapping a state transition
//!   to the minimal ordered list of bridge commands
//! - Define the **all zones** aggregate that collapses reads and fans out writes
//! - Define **Settings patches**, **Sequences** and **Snapshots**
//! - Describe the static region configuration
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod color;
pub mod command;
pub mod config;
pub mod error;

pub mod aggregate;
pub mod sequence;
pub mod settings;
pub mod snapshot;
pub mod zone;
