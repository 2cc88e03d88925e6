//! Sonde Core: shared probe model, path templating, and errors.
//!
//! This crate provides the foundational types used across all Sonde crates.
//! It has no internal Sonde dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`probe`]: Probe specs, outcomes, and classified results
//! - [`path`]: `{self}`/`{foreign}` path template resolution

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod path;
pub mod probe;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use path::{FOREIGN_PLACEHOLDER, SELF_PLACEHOLDER, resolve_path};
pub use probe::{Operation, ProbeOutcome, ProbeResult, ProbeSpec, ProbeStatus, TargetKind};
