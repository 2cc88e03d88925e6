//! # sonde-cli
//!
//! Command-line interface for Sonde.
//!
//! This crate provides the `sonde` binary:
//! - `sonde audit`: run the probe catalog against the backing store
//! - `sonde catalog list`: print the built-in catalog
//! - `sonde config path|init`: manage the TOML configuration file

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;

pub use error::{Error, Result};
