//! # sonde-store
//!
//! The backing-store boundary for Sonde.
//!
//! This crate defines the [`DocumentStore`] trait the auditor probes
//! through, the [`StoreError`] taxonomy that keeps policy denials distinct
//! from transient failures, and two implementations:
//!
//! - [`FirestoreStore`]: Firestore REST v1 over HTTPS
//! - [`MemoryStore`]: rule-driven in-memory store for tests and offline runs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod firestore;
pub mod memory;
pub mod store;

pub use error::{Result, StoreError};
pub use firestore::FirestoreStore;
pub use memory::{Decision, MemoryStore, Rule};
pub use store::{Document, DocumentStore};
