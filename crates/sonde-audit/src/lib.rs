//! # sonde-audit
//!
//! The auditing core of Sonde: a declarative probe catalog, a subject
//! context resolver, a probe executor with a never-throw contract, and the
//! catalog runner that classifies outcomes into an [`AuditReport`].
//!
//! Control flow: [`Catalog`] → [`ProbeExecutor`] (each probe independently
//! asynchronous) → classification per probe → [`AuditReport`]. The report
//! is an explicit run handle owned by the caller; no results are stored
//! ambiently.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod executor;
pub mod runner;
pub mod subject;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use executor::{DEFAULT_PROBE_TIMEOUT, ProbeExecutor};
pub use runner::{AuditReport, AuditRunner, AuditSummary};
pub use subject::{SENTINEL_FOREIGN_ID, SubjectContext};
