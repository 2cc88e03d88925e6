//! Error types for sonde-audit.
//!
//! Probe-level failures are never errors at this layer; they are captured
//! as outcomes and classified. The only fatal conditions are the run
//! preconditions: a missing authenticated subject and an empty catalog.

use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or running an audit.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// No authenticated self identifier was supplied. An audit cannot
    /// start without one.
    #[error("missing audit subject: an authenticated self identifier is required")]
    MissingSubject,

    /// The catalog contains no probes; the aggregate score would be
    /// undefined.
    #[error("empty catalog: the aggregate score is undefined for zero probes")]
    EmptyCatalog,

    /// Two catalog entries share an id.
    #[error("duplicate probe id '{id}' in catalog")]
    DuplicateProbeId {
        /// The offending id.
        id: String,
    },

    /// A custom catalog file failed to parse.
    #[error("failed to parse catalog: {0}")]
    CatalogParse(#[from] toml::de::Error),

    /// I/O error reading a catalog file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
