//! Error types for sonde-cli

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the CLI layer.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Configuration problem (missing file, bad path, missing value).
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error (reading or writing config and report files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file failed to parse.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized back to TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
