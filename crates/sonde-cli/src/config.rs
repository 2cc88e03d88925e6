//! CLI configuration.
//!
//! A small TOML file under the platform config directory
//! (`<config-dir>/sonde/config.toml`), overridable per invocation with
//! `--config`. Every field has a flag or environment equivalent; the file
//! only saves retyping them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the `sonde` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SondeConfig {
    /// Firestore project id.
    pub project_id: Option<String>,
    /// OAuth2 bearer token presented to the store.
    pub token: Option<String>,
    /// Collection the subject resolver samples for a foreign user.
    pub users_path: String,
    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SondeConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            token: None,
            users_path: "users".to_string(),
            timeout_secs: 5,
        }
    }
}

impl SondeConfig {
    /// Resolve the config file path: the explicit override, or the
    /// platform default.
    pub fn resolve_path(override_path: Option<&str>) -> Option<PathBuf> {
        match override_path {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::config_dir().map(|dir| dir.join("sonde").join("config.toml")),
        }
    }

    /// Load configuration.
    ///
    /// An explicitly overridden path must exist; the default path falls
    /// back to defaults when absent.
    pub fn load(override_path: Option<&str>) -> Result<Self> {
        match (override_path, Self::resolve_path(override_path)) {
            (Some(_), Some(path)) if !path.exists() => Err(Error::config(format!(
                "config file does not exist at {}",
                path.display()
            ))),
            (_, Some(path)) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Create a default configuration file, returning the path written.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn init(override_path: Option<&str>, force: bool) -> Result<PathBuf> {
        let path = Self::resolve_path(override_path)
            .ok_or_else(|| Error::config("could not determine config directory"))?;

        if path.exists() && !force {
            return Err(Error::config(format!(
                "config file already exists at {} (use --force to overwrite)",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(&Self::default())?;
        std::fs::write(&path, raw)?;
        Ok(path)
    }
}

// ============================================================================
// Tests
// ============================================================================
