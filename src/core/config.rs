//! core::config
//!
//! Configuration schema and loading for the CLI.
//!
//! # Locations
//!
//! Searched in order:
//! 1. `$CORKBOARD_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/corkboard/config.toml`
//! 3. `~/.corkboard/config.toml`
//!
//! Missing files are not an error; every field has a default. CLI flags
//! always take precedence over file values.
//!
//! # Example
//!
//! ```toml
//! # ~/.corkboard/config.toml
//! db_path = "/home/me/boards.db"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Path of the board database. Overridden by `--db`.
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration, tolerating absent files.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Resolve the config file path without reading it.
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var("CORKBOARD_CONFIG") {
            return Some(PathBuf::from(explicit));
        }
        if let Some(xdg) = dirs::config_dir() {
            let candidate = xdg.join("corkboard").join("config.toml");
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        dirs::home_dir().map(|home| home.join(".corkboard").join("config.toml"))
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|err| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Resolve the database path: flag, then config, then platform default.
    pub fn resolve_db_path(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(flag) = flag {
            return flag.to_path_buf();
        }
        if let Some(configured) = &self.db_path {
            return configured.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("corkboard")
            .join("corkboard.db")
    }
}
