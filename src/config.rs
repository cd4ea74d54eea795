//! Runtime configuration: database location and log level.
//!
//! Values are layered, later sources winning: built-in defaults, an optional
//! `regtracker.yaml`, the `DATABASE_URL` and `REGTRACKER_DB` environment
//! variables, and finally an explicit `--db` flag.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RegTrackerError, Result};

pub const CONFIG_FILE: &str = "regtracker.yaml";
pub const DEFAULT_DATABASE: &str = "regtracker.db";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the SQLite database file
    pub database: PathBuf,
    /// tracing filter directive used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Parse a YAML config file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicitly named config file must exist; the implicit
    /// `regtracker.yaml` in the working directory is optional.
    pub fn load(config_path: Option<&Path>, db_override: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => {
                return Err(RegTrackerError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )))
            }
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };

        config.apply_env(
            std::env::var("DATABASE_URL").ok().as_deref(),
            std::env::var("REGTRACKER_DB").ok().as_deref(),
        )?;

        if let Some(db) = db_override {
            config.database = db;
        }

        Ok(config)
    }

    fn apply_env(&mut self, database_url: Option<&str>, regtracker_db: Option<&str>) -> Result<()> {
        if let Some(url) = database_url.filter(|u| !u.is_empty()) {
            self.database = parse_database_url(url)?;
        }
        if let Some(path) = regtracker_db.filter(|p| !p.is_empty()) {
            self.database = PathBuf::from(path);
        }
        Ok(())
    }
}

/// Accepts `sqlite:///relative.db`, `sqlite:////abs/path.db` or a bare path.
pub fn parse_database_url(url: &str) -> Result<PathBuf> {
    match url.split_once("://") {
        None => Ok(PathBuf::from(url)),
        Some(("sqlite", rest)) => {
            let path = rest.strip_prefix('/').unwrap_or(rest);
            if path.is_empty() {
                return Err(RegTrackerError::Config(format!(
                    "DATABASE_URL has no path: {}",
                    url
                )));
            }
            Ok(PathBuf::from(path))
        }
        Some((scheme, _)) => Err(RegTrackerError::Config(format!(
            "unsupported database scheme '{}'; only sqlite is available",
            scheme
        ))),
    }
}
