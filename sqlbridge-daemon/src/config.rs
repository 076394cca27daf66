// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DaemonError, IoContext};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to bind the daemon socket
    pub socket_path: PathBuf,

    /// Vendor component of the storage directory
    pub vendor_name: String,

    /// Application component of the storage directory
    pub application_name: String,

    /// Overrides `<config dir>/<vendor>/<application>` as the storage directory
    pub databases_path: Option<PathBuf>,

    /// Log SQL statements at info level from startup
    pub debug: bool,

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/run/sqlbridge/sqlbridge.sock"),
            vendor_name: "sqlbridge".to_string(),
            application_name: "default".to_string(),
            databases_path: None,
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, DaemonError> {
        let contents = std::fs::read_to_string(path)
            .io_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `SQLBRIDGE_CONFIG` if set, defaults otherwise.
    pub fn load() -> Result<Self, DaemonError> {
        match std::env::var("SQLBRIDGE_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path)),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), DaemonError> {
        if self.vendor_name.trim().is_empty() {
            return Err(DaemonError::config("vendor_name must be set"));
        }
        if self.application_name.trim().is_empty() {
            return Err(DaemonError::config("application_name must be set"));
        }
        Ok(())
    }
}
