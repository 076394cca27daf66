// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Resolution of the directory reported by `getDatabasesPath`.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::DaemonError;

/// Storage directory for `config`.
///
/// An explicit `databases_path` wins. Otherwise this is
/// `<user config dir>/<vendor>/<application>`, where the user config dir is
/// `~/Library/Application Support` on macOS, `%APPDATA%` on Windows and
/// `$XDG_CONFIG_HOME` (or `~/.config`) elsewhere.
pub fn databases_path(config: &Config) -> Result<PathBuf, DaemonError> {
    if let Some(path) = &config.databases_path {
        return Ok(path.clone());
    }
    let base = dirs::config_dir()
        .ok_or_else(|| DaemonError::config("Could not determine user config directory"))?;
    Ok(storage_dir(&base, config))
}

fn storage_dir(base: &Path, config: &Config) -> PathBuf {
    base.join(&config.vendor_name).join(&config.application_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let config = Config {
            databases_path: Some(PathBuf::from("/srv/db")),
            ..Default::default()
        };
        assert_eq!(databases_path(&config).unwrap(), PathBuf::from("/srv/db"));
    }

    #[test]
    fn vendor_and_application_are_appended() {
        let config = Config {
            vendor_name: "acme".into(),
            application_name: "notes".into(),
            ..Default::default()
        };
        assert_eq!(
            storage_dir(Path::new("/home/u/.config"), &config),
            PathBuf::from("/home/u/.config/acme/notes")
        );
    }
}
