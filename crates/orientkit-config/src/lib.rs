//! Configuration for the orientkit indicators
//!
//! Stored as TOML under the platform config directory
//! (`~/.config/orientkit/config.toml` on Linux). Missing files and missing
//! fields fall back to defaults.

mod error;
mod types;

pub use error::{ConfigError, Result};
pub use types::*;

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_FILE: &str = "config.toml";

/// Returns the config directory, creating it if needed
pub fn config_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "orientkit").ok_or(ConfigError::NoConfigDir)?;
    let dir = dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Returns the default config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Load config from the default location, or defaults if absent
pub fn load_config() -> Result<OrientKitConfig> {
    load_config_from(&config_path()?)
}

/// Load config from `path`, or defaults if the file does not exist.
///
/// Values are returned as written; call [`OrientKitConfig::validated`] before use.
pub fn load_config_from(path: &Path) -> Result<OrientKitConfig> {
    if !path.exists() {
        info!(?path, "No config found, using defaults");
        return Ok(OrientKitConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: OrientKitConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(?path, "Loaded config");
    Ok(config)
}

/// Save config to the default location
pub fn save_config(config: &OrientKitConfig) -> Result<PathBuf> {
    let path = config_path()?;
    save_config_to(config, &path)?;
    Ok(path)
}

/// Save config to `path`, creating parent directories
pub fn save_config_to(config: &OrientKitConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(?path, "Saved config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use orientkit_core::TargetOrientation;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, OrientKitConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = OrientKitConfig::default();
        config.indicator.target_orientation = TargetOrientation::Landscape;
        config.indicator.alignment_tolerance = 3.5;
        config.level.enabled = false;

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[indicator]\nupdate_interval_ms = \"fast\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
