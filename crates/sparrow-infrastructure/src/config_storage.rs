//! Application configuration file storage.
//!
//! Loads config.toml from ~/.config/sparrow/, falling back to defaults when
//! the file is missing. Environment overrides are applied by the caller via
//! [`AppConfig::apply_env_overrides`].

use sparrow_core::config::AppConfig;
use sparrow_core::error::{Result, SparrowError};
use std::fs;
use std::path::PathBuf;

use crate::paths::SparrowPaths;

/// Storage for the application configuration file (config.toml).
///
/// Responsibilities:
/// - Load config.toml from the sparrow config directory
/// - Fall back to defaults when the file is absent
/// - Write a default template on first run
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates storage pointed at the default path (~/.config/sparrow/config.toml).
    pub fn new() -> Result<Self> {
        let path = SparrowPaths::config_file()
            .map_err(|err| SparrowError::config(err.to_string()))?;
        Ok(Self { path })
    }

    /// Creates storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, returning defaults when the file is missing.
    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "config file missing, using defaults");
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Writes a default config.toml template if none exists yet.
    ///
    /// Returns the path to the file (existing or newly created).
    pub fn ensure_exists(&self) -> Result<&PathBuf> {
        if self.path.exists() {
            return Ok(&self.path);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let template = toml::to_string_pretty(&AppConfig::default())?;
        fs::write(&self.path, template)?;
        Ok(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));

        let config = storage.load().unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn test_load_valid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "api_base_url = \"https://support-api.example.com\"\ndebug = true\n",
        )
        .unwrap();

        let storage = ConfigStorage::with_path(path);
        let config = storage.load().unwrap();
        assert_eq!(config.api_base_url, "https://support-api.example.com");
        assert!(config.debug);
        // Unset fields keep their defaults
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "api_base_url = [broken").unwrap();

        let storage = ConfigStorage::with_path(path);
        assert!(storage.load().is_err());
    }

    #[test]
    fn test_ensure_exists_writes_template() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let storage = ConfigStorage::with_path(path.clone());

        storage.ensure_exists().unwrap();
        assert!(path.exists());

        // Template round-trips through load
        let config = storage.load().unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }
}
