//! Unified path management for sparrow configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/sparrow/           # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # Bearer token
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for sparrow.
pub struct SparrowPaths;

impl SparrowPaths {
    /// Returns the sparrow configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/sparrow/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("sparrow"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = SparrowPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("sparrow"));
    }

    #[test]
    fn test_config_file() {
        let config_file = SparrowPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = SparrowPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_secret_file() {
        let secret_file = SparrowPaths::secret_file().unwrap();
        assert!(secret_file.ends_with("secret.json"));
    }
}
