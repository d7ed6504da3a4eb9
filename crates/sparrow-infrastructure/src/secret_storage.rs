//! Secret configuration file storage.
//!
//! Persists the backend bearer token to ~/.config/sparrow/secret.json.
//! The file is created with 600 permissions on Unix.

use async_trait::async_trait;
use sparrow_core::config::SecretConfig;
use sparrow_core::error::{Result, SparrowError};
use sparrow_core::gateway::SecretStore;
use std::path::PathBuf;

use crate::paths::SparrowPaths;

/// File-backed implementation of [`SecretStore`].
///
/// Does NOT:
/// - Validate tokens against the backend
/// - Handle encryption (plaintext JSON storage)
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates storage pointed at the default path (~/.config/sparrow/secret.json).
    pub fn new() -> Result<Self> {
        let path = SparrowPaths::secret_file()
            .map_err(|err| SparrowError::config(err.to_string()))?;
        Ok(Self { path })
    }

    /// Creates storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path to the secret file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    #[cfg(unix)]
    fn restrict_permissions(path: &PathBuf) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
    }

    #[cfg(not(unix))]
    fn restrict_permissions(_path: &PathBuf) -> std::io::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl SecretStore for SecretStorage {
    async fn load(&self) -> Result<SecretConfig> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(SecretConfig::default());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    async fn save(&self, config: &SecretConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, content).await?;
        Self::restrict_permissions(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparrow_core::config::AuthSecret;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_file_returns_empty_config() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SecretStorage::with_path(temp_dir.path().join("secret.json"));

        let config = storage.load().await.unwrap();
        assert!(config.auth.is_none());
    }

    #[tokio::test]
    async fn test_save_and_reload_token() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SecretStorage::with_path(temp_dir.path().join("secret.json"));

        let config = SecretConfig {
            auth: Some(AuthSecret {
                access_token: "tok-123".into(),
                refresh_token: None,
            }),
        };
        storage.save(&config).await.unwrap();

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.auth.unwrap().access_token, "tok-123");
    }

    #[tokio::test]
    async fn test_load_invalid_json_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        std::fs::write(&path, "{ invalid json").unwrap();

        let storage = SecretStorage::with_path(path);
        assert!(storage.load().await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        let storage = SecretStorage::with_path(path.clone());

        storage.save(&SecretConfig::default()).await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
