//! Provider API key endpoints (`/api/v1/api-keys`).
//!
//! Keys are stored by the backend; the console only ever sees masked values
//! after the initial save.

use sparrow_core::backend::{ApiKeyInfo, SaveApiKey};
use sparrow_core::error::Result;

use crate::http::ApiClient;

/// Typed client for provider API key management.
#[derive(Clone)]
pub struct ApiKeysApi {
    client: ApiClient,
}

impl ApiKeysApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists stored keys (masked).
    pub async fn list(&self) -> Result<Vec<ApiKeyInfo>> {
        self.client.get_json("/api-keys").await
    }

    /// Saves or replaces the key for a provider.
    pub async fn save(&self, save: SaveApiKey) -> Result<ApiKeyInfo> {
        self.client.post_json("/api-keys", &save).await
    }

    /// Deletes the key for a provider.
    pub async fn delete(&self, provider: &str) -> Result<()> {
        self.client.delete(&format!("/api-keys/{provider}")).await
    }
}
