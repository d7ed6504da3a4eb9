//! Auth endpoints for the hosted identity service.

use async_trait::async_trait;
use sparrow_core::auth::{AuthSession, LoginCredentials, TokenResponse};
use sparrow_core::error::Result;
use sparrow_core::gateway::AuthGateway;

use crate::http::ApiClient;

/// Typed client for login, session check, and logout.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthGateway for AuthApi {
    async fn login(&self, credentials: &LoginCredentials) -> Result<TokenResponse> {
        self.client.post_json("/auth/login", credentials).await
    }

    async fn current(&self) -> Result<AuthSession> {
        self.client.get_json("/auth/session").await
    }

    async fn logout(&self) -> Result<()> {
        self.client
            .post_empty("/auth/logout", &serde_json::json!({}))
            .await
    }
}
