//! Operator authentication flow.
//!
//! Wraps the hosted identity gateway and local secret storage: login stores
//! the bearer token, logout clears it, and `current` validates the token
//! against the backend. A development bypass flag short-circuits the whole
//! flow with a stub session.

use sparrow_client::ApiClient;
use sparrow_core::auth::{AuthSession, LoginCredentials};
use sparrow_core::config::{AuthSecret, SecretConfig};
use sparrow_core::error::Result;
use sparrow_core::gateway::{AuthGateway, SecretStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Handles login, logout, and session checks for the console.
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
    secrets: Arc<dyn SecretStore>,
    client: ApiClient,
    bypass: bool,
    session: RwLock<Option<AuthSession>>,
}

impl AuthService {
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        secrets: Arc<dyn SecretStore>,
        client: ApiClient,
        bypass: bool,
    ) -> Self {
        Self {
            gateway,
            secrets,
            client,
            bypass,
            session: RwLock::new(None),
        }
    }

    /// Restores a stored token on startup. Returns whether a token was found.
    pub async fn bootstrap(&self) -> Result<bool> {
        if self.bypass {
            return Ok(true);
        }

        let config = self.secrets.load().await?;
        match config.auth {
            Some(auth) => {
                self.client.set_token(Some(auth.access_token)).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Exchanges credentials for a token, stores it, and loads the session.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession> {
        let tokens = self.gateway.login(credentials).await?;
        self.client
            .set_token(Some(tokens.access_token.clone()))
            .await;
        self.secrets
            .save(&SecretConfig {
                auth: Some(AuthSecret {
                    access_token: tokens.access_token,
                    refresh_token: tokens.refresh_token,
                }),
            })
            .await?;

        let session = self.gateway.current().await?;
        let mut slot = self.session.write().await;
        *slot = Some(session.clone());
        tracing::info!(email = %session.email, "operator logged in");
        Ok(session)
    }

    /// Fetches and caches the current operator session.
    pub async fn current(&self) -> Result<AuthSession> {
        if self.bypass {
            return Ok(Self::stub_session());
        }

        let session = self.gateway.current().await?;
        let mut slot = self.session.write().await;
        *slot = Some(session.clone());
        Ok(session)
    }

    /// Clears the token locally and best-effort invalidates it server-side.
    pub async fn logout(&self) -> Result<()> {
        // Server-side invalidation is best-effort; losing the race with an
        // expired token must not block the local logout.
        if let Err(err) = self.gateway.logout().await {
            tracing::warn!(error = %err, "server-side logout failed");
        }

        self.client.set_token(None).await;
        self.secrets.save(&SecretConfig::default()).await?;
        let mut slot = self.session.write().await;
        *slot = None;
        Ok(())
    }

    /// Whether the console currently holds an operator session or token.
    pub async fn is_authenticated(&self) -> bool {
        if self.bypass {
            return true;
        }
        self.session.read().await.is_some() || self.client.has_token().await
    }

    fn stub_session() -> AuthSession {
        AuthSession {
            user_id: "dev-bypass".to_string(),
            email: "dev@localhost".to_string(),
            expires_at: None,
        }
    }
}
