//! Backend health probe.

use async_trait::async_trait;
use sparrow_core::backend::HealthStatus;
use sparrow_core::error::Result;
use sparrow_core::gateway::HealthGateway;

use crate::http::ApiClient;

/// Typed client for the unversioned `/health` endpoint.
#[derive(Clone)]
pub struct HealthApi {
    client: ApiClient,
}

impl HealthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HealthGateway for HealthApi {
    async fn check(&self) -> Result<HealthStatus> {
        self.client.get_unversioned("/health").await
    }
}
