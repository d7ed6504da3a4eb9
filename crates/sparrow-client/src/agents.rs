//! Agents listing endpoint wrapper (`/api/v1/agents`).

use sparrow_core::agent::AgentInfo;
use sparrow_core::error::Result;

use crate::http::ApiClient;

/// Typed client for agent discovery.
#[derive(Clone)]
pub struct AgentsApi {
    client: ApiClient,
}

impl AgentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Lists the agents the backend currently exposes.
    pub async fn list(&self) -> Result<Vec<AgentInfo>> {
        self.client.get_json("/agents").await
    }
}
