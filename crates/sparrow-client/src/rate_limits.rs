//! Rate-limit status endpoint wrapper (`/api/v1/rate-limits`).

use sparrow_core::backend::RateLimitStatus;
use sparrow_core::error::Result;

use crate::http::ApiClient;

/// Typed client for the rate-limit status API.
#[derive(Clone)]
pub struct RateLimitsApi {
    client: ApiClient,
}

impl RateLimitsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches the operator's current rate-limit window.
    pub async fn status(&self) -> Result<RateLimitStatus> {
        self.client.get_json("/rate-limits/status").await
    }
}
