//! Thin API-facing records for the smaller backend endpoints.

use serde::{Deserialize, Serialize};

/// Link preview metadata from `/api/v1/metadata/link-preview`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkPreview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

/// Rate-limit status from `/api/v1/rate-limits/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    pub requests_remaining: u32,
    pub requests_limit: u32,
    /// When the current window resets (RFC 3339 format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<String>,
}

impl RateLimitStatus {
    /// Fraction of the window already consumed, in [0,1].
    pub fn consumed_fraction(&self) -> f64 {
        if self.requests_limit == 0 {
            return 0.0;
        }
        let used = self.requests_limit.saturating_sub(self.requests_remaining);
        f64::from(used) / f64::from(self.requests_limit)
    }
}

/// A stored provider API key, masked by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyInfo {
    pub provider: String,
    /// Key with all but the last four characters masked.
    pub masked_key: String,
    pub created_at: String,
}

/// Payload for saving a provider API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveApiKey {
    pub provider: String,
    pub api_key: String,
}

/// Backend health probe result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok") || self.status.eq_ignore_ascii_case("healthy")
    }
}
