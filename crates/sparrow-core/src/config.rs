//! Application and secret configuration types.
//!
//! Loading and persistence live in `sparrow-infrastructure`; these are the
//! plain data shapes shared across layers.

use serde::{Deserialize, Serialize};

/// Default backend base URL used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Versioned API path prefix appended to the base URL.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Main application configuration (config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend base URL, e.g. `https://api.example.com`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// API path prefix, normally `/api/v1`.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Per-request timeout for plain JSON calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Verbose diagnostics in the console.
    #[serde(default)]
    pub debug: bool,
    /// Skip the login gate and use a stub operator session. Development only.
    #[serde(default)]
    pub auth_bypass: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_prefix: default_api_prefix(),
            request_timeout_secs: default_request_timeout(),
            debug: false,
            auth_bypass: false,
        }
    }
}

impl AppConfig {
    /// Applies environment variable overrides on top of the loaded file.
    ///
    /// Recognized variables: `SPARROW_API_URL`, `SPARROW_API_BASE`,
    /// `SPARROW_DEBUG`, `SPARROW_AUTH_BYPASS`.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("SPARROW_API_URL") {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(prefix) = std::env::var("SPARROW_API_BASE") {
            if !prefix.trim().is_empty() {
                self.api_prefix = prefix;
            }
        }
        if let Ok(debug) = std::env::var("SPARROW_DEBUG") {
            self.debug = is_truthy(&debug);
        }
        if let Ok(bypass) = std::env::var("SPARROW_AUTH_BYPASS") {
            self.auth_bypass = is_truthy(&bypass);
        }
        self
    }

    /// Full prefix URL for versioned API calls.
    pub fn api_root(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            self.api_prefix
        )
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Stored bearer token for the backend session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSecret {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Secret configuration (secret.json).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSecret>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_root_joins_without_double_slash() {
        let config = AppConfig {
            api_base_url: "https://api.example.com/".into(),
            ..Default::default()
        };
        assert_eq!(config.api_root(), "https://api.example.com/api/v1");
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.auth_bypass);
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy(" yes "));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
    }
}
