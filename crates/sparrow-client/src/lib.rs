//! HTTP client layer for the MB-Sparrow backend.
//!
//! Everything the console knows about the backend lives here: a shared
//! [`http::ApiClient`], typed wrappers per endpoint family, the streaming
//! event reader for the research agent, and the request lifecycle manager
//! that supersedes and sweeps in-flight requests.

pub mod agent_api;
pub mod agents;
pub mod api_keys;
pub mod auth;
pub mod feedme;
pub mod health;
pub mod http;
pub mod metadata;
pub mod rate_limits;
pub mod request_manager;
pub mod sessions;
pub mod stream;

pub use agent_api::AgentApi;
pub use agents::AgentsApi;
pub use api_keys::ApiKeysApi;
pub use auth::AuthApi;
pub use feedme::FeedMeApi;
pub use health::HealthApi;
pub use http::ApiClient;
pub use metadata::MetadataApi;
pub use rate_limits::RateLimitsApi;
pub use request_manager::{RequestManager, STALE_TTL, SWEEP_INTERVAL};
pub use sessions::SessionsApi;
pub use stream::{ResearchStream, SseFrameParser};
