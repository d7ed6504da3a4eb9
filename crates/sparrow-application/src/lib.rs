//! Application services for the MB-Sparrow console.
//!
//! Each service glues a backend gateway to the transient state the console
//! renders: session picker, chat transcripts, operator auth, FeedMe
//! workflows, and the health banner. Route gating for web-style deep links
//! lives in [`routing`].

pub mod auth_service;
pub mod chat_service;
pub mod feedme_service;
pub mod health_service;
pub mod routing;
pub mod session_service;

pub use auth_service::AuthService;
pub use chat_service::{ChatService, ChatTranscript, SendOutcome};
pub use feedme_service::FeedMeService;
pub use health_service::{HealthService, HealthState};
pub use routing::{RouteDecision, decide_route};
pub use session_service::SessionService;
