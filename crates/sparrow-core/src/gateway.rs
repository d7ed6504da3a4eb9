//! Gateway traits for the backend API.
//!
//! These traits decouple the application services from the concrete HTTP
//! client, the same way a repository trait decouples domain logic from a
//! storage backend. `sparrow-client` provides the reqwest implementations;
//! tests substitute in-memory mocks.

use async_trait::async_trait;

use crate::auth::{AuthSession, LoginCredentials, TokenResponse};
use crate::backend::HealthStatus;
use crate::chat::{ChatSession, FeedbackRating, NewChatSession, StreamEvent};
use crate::error::Result;
use crate::feedme::{FeedMeConversation, TranscriptUpload};

/// Backend CRUD for chat sessions.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// Lists sessions, newest first (backend ordering).
    async fn list(&self) -> Result<Vec<ChatSession>>;

    /// Creates a new session.
    async fn create(&self, new_session: NewChatSession) -> Result<ChatSession>;

    /// Renames a session and returns the updated record.
    async fn rename(&self, session_id: &str, title: &str) -> Result<ChatSession>;

    /// Deletes a session.
    async fn delete(&self, session_id: &str) -> Result<()>;
}

/// Pull-based reader over a live event stream.
///
/// Implementations decode one event at a time so the caller can append
/// steps and messages in arrival order.
#[async_trait]
pub trait EventSource: Send {
    /// Returns the next decoded event, or `None` when the stream ends.
    async fn next_event(&mut self) -> Result<Option<StreamEvent>>;
}

/// Backend chat operations: streaming sends and feedback.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Starts a research stream for the prompt on the given session.
    async fn start_stream(
        &self,
        session_id: &str,
        prompt: &str,
    ) -> Result<Box<dyn EventSource>>;

    /// Records operator feedback for a message.
    async fn send_feedback(&self, message_id: &str, rating: FeedbackRating) -> Result<()>;
}

/// Backend operations for FeedMe transcript ingestion.
#[async_trait]
pub trait FeedMeGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<FeedMeConversation>>;

    async fn upload(&self, upload: TranscriptUpload) -> Result<FeedMeConversation>;

    async fn delete(&self, conversation_id: &str) -> Result<()>;

    /// Approves the extracted examples of a processed conversation.
    async fn approve(&self, conversation_id: &str) -> Result<FeedMeConversation>;

    /// Rejects the extracted examples of a processed conversation.
    async fn reject(&self, conversation_id: &str) -> Result<FeedMeConversation>;
}

/// Hosted identity operations.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for a token pair.
    async fn login(&self, credentials: &LoginCredentials) -> Result<TokenResponse>;

    /// Fetches the operator session for the current bearer token.
    async fn current(&self) -> Result<AuthSession>;

    /// Invalidates the current token server-side.
    async fn logout(&self) -> Result<()>;
}

/// Backend health probe.
#[async_trait]
pub trait HealthGateway: Send + Sync {
    async fn check(&self) -> Result<HealthStatus>;
}

/// Local secret persistence (bearer token).
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn load(&self) -> Result<crate::config::SecretConfig>;

    async fn save(&self, config: &crate::config::SecretConfig) -> Result<()>;
}
