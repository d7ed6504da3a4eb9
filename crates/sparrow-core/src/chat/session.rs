//! Chat session domain model.
//!
//! Sessions are owned by the backend and reached through the sessions API.
//! The console keeps a transient in-memory copy for the picker; nothing is
//! persisted locally.

use crate::agent::AgentType;
use serde::{Deserialize, Serialize};

/// A chat session as returned by the `/api/v1/chat-sessions` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID format).
    pub id: String,
    /// Human-readable session title.
    pub title: String,
    /// Agent handling this session.
    #[serde(default)]
    pub agent_type: AgentType,
    /// Timestamp when the session was created (RFC 3339 format).
    pub created_at: String,
    /// Timestamp when the session was last updated (RFC 3339 format).
    pub updated_at: String,
}

/// Payload for creating a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatSession {
    pub title: String,
    pub agent_type: AgentType,
}

impl NewChatSession {
    pub fn new(title: impl Into<String>, agent_type: AgentType) -> Self {
        Self {
            title: title.into(),
            agent_type,
        }
    }
}
