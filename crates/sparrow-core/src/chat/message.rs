//! Chat message types.
//!
//! This module contains types for representing messages in a support
//! conversation, including roles, feedback, and assistant metadata.

use crate::agent::AgentType;
use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// Message from the support operator.
    User,
    /// Message from the backend agent.
    Assistant,
    /// System-generated message (status, errors).
    System,
}

/// Operator feedback attached to an assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRating {
    Positive,
    Negative,
}

/// Structured metadata the backend attaches to assistant messages.
///
/// All fields are optional; older backend versions omit them entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Suggested follow-up questions for the operator.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_up_questions: Vec<String>,
    /// Reasoning trace produced by the agent, rendered read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_trace: Option<String>,
}

impl MessageMetadata {
    /// True when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.follow_up_questions.is_empty() && self.thinking_trace.is_none()
    }
}

/// A single message in a support conversation.
///
/// Messages are append-only: once added to a transcript the only permitted
/// mutation is attaching operator feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier (UUID format).
    pub id: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (RFC 3339 format).
    pub created_at: String,
    /// Agent that produced this message, for assistant messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<AgentType>,
    /// Operator feedback, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackRating>,
    /// Backend-provided metadata, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl ChatMessage {
    /// Creates a new operator message with a fresh id and timestamp.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, None)
    }

    /// Creates a new assistant message attributed to an agent.
    pub fn assistant(content: impl Into<String>, agent_type: AgentType) -> Self {
        Self::new(MessageRole::Assistant, content, Some(agent_type))
    }

    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content, None)
    }

    fn new(role: MessageRole, content: impl Into<String>, agent_type: Option<AgentType>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            agent_type,
            feedback: None,
            metadata: None,
        }
    }
}
