//! Chat domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ChatMessage`)
//! - `session`: Backend-owned session records (`ChatSession`)
//! - `event`: Streaming events from the research endpoint (`StreamEvent`)

mod event;
mod message;
mod session;

// Re-export public API
pub use event::{StreamEvent, StreamMessage};
pub use message::{ChatMessage, FeedbackRating, MessageMetadata, MessageRole};
pub use session::{ChatSession, NewChatSession};
