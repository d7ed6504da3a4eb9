//! Streaming events emitted by the research endpoint.

use serde::{Deserialize, Serialize};

use crate::analysis::ResearchStep;

/// A single event decoded from the research stream.
///
/// The backend emits newline-delimited `data: {json}` frames; each payload
/// carries a `type` discriminator. Unknown types fail deserialization, which
/// ends the stream loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Intermediate research step; appended to the steps list.
    Step(ResearchStep),
    /// Final or incremental agent message; appended to the messages list.
    Message(StreamMessage),
}

/// Message payload carried by a `message` stream event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamMessage {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_step_event() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"type": "step", "title": "Searching docs", "status": "running"}"#,
        )
        .unwrap();
        match event {
            StreamEvent::Step(step) => assert_eq!(step.title.as_deref(), Some("Searching docs")),
            other => panic!("expected step, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_message_event() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type": "message", "content": "Done."}"#).unwrap();
        match event {
            StreamEvent::Message(msg) => assert_eq!(msg.content, "Done."),
            other => panic!("expected message, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_type_fails() {
        let result: Result<StreamEvent, _> =
            serde_json::from_str(r#"{"type": "heartbeat"}"#);
        assert!(result.is_err());
    }
}
