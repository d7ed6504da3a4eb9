//! FeedMe transcript ingestion types.
//!
//! FeedMe feeds support conversation transcripts into the backend knowledge
//! base. The console uploads transcripts, watches processing status, and
//! approves or rejects the extracted examples.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Backend processing state of an uploaded transcript.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    AwaitingApproval,
    Completed,
    Failed,
}

impl ProcessingStatus {
    /// Whether the backend is still working on the conversation.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

/// An ingested conversation as returned by the `/api/v1/feedme` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMeConversation {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    pub processing_status: ProcessingStatus,
    /// Q&A example pairs extracted so far.
    #[serde(default)]
    pub example_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for uploading a transcript file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptUpload {
    pub title: String,
    pub filename: String,
    /// Raw transcript text.
    pub content: String,
    /// MIME type guessed from the filename.
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_in_progress() {
        assert!(ProcessingStatus::Pending.is_in_progress());
        assert!(ProcessingStatus::Processing.is_in_progress());
        assert!(!ProcessingStatus::AwaitingApproval.is_in_progress());
        assert!(!ProcessingStatus::Failed.is_in_progress());
    }

    #[test]
    fn test_conversation_decodes_without_optional_fields() {
        let conv: FeedMeConversation = serde_json::from_str(
            r#"{
                "id": "c1",
                "title": "Ticket 42",
                "processing_status": "processing",
                "created_at": "2026-08-01T10:00:00Z",
                "updated_at": "2026-08-01T10:05:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(conv.example_count, 0);
        assert!(conv.original_filename.is_none());
    }
}
