//! FeedMe transcript ingestion workflows.

use sparrow_core::error::{Result, SparrowError};
use sparrow_core::feedme::{FeedMeConversation, TranscriptUpload};
use sparrow_core::gateway::FeedMeGateway;
use std::path::Path;
use std::sync::Arc;

/// Drives the FeedMe upload/approval workflows for the console.
pub struct FeedMeService {
    gateway: Arc<dyn FeedMeGateway>,
}

impl FeedMeService {
    pub fn new(gateway: Arc<dyn FeedMeGateway>) -> Self {
        Self { gateway }
    }

    /// Lists ingested conversations.
    pub async fn list(&self) -> Result<Vec<FeedMeConversation>> {
        self.gateway.list().await
    }

    /// Uploads a transcript file from disk.
    ///
    /// The title defaults to the file stem; the MIME type is guessed from
    /// the filename and falls back to `text/plain`.
    pub async fn upload_file(&self, path: &Path) -> Result<FeedMeConversation> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| SparrowError::io(format!("invalid path: {}", path.display())))?
            .to_string();
        let title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&filename)
            .to_string();
        let content = tokio::fs::read_to_string(path).await?;
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("text/plain")
            .to_string();

        tracing::info!(filename = %filename, mime = %mime_type, "uploading transcript");
        self.gateway
            .upload(TranscriptUpload {
                title,
                filename,
                content,
                mime_type,
            })
            .await
    }

    /// Uploads transcript text pasted directly into the console.
    pub async fn upload_text(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<FeedMeConversation> {
        let title = title.into();
        let filename = format!("{}.txt", slugify(&title));
        self.gateway
            .upload(TranscriptUpload {
                title,
                filename,
                content: content.into(),
                mime_type: "text/plain".to_string(),
            })
            .await
    }

    pub async fn delete(&self, conversation_id: &str) -> Result<()> {
        self.gateway.delete(conversation_id).await
    }

    pub async fn approve(&self, conversation_id: &str) -> Result<FeedMeConversation> {
        self.gateway.approve(conversation_id).await
    }

    pub async fn reject(&self, conversation_id: &str) -> Result<FeedMeConversation> {
        self.gateway.reject(conversation_id).await
    }
}

fn slugify(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "transcript".to_string()
    } else {
        trimmed.to_string()
    }
}
