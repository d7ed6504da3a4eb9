//! FeedMe transcript ingestion endpoints (`/api/v1/feedme`).

use async_trait::async_trait;
use sparrow_core::error::Result;
use sparrow_core::feedme::{FeedMeConversation, TranscriptUpload};
use sparrow_core::gateway::FeedMeGateway;

use crate::http::ApiClient;

/// Typed client for the FeedMe ingestion API.
#[derive(Clone)]
pub struct FeedMeApi {
    client: ApiClient,
}

impl FeedMeApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches one conversation by id.
    pub async fn get(&self, conversation_id: &str) -> Result<FeedMeConversation> {
        self.client
            .get_json(&format!("/feedme/conversations/{conversation_id}"))
            .await
    }
}

#[async_trait]
impl FeedMeGateway for FeedMeApi {
    async fn list(&self) -> Result<Vec<FeedMeConversation>> {
        self.client.get_json("/feedme/conversations").await
    }

    async fn upload(&self, upload: TranscriptUpload) -> Result<FeedMeConversation> {
        self.client.post_json("/feedme/conversations", &upload).await
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        self.client
            .delete(&format!("/feedme/conversations/{conversation_id}"))
            .await
    }

    async fn approve(&self, conversation_id: &str) -> Result<FeedMeConversation> {
        self.client
            .post_json(
                &format!("/feedme/conversations/{conversation_id}/approve"),
                &serde_json::json!({}),
            )
            .await
    }

    async fn reject(&self, conversation_id: &str) -> Result<FeedMeConversation> {
        self.client
            .post_json(
                &format!("/feedme/conversations/{conversation_id}/reject"),
                &serde_json::json!({}),
            )
            .await
    }
}
