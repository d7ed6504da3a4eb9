//! Agent interaction endpoints: the research stream and message feedback.

use async_trait::async_trait;
use serde::Serialize;
use sparrow_core::chat::FeedbackRating;
use sparrow_core::error::Result;
use sparrow_core::gateway::{ChatGateway, EventSource};

use crate::http::ApiClient;
use crate::stream;

/// Typed client for `/api/v1/agent/*`.
#[derive(Clone)]
pub struct AgentApi {
    client: ApiClient,
}

#[derive(Serialize)]
struct StreamRequest<'a> {
    session_id: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct FeedbackRequest<'a> {
    message_id: &'a str,
    rating: FeedbackRating,
}

impl AgentApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChatGateway for AgentApi {
    async fn start_stream(
        &self,
        session_id: &str,
        prompt: &str,
    ) -> Result<Box<dyn EventSource>> {
        let response = self
            .client
            .post_stream(
                "/agent/research/stream",
                &StreamRequest {
                    session_id,
                    message: prompt,
                },
            )
            .await?;
        Ok(Box::new(stream::from_response(response)))
    }

    async fn send_feedback(&self, message_id: &str, rating: FeedbackRating) -> Result<()> {
        self.client
            .post_empty("/agent/feedback", &FeedbackRequest { message_id, rating })
            .await
    }
}
