//! Chat sessions endpoint wrapper (`/api/v1/chat-sessions`).

use async_trait::async_trait;
use serde::Serialize;
use sparrow_core::chat::{ChatSession, NewChatSession};
use sparrow_core::error::Result;
use sparrow_core::gateway::SessionGateway;

use crate::http::ApiClient;

/// Typed client for the chat sessions API.
#[derive(Clone)]
pub struct SessionsApi {
    client: ApiClient,
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    title: &'a str,
}

impl SessionsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionGateway for SessionsApi {
    async fn list(&self) -> Result<Vec<ChatSession>> {
        self.client.get_json("/chat-sessions").await
    }

    async fn create(&self, new_session: NewChatSession) -> Result<ChatSession> {
        self.client.post_json("/chat-sessions", &new_session).await
    }

    async fn rename(&self, session_id: &str, title: &str) -> Result<ChatSession> {
        self.client
            .put_json(
                &format!("/chat-sessions/{session_id}"),
                &RenameRequest { title },
            )
            .await
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.client
            .delete(&format!("/chat-sessions/{session_id}"))
            .await
    }
}
