//! Session picker state and lifecycle.
//!
//! Keeps the transient session list the console renders. Sessions are owned
//! by the backend; this service only mirrors the list and tracks which one
//! is selected.

use sparrow_core::agent::AgentType;
use sparrow_core::chat::{ChatSession, NewChatSession};
use sparrow_core::error::{Result, SparrowError};
use sparrow_core::gateway::SessionGateway;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct SessionListState {
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
}

/// Manages the cached session list and the active selection.
///
/// `SessionService` is responsible for:
/// - Refreshing the list from the backend
/// - Creating new sessions (inserted at the top and selected)
/// - Deleting sessions (clearing the selection when it was the deleted one)
/// - Switching the selection
pub struct SessionService {
    gateway: Arc<dyn SessionGateway>,
    state: RwLock<SessionListState>,
}

impl SessionService {
    pub fn new(gateway: Arc<dyn SessionGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(SessionListState::default()),
        }
    }

    /// Replaces the cached list with the backend's current sessions.
    ///
    /// A selection pointing at a session that no longer exists is cleared.
    pub async fn refresh(&self) -> Result<Vec<ChatSession>> {
        let sessions = self.gateway.list().await?;

        let mut state = self.state.write().await;
        if let Some(active_id) = state.active_id.clone() {
            if !sessions.iter().any(|session| session.id == active_id) {
                state.active_id = None;
            }
        }
        state.sessions = sessions.clone();
        Ok(sessions)
    }

    /// Returns the cached session list.
    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.state.read().await.sessions.clone()
    }

    /// Returns the currently selected session, if any.
    pub async fn active(&self) -> Option<ChatSession> {
        let state = self.state.read().await;
        let active_id = state.active_id.as_deref()?;
        state
            .sessions
            .iter()
            .find(|session| session.id == active_id)
            .cloned()
    }

    /// Returns the id of the currently selected session.
    pub async fn active_id(&self) -> Option<String> {
        self.state.read().await.active_id.clone()
    }

    /// Selects a session from the cached list.
    pub async fn select(&self, session_id: &str) -> Result<ChatSession> {
        let mut state = self.state.write().await;
        let session = state
            .sessions
            .iter()
            .find(|session| session.id == session_id)
            .cloned()
            .ok_or_else(|| SparrowError::not_found("ChatSession", session_id))?;
        state.active_id = Some(session.id.clone());
        Ok(session)
    }

    /// Creates a session, inserts it at the top of the list, and selects it.
    pub async fn create(
        &self,
        title: impl Into<String>,
        agent_type: AgentType,
    ) -> Result<ChatSession> {
        let session = self
            .gateway
            .create(NewChatSession::new(title, agent_type))
            .await?;

        let mut state = self.state.write().await;
        state.sessions.insert(0, session.clone());
        state.active_id = Some(session.id.clone());
        Ok(session)
    }

    /// Renames a session and updates the cached entry in place.
    pub async fn rename(&self, session_id: &str, title: &str) -> Result<ChatSession> {
        let updated = self.gateway.rename(session_id, title).await?;

        let mut state = self.state.write().await;
        if let Some(entry) = state
            .sessions
            .iter_mut()
            .find(|session| session.id == session_id)
        {
            *entry = updated.clone();
        }
        Ok(updated)
    }

    /// Deletes a session. Deleting the selected session clears the selection.
    pub async fn delete(&self, session_id: &str) -> Result<()> {
        self.gateway.delete(session_id).await?;

        let mut state = self.state.write().await;
        state.sessions.retain(|session| session.id != session_id);
        if state.active_id.as_deref() == Some(session_id) {
            state.active_id = None;
        }
        Ok(())
    }
}
