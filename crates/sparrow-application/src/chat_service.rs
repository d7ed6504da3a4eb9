//! Chat transcript state and streaming sends.
//!
//! A send appends the operator message, opens the research stream, and
//! appends `step`/`message` events in arrival order. Sends are keyed per
//! session through the request manager, so a newer send supersedes an
//! in-flight one for the same session.

use sparrow_core::agent::AgentType;
use sparrow_core::analysis::ResearchStep;
use sparrow_core::chat::{ChatMessage, FeedbackRating, StreamEvent};
use sparrow_core::error::{Result, SparrowError};
use sparrow_core::gateway::ChatGateway;
use sparrow_client::RequestManager;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const STREAM_PATH: &str = "/agent/research/stream";

/// In-memory transcript for one session: ordered messages plus the research
/// steps of the latest run.
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    pub messages: Vec<ChatMessage>,
    pub steps: Vec<ResearchStep>,
}

/// What a completed send produced.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub user_message: ChatMessage,
    pub new_messages: Vec<ChatMessage>,
    pub steps: Vec<ResearchStep>,
}

/// Manages chat transcripts and streaming sends.
pub struct ChatService {
    gateway: Arc<dyn ChatGateway>,
    requests: RequestManager,
    transcripts: RwLock<HashMap<String, ChatTranscript>>,
}

impl ChatService {
    pub fn new(gateway: Arc<dyn ChatGateway>, requests: RequestManager) -> Self {
        Self {
            gateway,
            requests,
            transcripts: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a copy of the transcript for a session.
    pub async fn transcript(&self, session_id: &str) -> ChatTranscript {
        self.transcripts
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Drops the cached transcript for a session (after deletion).
    pub async fn forget(&self, session_id: &str) {
        self.transcripts.write().await.remove(session_id);
    }

    /// Cancels an in-flight send for a session. Returns whether one existed.
    pub async fn cancel_send(&self, session_id: &str) -> bool {
        self.requests.cancel(&request_key(session_id)).await
    }

    /// Sends operator input on a session and consumes the response stream.
    ///
    /// `on_event` fires for every decoded event so the console can render
    /// progress live. Steps from a previous run are cleared when the new
    /// send starts. Starting a send while another is in flight for the same
    /// session cancels the older one.
    pub async fn send<F>(
        &self,
        session_id: &str,
        text: &str,
        agent_type: AgentType,
        mut on_event: F,
    ) -> Result<SendOutcome>
    where
        F: FnMut(&StreamEvent) + Send,
    {
        let user_message = ChatMessage::user(text);
        {
            let mut transcripts = self.transcripts.write().await;
            let transcript = transcripts.entry(session_id.to_string()).or_default();
            transcript.messages.push(user_message.clone());
            transcript.steps.clear();
        }

        let key = request_key(session_id);
        let token = self.requests.begin(key.clone(), STREAM_PATH).await;

        let result = tokio::select! {
            _ = token.cancelled() => {
                Err(SparrowError::Cancelled(format!(
                    "send superseded for session {session_id}"
                )))
            }
            result = self.drive_stream(session_id, text, agent_type, &mut on_event) => result,
        };

        if !token.is_cancelled() {
            self.requests.complete(&key).await;
        }

        match result {
            Ok((new_messages, steps)) => Ok(SendOutcome {
                user_message,
                new_messages,
                steps,
            }),
            Err(err) => {
                if !err.is_cancelled() {
                    let notice = ChatMessage::system(format!("Request failed: {err}"));
                    let mut transcripts = self.transcripts.write().await;
                    transcripts
                        .entry(session_id.to_string())
                        .or_default()
                        .messages
                        .push(notice);
                }
                Err(err)
            }
        }
    }

    async fn drive_stream<F>(
        &self,
        session_id: &str,
        text: &str,
        agent_type: AgentType,
        on_event: &mut F,
    ) -> Result<(Vec<ChatMessage>, Vec<ResearchStep>)>
    where
        F: FnMut(&StreamEvent) + Send,
    {
        let mut source = self.gateway.start_stream(session_id, text).await?;

        let mut new_messages = Vec::new();
        let mut steps = Vec::new();

        while let Some(event) = source.next_event().await? {
            on_event(&event);
            match &event {
                StreamEvent::Step(step) => {
                    steps.push(step.clone());
                    let mut transcripts = self.transcripts.write().await;
                    transcripts
                        .entry(session_id.to_string())
                        .or_default()
                        .steps
                        .push(step.clone());
                }
                StreamEvent::Message(payload) => {
                    let mut message = ChatMessage::assistant(payload.content.clone(), agent_type);
                    if let Some(id) = &payload.message_id {
                        message.id = id.clone();
                    }
                    new_messages.push(message.clone());
                    let mut transcripts = self.transcripts.write().await;
                    transcripts
                        .entry(session_id.to_string())
                        .or_default()
                        .messages
                        .push(message);
                }
            }
        }

        Ok((new_messages, steps))
    }

    /// Records feedback on a message, both backend-side and in the cached
    /// transcript.
    pub async fn attach_feedback(
        &self,
        session_id: &str,
        message_id: &str,
        rating: FeedbackRating,
    ) -> Result<()> {
        self.gateway.send_feedback(message_id, rating).await?;

        let mut transcripts = self.transcripts.write().await;
        let transcript = transcripts
            .get_mut(session_id)
            .ok_or_else(|| SparrowError::not_found("ChatTranscript", session_id))?;
        let message = transcript
            .messages
            .iter_mut()
            .find(|message| message.id == message_id)
            .ok_or_else(|| SparrowError::not_found("ChatMessage", message_id))?;
        message.feedback = Some(rating);
        Ok(())
    }
}

fn request_key(session_id: &str) -> String {
    format!("chat:{session_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sparrow_core::chat::StreamMessage;
    use sparrow_core::gateway::EventSource;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedSource {
        events: VecDeque<Result<Option<StreamEvent>>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl EventSource for ScriptedSource {
        async fn next_event(&mut self) -> Result<Option<StreamEvent>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.events.pop_front().unwrap_or(Ok(None))
        }
    }

    struct MockChatGateway {
        scripts: Mutex<VecDeque<Vec<Result<Option<StreamEvent>>>>>,
        delay: Option<Duration>,
        feedback: Mutex<Vec<(String, FeedbackRating)>>,
    }

    impl MockChatGateway {
        fn new(script: Vec<Result<Option<StreamEvent>>>) -> Self {
            Self {
                scripts: Mutex::new(VecDeque::from([script])),
                delay: None,
                feedback: Mutex::new(Vec::new()),
            }
        }

        fn slow(script: Vec<Result<Option<StreamEvent>>>) -> Self {
            Self {
                scripts: Mutex::new(VecDeque::from([script])),
                delay: Some(Duration::from_secs(60)),
                feedback: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatGateway for MockChatGateway {
        async fn start_stream(
            &self,
            _session_id: &str,
            _prompt: &str,
        ) -> Result<Box<dyn EventSource>> {
            let script = self
                .scripts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default();
            Ok(Box::new(ScriptedSource {
                events: script.into(),
                delay: self.delay,
            }))
        }

        async fn send_feedback(&self, message_id: &str, rating: FeedbackRating) -> Result<()> {
            self.feedback
                .lock()
                .unwrap()
                .push((message_id.to_string(), rating));
            Ok(())
        }
    }

    fn step(title: &str) -> StreamEvent {
        StreamEvent::Step(ResearchStep {
            title: Some(title.to_string()),
            ..Default::default()
        })
    }

    fn message(content: &str) -> StreamEvent {
        StreamEvent::Message(StreamMessage {
            content: content.to_string(),
            message_id: None,
        })
    }

    #[tokio::test]
    async fn test_send_appends_step_then_message_in_order() {
        let gateway = Arc::new(MockChatGateway::new(vec![
            Ok(Some(step("Searching"))),
            Ok(Some(message("Here is what I found."))),
            Ok(None),
        ]));
        let service = ChatService::new(gateway, RequestManager::new());

        let mut seen = Vec::new();
        let outcome = service
            .send("s1", "why is IMAP failing?", AgentType::Research, |event| {
                seen.push(event.clone());
            })
            .await
            .unwrap();

        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.new_messages.len(), 1);
        assert!(matches!(seen[0], StreamEvent::Step(_)));
        assert!(matches!(seen[1], StreamEvent::Message(_)));

        let transcript = service.transcript("s1").await;
        // user message + assistant message, in order
        assert_eq!(transcript.messages.len(), 2);
        assert_eq!(transcript.messages[1].content, "Here is what I found.");
        assert_eq!(transcript.steps.len(), 1);
    }

    #[tokio::test]
    async fn test_stream_error_appends_system_notice() {
        let gateway = Arc::new(MockChatGateway::new(vec![
            Ok(Some(step("Searching"))),
            Err(SparrowError::stream("bad frame")),
        ]));
        let service = ChatService::new(gateway, RequestManager::new());

        let err = service
            .send("s1", "hello", AgentType::Research, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, SparrowError::Stream(_)));

        let transcript = service.transcript("s1").await;
        // user message + system error notice; the step arrived before the failure
        assert_eq!(transcript.messages.len(), 2);
        assert!(transcript.messages[1].content.contains("Request failed"));
        assert_eq!(transcript.steps.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_second_send_supersedes_first() {
        let gateway = Arc::new(MockChatGateway::slow(vec![Ok(Some(message("late")))]));
        let requests = RequestManager::new();
        let service = Arc::new(ChatService::new(gateway, requests));

        let background = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .send("s1", "first", AgentType::Primary, |_| {})
                    .await
            })
        };

        // Give the first send time to register its request.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(service.cancel_send("s1").await);

        let result = background.await.unwrap();
        assert!(matches!(result, Err(SparrowError::Cancelled(_))));
    }

    #[tokio::test]
    async fn test_attach_feedback_marks_message() {
        let gateway = Arc::new(MockChatGateway::new(vec![
            Ok(Some(message("answer"))),
            Ok(None),
        ]));
        let service = ChatService::new(gateway.clone(), RequestManager::new());

        let outcome = service
            .send("s1", "question", AgentType::Primary, |_| {})
            .await
            .unwrap();
        let message_id = outcome.new_messages[0].id.clone();

        service
            .attach_feedback("s1", &message_id, FeedbackRating::Positive)
            .await
            .unwrap();

        let transcript = service.transcript("s1").await;
        assert_eq!(
            transcript.messages[1].feedback,
            Some(FeedbackRating::Positive)
        );
        assert_eq!(gateway.feedback.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_new_send_clears_previous_steps() {
        let gateway = Arc::new(MockChatGateway::new(vec![
            Ok(Some(step("one"))),
            Ok(None),
        ]));
        {
            gateway
                .scripts
                .lock()
                .unwrap()
                .push_back(vec![Ok(Some(message("done"))), Ok(None)]);
        }
        let service = ChatService::new(gateway, RequestManager::new());

        service
            .send("s1", "first", AgentType::Research, |_| {})
            .await
            .unwrap();
        assert_eq!(service.transcript("s1").await.steps.len(), 1);

        service
            .send("s1", "second", AgentType::Research, |_| {})
            .await
            .unwrap();
        assert!(service.transcript("s1").await.steps.is_empty());
    }
}
