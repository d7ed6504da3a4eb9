//! Streaming event reader for the research endpoint.
//!
//! The backend emits an event-stream-style body: frames separated by a blank
//! line, each carrying a `data: {json}` payload with a `type` discriminator.
//! Frame splitting is done by a pure incremental parser so it can be tested
//! without a socket; the async reader drives it from a byte stream.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use sparrow_core::chat::StreamEvent;
use sparrow_core::error::{Result, SparrowError};
use sparrow_core::gateway::EventSource;
use std::collections::VecDeque;

/// Incremental parser for blank-line-delimited `data:` frames.
///
/// Bytes are appended as decoded text; complete frames are returned as soon
/// as their terminating blank line arrives. Lines without a `data:` prefix
/// (comments, keep-alives) are dropped.
#[derive(Debug, Default)]
pub struct SseFrameParser {
    buffer: String,
}

impl SseFrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk of decoded text and returns completed data payloads.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);

        let mut payloads = Vec::new();
        while let Some(boundary) = self.buffer.find("\n\n") {
            let frame: String = self.buffer.drain(..boundary + 2).collect();
            if let Some(payload) = Self::extract_data(&frame) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Flushes a trailing frame that was never terminated by a blank line.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        Self::extract_data(&rest)
    }

    fn extract_data(frame: &str) -> Option<String> {
        let data_lines: Vec<&str> = frame
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
            .collect();

        if data_lines.is_empty() {
            None
        } else {
            Some(data_lines.join("\n"))
        }
    }
}

/// Pull-based reader over a streaming research response.
///
/// Any transport error, JSON parse failure, or unknown event type ends the
/// stream with an error; events decoded before the failure have already been
/// handed to the caller.
pub struct ResearchStream<S> {
    inner: S,
    parser: SseFrameParser,
    pending: VecDeque<String>,
    done: bool,
}

impl<S, E> ResearchStream<S>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin + Send,
    E: std::fmt::Display,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            parser: SseFrameParser::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    /// Returns the next decoded event, or `None` at end of stream.
    pub async fn next_event(&mut self) -> Result<Option<StreamEvent>> {
        loop {
            if let Some(payload) = self.pending.pop_front() {
                return Self::decode(&payload).map(Some);
            }

            if self.done {
                return Ok(None);
            }

            match self.inner.next().await {
                Some(Ok(chunk)) => {
                    let text = String::from_utf8_lossy(&chunk);
                    self.pending.extend(self.parser.push(&text));
                }
                Some(Err(err)) => {
                    self.done = true;
                    return Err(SparrowError::stream(format!("stream read failed: {err}")));
                }
                None => {
                    self.done = true;
                    if let Some(payload) = self.parser.finish() {
                        self.pending.push_back(payload);
                    }
                }
            }
        }
    }

    fn decode(payload: &str) -> Result<StreamEvent> {
        serde_json::from_str::<StreamEvent>(payload)
            .map_err(|err| SparrowError::stream(format!("bad stream frame: {err}")))
    }
}

/// Wraps a reqwest response body into a [`ResearchStream`].
pub fn from_response(
    response: reqwest::Response,
) -> ResearchStream<impl Stream<Item = reqwest::Result<Bytes>> + Unpin + Send> {
    ResearchStream::new(response.bytes_stream().boxed())
}

#[async_trait]
impl<S, E> EventSource for ResearchStream<S>
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin + Send,
    E: std::fmt::Display + Send,
{
    async fn next_event(&mut self) -> Result<Option<StreamEvent>> {
        ResearchStream::next_event(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunked(parts: Vec<&str>) -> impl Stream<Item = std::result::Result<Bytes, String>> + Unpin {
        stream::iter(
            parts
                .into_iter()
                .map(|part| Ok(Bytes::copy_from_slice(part.as_bytes())))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_parser_splits_frames() {
        let mut parser = SseFrameParser::new();
        let payloads = parser.push("data: one\n\ndata: two\n\n");
        assert_eq!(payloads, vec!["one", "two"]);
    }

    #[test]
    fn test_parser_handles_partial_frames() {
        let mut parser = SseFrameParser::new();
        assert!(parser.push("data: {\"type\":").is_empty());
        let payloads = parser.push(" \"step\"}\n\n");
        assert_eq!(payloads, vec![r#"{"type": "step"}"#]);
    }

    #[test]
    fn test_parser_drops_comment_frames() {
        let mut parser = SseFrameParser::new();
        assert!(parser.push(": keep-alive\n\n").is_empty());
        assert_eq!(parser.push("data: x\n\n"), vec!["x"]);
    }

    #[test]
    fn test_parser_finish_flushes_trailing_frame() {
        let mut parser = SseFrameParser::new();
        assert!(parser.push("data: tail\n").is_empty());
        assert_eq!(parser.finish(), Some("tail".to_string()));
        assert_eq!(parser.finish(), None);
    }

    #[tokio::test]
    async fn test_step_then_message_in_order() {
        let body = concat!(
            "data: {\"type\": \"step\", \"title\": \"Searching\"}\n\n",
            "data: {\"type\": \"message\", \"content\": \"All done.\"}\n\n",
        );
        let mut reader = ResearchStream::new(chunked(vec![body]));

        let first = reader.next_event().await.unwrap().unwrap();
        assert!(matches!(first, StreamEvent::Step(_)));

        let second = reader.next_event().await.unwrap().unwrap();
        match second {
            StreamEvent::Message(msg) => assert_eq!(msg.content, "All done."),
            other => panic!("expected message, got {other:?}"),
        }

        assert!(reader.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_frame_split_across_chunks() {
        let mut reader = ResearchStream::new(chunked(vec![
            "data: {\"type\": \"message\",",
            " \"content\": \"hi\"}\n\n",
        ]));

        let event = reader.next_event().await.unwrap().unwrap();
        match event {
            StreamEvent::Message(msg) => assert_eq!(msg.content, "hi"),
            other => panic!("expected message, got {other:?}"),
        }
        assert!(reader.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_frame_aborts_after_earlier_events() {
        let body = concat!(
            "data: {\"type\": \"step\", \"title\": \"ok\"}\n\n",
            "data: {not json}\n\n",
        );
        let mut reader = ResearchStream::new(chunked(vec![body]));

        assert!(matches!(
            reader.next_event().await.unwrap(),
            Some(StreamEvent::Step(_))
        ));
        let err = reader.next_event().await.unwrap_err();
        assert!(matches!(err, SparrowError::Stream(_)));
    }

    #[tokio::test]
    async fn test_transport_error_surfaces_as_stream_error() {
        let inner = stream::iter(vec![
            Ok(Bytes::from_static(b"data: {\"type\": \"message\", \"content\": \"a\"}\n\n")),
            Err("connection reset".to_string()),
        ]);
        let mut reader = ResearchStream::new(inner);

        assert!(reader.next_event().await.unwrap().is_some());
        let err = reader.next_event().await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
