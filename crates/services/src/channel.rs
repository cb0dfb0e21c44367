//! The session channel: one bidirectional connection to the question server.
//!
//! Inbound frames are decoded into [`ServerMessage`]s in arrival order;
//! frames that fail to decode are logged and skipped. Outbound sends are
//! fire-and-forget: a send on a channel that is not open is a logged no-op.
//! There is no heartbeat, no reconnect and no backoff; once the transport
//! closes or errors the session is over.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use quiz_core::model::AnswerSubmission;
use quiz_core::protocol::ServerMessage;

use crate::error::ChannelError;

//
// ─── TRANSPORT SEAM ────────────────────────────────────────────────────────────
//

/// Text-frame transport under the session channel.
///
/// The channel owns decoding and lifecycle; implementations only move raw
/// frames. `ScriptedTransport` backs the tests.
#[async_trait]
pub trait MessageTransport: Send {
    /// Send one text frame.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Transport` if the frame cannot be written.
    async fn send_text(&mut self, text: String) -> Result<(), ChannelError>;

    /// Receive the next text frame; `None` once the peer has closed.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Transport` on connection failures.
    async fn next_text(&mut self) -> Result<Option<String>, ChannelError>;

    /// Close the connection. Safe to call in any state.
    async fn close(&mut self);
}

/// WebSocket transport over tokio-tungstenite.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTransport {
    /// Open a connection to the question server.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Connect` if the handshake fails.
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let (stream, _response) = connect_async(url)
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        Ok(Self { stream })
    }
}

#[async_trait]
impl MessageTransport for WsTransport {
    async fn send_text(&mut self, text: String) -> Result<(), ChannelError> {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))
    }

    async fn next_text(&mut self) -> Result<Option<String>, ChannelError> {
        loop {
            match self.stream.next().await {
                None => return Ok(None),
                Some(Err(e)) => return Err(ChannelError::Transport(e.to_string())),
                Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                Some(Ok(Message::Close(_))) => return Ok(None),
                // Control and binary frames carry nothing for this protocol.
                Some(Ok(_)) => {}
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}

//
// ─── SESSION CHANNEL ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelState {
    Open,
    Closed,
}

/// Exclusively owned message connection for one quiz session.
pub struct SessionChannel {
    transport: Box<dyn MessageTransport>,
    state: ChannelState,
}

impl SessionChannel {
    /// Connect to the question server at `url`.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Connect` if the connection cannot be opened.
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let transport = WsTransport::connect(url).await?;
        Ok(Self::over(Box::new(transport)))
    }

    /// Wrap an already-open transport. Test seam.
    #[must_use]
    pub fn over(transport: Box<dyn MessageTransport>) -> Self {
        Self {
            transport,
            state: ChannelState::Open,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    /// Next decoded message in arrival order.
    ///
    /// Frames with an unrecognized `type` or a payload that does not
    /// decode are logged and skipped. Returns `None` once the transport
    /// closes or errors; either way the channel is closed afterwards and
    /// the session is effectively dead (no reconnect).
    pub async fn next_message(&mut self) -> Option<ServerMessage> {
        loop {
            if self.state == ChannelState::Closed {
                return None;
            }

            let raw = match self.transport.next_text().await {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    self.state = ChannelState::Closed;
                    return None;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "session channel failed");
                    self.state = ChannelState::Closed;
                    return None;
                }
            };

            match ServerMessage::decode(&raw) {
                Ok(message) => return Some(message),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding undecodable message");
                }
            }
        }
    }

    /// Forward one answer submission, fire-and-forget.
    ///
    /// If the channel is not open the submission is dropped and logged;
    /// there is no retry and no error surfaces to the caller.
    pub async fn send(&mut self, submission: &AnswerSubmission) {
        if self.state != ChannelState::Open {
            tracing::warn!("dropping answer submission: channel is not open");
            return;
        }

        let text = match submission.to_wire() {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "failed to encode answer submission");
                return;
            }
        };

        if let Err(err) = self.transport.send_text(text).await {
            tracing::warn!(error = %err, "failed to forward answer submission");
            self.state = ChannelState::Closed;
        }
    }

    /// Tear the channel down unconditionally, regardless of state.
    pub async fn close(&mut self) {
        self.transport.close().await;
        self.state = ChannelState::Closed;
    }
}

//
// ─── SCRIPTED TRANSPORT (TEST DOUBLE) ──────────────────────────────────────────
//

/// In-memory transport replaying a fixed inbound script, for tests and
/// prototyping. Sent frames are captured in a shared log.
pub struct ScriptedTransport {
    inbound: VecDeque<String>,
    sent: Arc<Mutex<Vec<String>>>,
    open: bool,
}

impl ScriptedTransport {
    /// Transport that will deliver `script` in order, then report the peer
    /// as closed.
    #[must_use]
    pub fn new<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inbound: script.into_iter().map(Into::into).collect(),
            sent: Arc::new(Mutex::new(Vec::new())),
            open: true,
        }
    }

    /// Transport whose connection is already gone.
    #[must_use]
    pub fn disconnected() -> Self {
        let mut transport = Self::new(Vec::<String>::new());
        transport.open = false;
        transport
    }

    /// Handle on the outbound frame log; clone before boxing.
    #[must_use]
    pub fn sent_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.sent)
    }
}

#[async_trait]
impl MessageTransport for ScriptedTransport {
    async fn send_text(&mut self, text: String) -> Result<(), ChannelError> {
        if !self.open {
            return Err(ChannelError::Transport("transport is closed".into()));
        }
        self.sent
            .lock()
            .map_err(|e| ChannelError::Transport(e.to_string()))?
            .push(text);
        Ok(())
    }

    async fn next_text(&mut self) -> Result<Option<String>, ChannelError> {
        if !self.open {
            return Ok(None);
        }
        Ok(self.inbound.pop_front())
    }

    async fn close(&mut self) {
        self.open = false;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::OptionKey;

    const QUESTION: &str = r#"{"type":"question","data":{
        "id": 1,
        "question": "2+2?",
        "options": {"A": "3", "B": "4"},
        "correctAnswer": "B",
        "difficulty": "Easy",
        "related_topics": ["Math"]
    }}"#;

    const REPORT: &str = r#"{"type":"report","data":{
        "total_questions": 1,
        "total_correct": 1,
        "total_wrong": 0,
        "overall_accuracy": 1.0,
        "average_time": 2.5
    }}"#;

    fn submission() -> AnswerSubmission {
        AnswerSubmission::new(OptionKey::new("B"), 2.5)
    }

    #[tokio::test]
    async fn delivers_messages_in_arrival_order() {
        let mut channel = SessionChannel::over(Box::new(ScriptedTransport::new([
            QUESTION, REPORT,
        ])));

        assert!(matches!(
            channel.next_message().await,
            Some(ServerMessage::Question(_))
        ));
        assert!(matches!(
            channel.next_message().await,
            Some(ServerMessage::Report(_))
        ));
        assert!(channel.next_message().await.is_none());
        assert!(!channel.is_open());
    }

    #[tokio::test]
    async fn unknown_and_malformed_frames_are_skipped() {
        let mut channel = SessionChannel::over(Box::new(ScriptedTransport::new([
            r#"{"type":"heartbeat","data":{}}"#,
            "{not json",
            QUESTION,
        ])));

        assert!(matches!(
            channel.next_message().await,
            Some(ServerMessage::Question(_))
        ));
    }

    #[tokio::test]
    async fn send_forwards_the_wire_shape() {
        let transport = ScriptedTransport::new([QUESTION]);
        let sent = transport.sent_log();
        let mut channel = SessionChannel::over(Box::new(transport));

        channel.send(&submission()).await;

        let log = sent.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0], r#"{"answer":"B","time_taken":2.5}"#);
    }

    #[tokio::test]
    async fn send_on_closed_channel_is_a_noop() {
        let transport = ScriptedTransport::disconnected();
        let sent = transport.sent_log();
        let mut channel = SessionChannel::over(Box::new(transport));

        // Drain: the transport reports the peer as gone.
        assert!(channel.next_message().await.is_none());
        channel.send(&submission()).await;

        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn close_is_unconditional_and_idempotent() {
        let mut channel = SessionChannel::over(Box::new(ScriptedTransport::new([QUESTION])));
        channel.close().await;
        channel.close().await;
        assert!(!channel.is_open());
        assert!(channel.next_message().await.is_none());
    }
}
