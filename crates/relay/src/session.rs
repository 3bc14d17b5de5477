//! Per-upstream-connection ingestion pipeline.
//!
//! One [`IngestionSession`] exists per accepted DAQ connection. It owns
//! that connection's [`AnomalyWindow`] and drives the subscriber registry:
//! every inbound frame is announced, decoded, validated, and acted on as
//! an explicit state-machine transition, so the whole pipeline is testable
//! without sockets via [`handle_frame`](IngestionSession::handle_frame),
//! [`handle_end`](IngestionSession::handle_end), and
//! [`handle_transport_error`](IngestionSession::handle_transport_error).

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;

use voltline_core::anomaly::AnomalyWindow;
use voltline_core::notices::{
    NOTICE_INVALID_TEMPERATURE, NOTICE_MALFORMED_FRAME, NOTICE_OUT_OF_RANGE,
    NOTICE_SUSTAINED_ANOMALY,
};
use voltline_core::protocol::OutboundMessage;
use voltline_core::reading::{classify, decode_frame, Classification};

use crate::registry::SubscriberRegistry;

/// Lifecycle state of one ingestion session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected and consuming frames.
    Active,
    /// The upstream ended or errored; no further transitions occur.
    Closed,
}

/// State and behavior for one upstream telemetry connection.
pub struct IngestionSession {
    peer: SocketAddr,
    state: SessionState,
    window: AnomalyWindow,
    registry: Arc<SubscriberRegistry>,
}

impl IngestionSession {
    /// Create a session for a newly accepted upstream connection.
    pub fn new(peer: SocketAddr, registry: Arc<SubscriberRegistry>) -> Self {
        Self {
            peer,
            state: SessionState::Active,
            window: AnomalyWindow::new(),
            registry,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session over a connected upstream socket until it ends.
    ///
    /// Frames are newline-delimited JSON. A read error (including invalid
    /// UTF-8 on the line) closes the session without any subscriber
    /// notification; a graceful end-of-stream announces the feed as down.
    pub async fn run(mut self, stream: TcpStream) {
        let mut lines = BufReader::new(stream).lines();

        while self.state == SessionState::Active {
            match lines.next_line().await {
                Ok(Some(line)) => self.handle_frame(&line).await,
                Ok(None) => self.handle_end().await,
                Err(e) => self.handle_transport_error(&e).await,
            }
        }
    }

    /// Process one inbound frame.
    ///
    /// The liveness announcement goes out once per frame, not once per
    /// connection: the dashboard treats each announcement as "the feed is
    /// active right now", so it must be repeated on every frame.
    pub async fn handle_frame(&mut self, raw: &str) {
        if self.state != SessionState::Active {
            return;
        }

        let raw = raw.trim();
        if raw.is_empty() {
            // A blank line is not a frame; nothing is announced.
            return;
        }

        self.registry.publish(&OutboundMessage::status(true)).await;
        tracing::debug!(peer = %self.peer, raw, "Received telemetry frame");

        let frame = match decode_frame(raw) {
            Ok(frame) => frame,
            Err(e) => {
                // Fatal to this frame only; the session keeps consuming.
                tracing::warn!(peer = %self.peer, error = %e, "Dropping undecodable frame");
                self.registry
                    .publish(&OutboundMessage::notice(NOTICE_MALFORMED_FRAME))
                    .await;
                return;
            }
        };

        match classify(&frame) {
            Classification::Malformed => {
                tracing::warn!(
                    peer = %self.peer,
                    value = %frame.battery_temperature,
                    "Invalid battery temperature"
                );
                self.registry
                    .publish(&OutboundMessage::notice(NOTICE_INVALID_TEMPERATURE))
                    .await;
            }
            Classification::OutOfRange(reading) => {
                tracing::warn!(
                    peer = %self.peer,
                    temperature = %reading.battery_temperature,
                    "Battery temperature out of range"
                );
                self.registry
                    .publish(&OutboundMessage::notice(NOTICE_OUT_OF_RANGE))
                    .await;

                if self.window.observe(reading.timestamp) {
                    tracing::error!(
                        peer = %self.peer,
                        recent = self.window.len(),
                        "Sustained battery temperature anomaly"
                    );
                    self.registry
                        .publish(&OutboundMessage::notice(NOTICE_SUSTAINED_ANOMALY))
                        .await;
                }

                // Out-of-range readings are still forwarded, after the notices.
                self.registry.publish(&OutboundMessage::reading(reading)).await;
            }
            Classification::InRange(reading) => {
                self.registry.publish(&OutboundMessage::reading(reading)).await;
            }
        }
    }

    /// Graceful end-of-stream: announce the feed as down and close.
    pub async fn handle_end(&mut self) {
        if self.state != SessionState::Active {
            return;
        }

        tracing::info!(peer = %self.peer, "Upstream connection ended");
        self.registry.publish(&OutboundMessage::status(false)).await;
        self.state = SessionState::Closed;
    }

    /// Transport error: close without any subscriber notification.
    ///
    /// Only a graceful end announces the feed as down; an errored
    /// connection is logged and torn down silently.
    pub async fn handle_transport_error(&mut self, error: &std::io::Error) {
        if self.state != SessionState::Active {
            return;
        }

        tracing::error!(peer = %self.peer, error = %error, "Upstream transport error");
        self.state = SessionState::Closed;
    }
}
