use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use voltline_core::protocol::OutboundMessage;

/// Channel sender half for pushing messages to a subscriber connection.
pub type SubscriberSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single subscriber connection.
pub struct Subscriber {
    /// Channel sender for outbound messages to this connection.
    pub sender: SubscriberSender,
    /// When this subscriber connected.
    pub connected_at: chrono::DateTime<chrono::Utc>,
}

/// Holds every live subscriber connection and fans messages out to them.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared between the ingestion sessions and the subscriber listener.
/// Delivery is at-most-once and best-effort: a subscriber whose channel
/// has closed is skipped, never queued for or retried.
pub struct SubscriberRegistry {
    connections: RwLock<HashMap<String, Subscriber>>,
}

impl SubscriberRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new subscriber connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink. Messages broadcast before
    /// registration are never replayed.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscriber = Subscriber {
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, subscriber);
        rx
    }

    /// Remove a subscriber by its connection ID.
    ///
    /// Invoked reactively when the subscriber's transport reports closure.
    pub async fn remove(&self, conn_id: &str) {
        if let Some(subscriber) = self.connections.write().await.remove(conn_id) {
            let connected_secs = (chrono::Utc::now() - subscriber.connected_at).num_seconds();
            tracing::debug!(conn_id, connected_secs, "Subscriber removed");
        }
    }

    /// Broadcast a raw WebSocket message to every subscriber.
    ///
    /// Subscribers whose send channels are closed are silently skipped
    /// (they will be cleaned up by their own receive loops). FIFO order is
    /// preserved per subscriber; no ordering is guaranteed across
    /// subscribers.
    pub async fn broadcast(&self, message: Message) {
        let conns = self.connections.read().await;
        for subscriber in conns.values() {
            let _ = subscriber.sender.send(message.clone());
        }
    }

    /// Serialize an [`OutboundMessage`] once and broadcast it as a text
    /// frame to every subscriber.
    pub async fn publish(&self, message: &OutboundMessage) {
        self.broadcast(Message::Text(message.to_text().into())).await;
    }

    /// Return the current number of live subscribers.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every subscriber, then clear the registry.
    ///
    /// Used during graceful shutdown to notify all dashboards before the
    /// process stops.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for subscriber in conns.values() {
            let _ = subscriber.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all subscriber connections");
    }

    /// Send a Ping frame to every subscriber.
    ///
    /// Used by the heartbeat task to keep connections alive and surface
    /// dead ones at the transport layer.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for subscriber in conns.values() {
            let _ = subscriber.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
