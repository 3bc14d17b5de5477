use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::registry::SubscriberRegistry;
use crate::state::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with the
/// [`SubscriberRegistry`] and managed by two tasks (sender + receiver).
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.registry))
}

/// Manage a single subscriber connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with the registry.
///   2. Spawns a sender task that forwards broadcast messages to the sink.
///   3. Drains inbound messages on the current task — the subscriber
///      channel is receive-only, so everything except Close is ignored.
///   4. Deregisters on disconnect.
async fn handle_socket(socket: WebSocket, registry: Arc<SubscriberRegistry>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Subscriber connected");

    // Register and get the receiver for outbound messages.
    let mut rx = registry.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward broadcast messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "Subscriber sink closed");
                break;
            }
        }
    });

    // Receiver loop: drain inbound messages until the connection drops.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_msg) => {
                // No subscriber-to-relay commands exist; drop it.
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "Subscriber receive error");
                break;
            }
        }
    }

    // Clean up: deregister and abort the sender task.
    registry.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Subscriber disconnected");
}
