//! Upstream TCP listener.
//!
//! Accepts vehicle DAQ connections and spawns one
//! [`IngestionSession`](crate::session::IngestionSession) task per
//! connection. Sessions are independent: an error on one connection never
//! affects another.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::registry::SubscriberRegistry;
use crate::session::IngestionSession;

/// Accept upstream connections until cancelled.
///
/// There is no backlog or rate limiting; any number of concurrent
/// upstream connections is accepted. Cancellation stops accepting new
/// connections but leaves in-flight sessions to their own lifecycles.
pub async fn run(
    listener: TcpListener,
    registry: Arc<SubscriberRegistry>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!("Ingest listener stopping");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tracing::info!(%peer, "Upstream DAQ connected");
                    let session = IngestionSession::new(peer, Arc::clone(&registry));
                    tokio::spawn(session.run(stream));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to accept upstream connection");
                }
            }
        }
    }
}
