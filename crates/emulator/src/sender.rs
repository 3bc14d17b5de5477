//! TCP connection and telemetry push loop.
//!
//! Connects to the relay ingest port, emits one newline-delimited reading
//! per interval via [`ReadingGenerator`](crate::generator::ReadingGenerator),
//! and reconnects with a fixed delay when the connection drops.

use std::time::Duration;

use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::generator::ReadingGenerator;

/// Reconnection delay after a connection failure.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Run the telemetry push loop indefinitely.
///
/// This function never returns under normal operation. It reconnects
/// with a fixed delay if the TCP connection drops.
pub async fn run(addr: &str, interval: Duration, generator: &mut ReadingGenerator) {
    loop {
        tracing::info!(addr = %addr, "Connecting to relay ingest port");

        match TcpStream::connect(addr).await {
            Ok(stream) => {
                tracing::info!("Ingest connection established");
                run_session(stream, interval, generator).await;
                tracing::warn!("Ingest session ended, reconnecting");
            }
            Err(e) => {
                tracing::error!(error = %e, "Ingest connection failed");
            }
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

/// Drive a single connection: emit one frame per tick until a write fails.
async fn run_session(mut stream: TcpStream, interval: Duration, generator: &mut ReadingGenerator) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let line = generator.next_line(Utc::now().timestamp_millis());
        tracing::debug!(line = %line, "Sending reading");

        if let Err(e) = stream.write_all(format!("{line}\n").as_bytes()).await {
            tracing::error!(error = %e, "Failed to send reading");
            break;
        }
    }
}
