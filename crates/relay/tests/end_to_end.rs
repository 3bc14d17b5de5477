//! End-to-end ingestion tests over real TCP.
//!
//! These tests run the accept loop against an ephemeral port, stream
//! newline-delimited telemetry into it, and assert on what a registered
//! subscriber observes.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use voltline_relay::ingest;
use voltline_relay::registry::SubscriberRegistry;

async fn start_listener(registry: Arc<SubscriberRegistry>) -> (std::net::SocketAddr, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind an ephemeral port");
    let addr = listener.local_addr().expect("listener should report its address");
    let cancel = CancellationToken::new();
    tokio::spawn(ingest::run(listener, registry, cancel.clone()));
    (addr, cancel)
}

async fn recv_text(rx: &mut UnboundedReceiver<Message>) -> String {
    let msg = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a frame")
        .expect("subscriber channel closed unexpectedly");
    match msg {
        Message::Text(t) => t.to_string(),
        other => panic!("Unexpected non-text frame: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Test: a valid reading streamed over TCP reaches the subscriber
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_line_reaches_subscriber() {
    let registry = Arc::new(SubscriberRegistry::new());
    let mut rx = registry.add("dashboard".to_string()).await;
    let (addr, cancel) = start_listener(Arc::clone(&registry)).await;

    let mut upstream = TcpStream::connect(addr)
        .await
        .expect("should connect to the ingest port");
    upstream
        .write_all(b"{\"battery_temperature\": 25, \"timestamp\": 1000}\n")
        .await
        .expect("should write the frame");
    upstream.flush().await.expect("should flush");

    assert_eq!(recv_text(&mut rx).await, r#"{"connect":"true"}"#);
    assert_eq!(
        recv_text(&mut rx).await,
        r#"{"battery_temperature":25,"timestamp":1000}"#
    );

    // Closing the upstream announces the feed as down.
    drop(upstream);
    assert_eq!(recv_text(&mut rx).await, r#"{"connect":"false"}"#);

    cancel.cancel();
}

// ---------------------------------------------------------------------------
// Test: a malformed temperature produces the invalid notice and no reading
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_temperature_over_tcp() {
    let registry = Arc::new(SubscriberRegistry::new());
    let mut rx = registry.add("dashboard".to_string()).await;
    let (addr, cancel) = start_listener(Arc::clone(&registry)).await;

    let mut upstream = TcpStream::connect(addr)
        .await
        .expect("should connect to the ingest port");
    upstream
        .write_all(b"{\"battery_temperature\": \"hot\", \"timestamp\": 2000}\n")
        .await
        .expect("should write the frame");
    drop(upstream);

    assert_eq!(recv_text(&mut rx).await, r#"{"connect":"true"}"#);
    assert_eq!(
        recv_text(&mut rx).await,
        r#"{"error":"Invalid battery Temperature"}"#
    );
    assert_eq!(recv_text(&mut rx).await, r#"{"connect":"false"}"#);

    cancel.cancel();
}

// ---------------------------------------------------------------------------
// Test: a fragmented write still decodes as one frame (NDJSON framing)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fragmented_write_decodes_as_one_frame() {
    let registry = Arc::new(SubscriberRegistry::new());
    let mut rx = registry.add("dashboard".to_string()).await;
    let (addr, cancel) = start_listener(Arc::clone(&registry)).await;

    let mut upstream = TcpStream::connect(addr)
        .await
        .expect("should connect to the ingest port");

    // Split one frame across two writes with a pause between them.
    upstream
        .write_all(b"{\"battery_temperature\": 42,")
        .await
        .expect("should write the first half");
    upstream.flush().await.expect("should flush");
    tokio::time::sleep(Duration::from_millis(50)).await;
    upstream
        .write_all(b" \"timestamp\": 3000}\n")
        .await
        .expect("should write the second half");
    drop(upstream);

    assert_eq!(recv_text(&mut rx).await, r#"{"connect":"true"}"#);
    assert_eq!(
        recv_text(&mut rx).await,
        r#"{"battery_temperature":42,"timestamp":3000}"#
    );
    assert_eq!(recv_text(&mut rx).await, r#"{"connect":"false"}"#);

    cancel.cancel();
}

// ---------------------------------------------------------------------------
// Test: concurrent upstream connections fan out independently
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_upstreams_are_independent() {
    let registry = Arc::new(SubscriberRegistry::new());
    let mut rx = registry.add("dashboard".to_string()).await;
    let (addr, cancel) = start_listener(Arc::clone(&registry)).await;

    let mut first = TcpStream::connect(addr)
        .await
        .expect("first upstream should connect");
    let mut second = TcpStream::connect(addr)
        .await
        .expect("second upstream should connect");

    first
        .write_all(b"{\"battery_temperature\": 30, \"timestamp\": 1000}\n")
        .await
        .expect("first should write");
    second
        .write_all(b"{\"battery_temperature\": \"bad\", \"timestamp\": 1001}\n")
        .await
        .expect("second should write");

    // Interleaving across sessions is arbitrary; collect and count kinds.
    let mut frames = Vec::new();
    for _ in 0..4 {
        frames.push(recv_text(&mut rx).await);
    }

    let announcements = frames
        .iter()
        .filter(|f| f.as_str() == r#"{"connect":"true"}"#)
        .count();
    assert_eq!(announcements, 2, "one announcement per frame: {frames:?}");
    assert!(frames.contains(&r#"{"battery_temperature":30,"timestamp":1000}"#.to_string()));
    assert!(frames.contains(&r#"{"error":"Invalid battery Temperature"}"#.to_string()));

    drop(first);
    drop(second);
    for _ in 0..2 {
        assert_eq!(recv_text(&mut rx).await, r#"{"connect":"false"}"#);
    }

    cancel.cancel();
}
