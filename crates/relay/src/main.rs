use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voltline_relay::config::RelayConfig;
use voltline_relay::registry::SubscriberRegistry;
use voltline_relay::state::AppState;
use voltline_relay::{ingest, routes, ws};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voltline_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = RelayConfig::from_env();
    tracing::info!(
        host = %config.host,
        ingest_port = config.ingest_port,
        subscriber_port = config.subscriber_port,
        "Loaded relay configuration"
    );

    // --- Subscriber registry ---
    let registry = Arc::new(SubscriberRegistry::new());

    // --- Heartbeat ---
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&registry));

    // --- Upstream ingest listener ---
    let ingest_addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.ingest_port,
    );
    let ingest_listener = tokio::net::TcpListener::bind(ingest_addr)
        .await
        .expect("Failed to bind ingest port");
    tracing::info!(addr = %ingest_addr, "Ingest listener started");

    let ingest_cancel = tokio_util::sync::CancellationToken::new();
    let ingest_handle = tokio::spawn(ingest::run(
        ingest_listener,
        Arc::clone(&registry),
        ingest_cancel.clone(),
    ));

    // --- Subscriber endpoint ---
    let state = AppState {
        registry: Arc::clone(&registry),
    };

    let app = routes::router()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state);

    let subscriber_addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.subscriber_port,
    );
    tracing::info!(addr = %subscriber_addr, "Starting subscriber endpoint");

    let subscriber_listener = tokio::net::TcpListener::bind(subscriber_addr)
        .await
        .expect("Failed to bind subscriber port");

    axum::serve(subscriber_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Subscriber endpoint error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Subscriber endpoint stopped, cleaning up");

    ingest_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), ingest_handle).await;
    tracing::info!("Ingest listener stopped");

    let count = registry.connection_count().await;
    tracing::info!(count, "Closing remaining subscriber connections");
    registry.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the relay shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
