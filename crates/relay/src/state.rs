use std::sync::Arc;

use crate::registry::SubscriberRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Subscriber connection registry shared with the ingestion sessions.
    pub registry: Arc<SubscriberRegistry>,
}
