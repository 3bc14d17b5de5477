//! WebSocket infrastructure for the subscriber side.
//!
//! Provides the HTTP upgrade handler used by Axum routes and the
//! heartbeat task that keeps subscriber connections alive. Connection
//! bookkeeping lives in [`crate::registry`].

mod handler;
mod heartbeat;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
