//! Voltline relay service library.
//!
//! Exposes the core building blocks (config, subscriber registry,
//! ingestion sessions, listeners, WebSocket infrastructure) so integration
//! tests and the binary entrypoint can both access them.

pub mod config;
pub mod ingest;
pub mod registry;
pub mod routes;
pub mod session;
pub mod state;
pub mod ws;
