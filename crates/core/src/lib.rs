//! Voltline domain core.
//!
//! Pure telemetry logic with no I/O: inbound frame decoding, reading
//! validation, anomaly-window tracking, and the outbound subscriber
//! protocol. The relay service and the emulator both build on this crate.

pub mod anomaly;
pub mod error;
pub mod notices;
pub mod protocol;
pub mod reading;
pub mod types;
