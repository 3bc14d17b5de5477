//! Well-known subscriber notice strings.
//!
//! These exact strings are part of the wire contract with dashboard
//! clients; alert banners in the UI match on them verbatim.

/// Emitted when a frame carries a missing or non-numeric battery temperature.
pub const NOTICE_INVALID_TEMPERATURE: &str = "Invalid battery Temperature";

/// Emitted once per reading whose temperature falls outside the safe band.
pub const NOTICE_OUT_OF_RANGE: &str = "Out of range";

/// Emitted when more than three out-of-range readings land inside the
/// trailing five-second anomaly window.
pub const NOTICE_SUSTAINED_ANOMALY: &str =
    "Battery temperature out of safe range more than 3 times in 5 seconds.";

/// Emitted when an inbound line cannot be decoded as a telemetry frame.
pub const NOTICE_MALFORMED_FRAME: &str = "Malformed telemetry frame";
