#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The inbound line was not a valid telemetry frame (bad JSON, or a
    /// missing/non-integer timestamp).
    #[error("Malformed telemetry frame: {0}")]
    Decode(#[from] serde_json::Error),
}
