/// All telemetry timestamps are integer epoch milliseconds, as produced
/// by the vehicle DAQ.
pub type EpochMillis = i64;
