//! Telemetry frame decoding and reading validation.
//!
//! Pure logic — no I/O. The ingestion session decodes each inbound line
//! with [`decode_frame`] and classifies the result with [`classify`]; the
//! session is responsible for acting on the classification (broadcasting
//! notices, recording anomalies, forwarding readings).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TelemetryError;
use crate::types::EpochMillis;

/// Lower bound of the safe battery temperature band (inclusive).
pub const SAFE_TEMP_MIN: f64 = 20.0;

/// Upper bound of the safe battery temperature band (inclusive).
pub const SAFE_TEMP_MAX: f64 = 80.0;

/// One decoded inbound frame, before validation.
///
/// `battery_temperature` is kept as raw JSON because the DAQ occasionally
/// emits garbage there (a string, `null`, nothing at all) and those frames
/// must still decode so the validator can classify them as malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryFrame {
    #[serde(default)]
    pub battery_temperature: Value,
    pub timestamp: EpochMillis,
}

/// One validated telemetry sample.
///
/// The temperature keeps its inbound JSON number representation so a
/// reading is forwarded to subscribers exactly as it arrived (an integer
/// stays an integer on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub battery_temperature: serde_json::Number,
    pub timestamp: EpochMillis,
}

/// Outcome of validating a decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Temperature absent, non-numeric, or non-finite. Never forwarded.
    Malformed,
    /// Numeric temperature inside the safe band.
    InRange(Reading),
    /// Numeric temperature strictly below [`SAFE_TEMP_MIN`] or strictly
    /// above [`SAFE_TEMP_MAX`]. Still forwarded after the notice.
    OutOfRange(Reading),
}

/// Decode one inbound line as a telemetry frame.
pub fn decode_frame(raw: &str) -> Result<TelemetryFrame, TelemetryError> {
    Ok(serde_json::from_str(raw)?)
}

/// Classify a decoded frame.
///
/// The bounds check is inclusive of the safe band: exactly 20 and exactly
/// 80 degrees are in range.
pub fn classify(frame: &TelemetryFrame) -> Classification {
    let number = match &frame.battery_temperature {
        Value::Number(n) => n.clone(),
        _ => return Classification::Malformed,
    };

    let degrees = match number.as_f64() {
        Some(v) if v.is_finite() => v,
        _ => return Classification::Malformed,
    };

    let reading = Reading {
        battery_temperature: number,
        timestamp: frame.timestamp,
    };

    if degrees < SAFE_TEMP_MIN || degrees > SAFE_TEMP_MAX {
        Classification::OutOfRange(reading)
    } else {
        Classification::InRange(reading)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(raw: &str) -> TelemetryFrame {
        decode_frame(raw).expect("test frame should decode")
    }

    #[test]
    fn in_range_reading_classifies_as_in_range() {
        let c = classify(&frame(r#"{"battery_temperature": 25, "timestamp": 1000}"#));
        match c {
            Classification::InRange(r) => {
                assert_eq!(r.battery_temperature.as_f64(), Some(25.0));
                assert_eq!(r.timestamp, 1000);
            }
            other => panic!("Expected InRange, got: {other:?}"),
        }
    }

    #[test]
    fn band_edges_are_in_range() {
        let low = classify(&frame(r#"{"battery_temperature": 20, "timestamp": 1}"#));
        let high = classify(&frame(r#"{"battery_temperature": 80, "timestamp": 2}"#));
        assert!(matches!(low, Classification::InRange(_)));
        assert!(matches!(high, Classification::InRange(_)));
    }

    #[test]
    fn below_and_above_band_are_out_of_range() {
        let low = classify(&frame(r#"{"battery_temperature": 19.9, "timestamp": 1}"#));
        let high = classify(&frame(r#"{"battery_temperature": 80.1, "timestamp": 2}"#));
        assert!(matches!(low, Classification::OutOfRange(_)));
        assert!(matches!(high, Classification::OutOfRange(_)));
    }

    #[test]
    fn string_temperature_is_malformed() {
        let c = classify(&frame(r#"{"battery_temperature": "hot", "timestamp": 2000}"#));
        assert_eq!(c, Classification::Malformed);
    }

    #[test]
    fn null_temperature_is_malformed() {
        let c = classify(&frame(r#"{"battery_temperature": null, "timestamp": 3}"#));
        assert_eq!(c, Classification::Malformed);
    }

    #[test]
    fn missing_temperature_is_malformed() {
        let c = classify(&frame(r#"{"timestamp": 4}"#));
        assert_eq!(c, Classification::Malformed);
    }

    #[test]
    fn negative_temperature_is_out_of_range_not_malformed() {
        let c = classify(&frame(r#"{"battery_temperature": -5, "timestamp": 5}"#));
        assert!(matches!(c, Classification::OutOfRange(_)));
    }

    #[test]
    fn integer_representation_survives_validation() {
        let c = classify(&frame(r#"{"battery_temperature": 25, "timestamp": 1000}"#));
        let Classification::InRange(reading) = c else {
            panic!("Expected InRange");
        };
        let json = serde_json::to_string(&reading).expect("Reading is always serialisable");
        assert_eq!(json, r#"{"battery_temperature":25,"timestamp":1000}"#);
    }

    #[test]
    fn fractional_representation_survives_validation() {
        let c = classify(&frame(r#"{"battery_temperature": 25.5, "timestamp": 1000}"#));
        let Classification::InRange(reading) = c else {
            panic!("Expected InRange");
        };
        let json = serde_json::to_string(&reading).expect("Reading is always serialisable");
        assert_eq!(json, r#"{"battery_temperature":25.5,"timestamp":1000}"#);
    }

    #[test]
    fn garbage_line_fails_decode() {
        assert!(decode_frame("not json at all").is_err());
    }

    #[test]
    fn missing_timestamp_fails_decode() {
        assert!(decode_frame(r#"{"battery_temperature": 25}"#).is_err());
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let c = classify(&frame(
            r#"{"battery_temperature": 42, "timestamp": 7, "source": "pack-a"}"#,
        ));
        assert!(matches!(c, Classification::InRange(_)));
    }
}
