//! Outbound subscriber protocol.
//!
//! Every payload the relay ever pushes to a subscriber is an
//! [`OutboundMessage`]. The wire encoding is a flat JSON object whose key
//! set disambiguates the variant — dashboard clients dispatch on the
//! presence of `connect`, `error`, or `battery_temperature`.

use serde::{Serialize, Serializer};

use crate::reading::Reading;

/// One message pushed to subscribers.
///
/// Serialized shapes:
///
/// ```text
/// {"connect":"true"}                              Status
/// {"error":"Out of range"}                        Notice
/// {"battery_temperature":25,"timestamp":1000}     Reading
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    Status {
        /// Whether the upstream feed is live. Sent as the strings
        /// `"true"`/`"false"` — a dashboard wire-format quirk that
        /// predates this service and cannot change.
        #[serde(rename = "connect", serialize_with = "bool_as_str")]
        connected: bool,
    },
    Notice {
        #[serde(rename = "error")]
        message: String,
    },
    Reading(Reading),
}

impl OutboundMessage {
    /// Upstream liveness announcement.
    pub fn status(connected: bool) -> Self {
        Self::Status { connected }
    }

    /// Error notice carrying one of the fixed strings in
    /// [`notices`](crate::notices).
    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice {
            message: message.into(),
        }
    }

    /// A validated reading, forwarded as it arrived.
    pub fn reading(reading: Reading) -> Self {
        Self::Reading(reading)
    }

    /// Wire encoding as a JSON text frame.
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).expect("OutboundMessage is always serialisable")
    }
}

fn bool_as_str<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *value { "true" } else { "false" })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
