//! `voltline-emulator` -- synthetic vehicle DAQ.
//!
//! Stands in for the car during development: connects to the relay's
//! ingest port and streams newline-delimited battery telemetry with
//! occasional out-of-range spikes and (optionally) garbled frames.
//!
//! # Environment variables
//!
//! | Variable            | Required | Default           | Description                          |
//! |---------------------|----------|-------------------|--------------------------------------|
//! | `RELAY_ADDR`        | no       | `127.0.0.1:12000` | Relay ingest address                 |
//! | `EMIT_INTERVAL_MS`  | no       | `500`             | Milliseconds between readings        |
//! | `SPIKE_PROBABILITY` | no       | `0.1`             | Chance a reading leaves the safe band|
//! | `GARBLE_PROBABILITY`| no       | `0`               | Chance a frame is non-numeric        |

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voltline_emulator::generator::{GeneratorConfig, ReadingGenerator};
use voltline_emulator::sender;

/// Default interval between readings.
const DEFAULT_INTERVAL_MS: u64 = 500;

/// Default probability of an out-of-range spike.
const DEFAULT_SPIKE_PROBABILITY: f64 = 0.1;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voltline_emulator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("RELAY_ADDR").unwrap_or_else(|_| "127.0.0.1:12000".into());

    let interval_ms: u64 = std::env::var("EMIT_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_INTERVAL_MS);

    let spike_probability: f64 = std::env::var("SPIKE_PROBABILITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SPIKE_PROBABILITY);

    let garble_probability: f64 = std::env::var("GARBLE_PROBABILITY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0);

    assert!(
        (0.0..=1.0).contains(&spike_probability),
        "SPIKE_PROBABILITY must be within 0..=1"
    );
    assert!(
        (0.0..=1.0).contains(&garble_probability),
        "GARBLE_PROBABILITY must be within 0..=1"
    );

    let interval = Duration::from_millis(interval_ms);

    tracing::info!(
        addr = %addr,
        interval_ms,
        spike_probability,
        garble_probability,
        "Starting voltline-emulator",
    );

    let mut generator = ReadingGenerator::new(GeneratorConfig {
        spike_probability,
        garble_probability,
    });

    sender::run(&addr, interval, &mut generator).await;
}
