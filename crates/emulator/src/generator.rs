//! Synthetic battery telemetry.
//!
//! [`ReadingGenerator`] produces a random-walk pack temperature centred
//! in the safe band, with occasional out-of-range excursions and (when
//! configured) deliberately garbled frames so the relay's validation
//! paths get exercised during development.

use rand::Rng;

use voltline_core::reading::{Reading, SAFE_TEMP_MAX, SAFE_TEMP_MIN};
use voltline_core::types::EpochMillis;

/// Maximum per-step drift of the random walk, in degrees.
const WALK_STEP: f64 = 1.5;

/// How far beyond the safe band a spike lands, in degrees.
const SPIKE_MAGNITUDE: f64 = 15.0;

/// Tuning knobs for the generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Probability that a reading spikes outside the safe band.
    pub spike_probability: f64,
    /// Probability that a frame carries a garbled (non-numeric) temperature.
    pub garble_probability: f64,
}

/// Produces one telemetry line per call, tracking walk state between calls.
pub struct ReadingGenerator {
    temperature: f64,
    config: GeneratorConfig,
}

impl ReadingGenerator {
    /// Start the walk at the centre of the safe band.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            temperature: (SAFE_TEMP_MIN + SAFE_TEMP_MAX) / 2.0,
            config,
        }
    }

    /// Produce the next frame as one NDJSON line (without the newline).
    pub fn next_line(&mut self, timestamp: EpochMillis) -> String {
        let mut rng = rand::rng();

        if rng.random_bool(self.config.garble_probability) {
            // The relay classifies this as an invalid temperature.
            return format!(r#"{{"battery_temperature":"ERR","timestamp":{timestamp}}}"#);
        }

        let degrees = if rng.random_bool(self.config.spike_probability) {
            // Spike past a band edge without disturbing the walk state.
            if rng.random_bool(0.5) {
                SAFE_TEMP_MAX + SPIKE_MAGNITUDE
            } else {
                SAFE_TEMP_MIN - SPIKE_MAGNITUDE
            }
        } else {
            self.temperature += rng.random_range(-WALK_STEP..=WALK_STEP);
            // Keep the walk itself inside the safe band so excursions only
            // come from spikes.
            self.temperature = self.temperature.clamp(SAFE_TEMP_MIN, SAFE_TEMP_MAX);
            self.temperature
        };

        // One decimal place, matching the DAQ's output resolution.
        let rounded = (degrees * 10.0).round() / 10.0;

        let reading = Reading {
            battery_temperature: serde_json::Number::from_f64(rounded)
                .expect("walk temperature is always finite"),
            timestamp,
        };
        serde_json::to_string(&reading).expect("Reading is always serialisable")
    }
}
