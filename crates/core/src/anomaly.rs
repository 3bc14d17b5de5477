//! Trailing-window tracking of out-of-range readings.
//!
//! Pure logic — no clock access. The caller supplies every timestamp, so
//! escalation is driven entirely by the stream's own timeline and is fully
//! deterministic under test.

use crate::types::EpochMillis;

/// Width of the trailing anomaly window in milliseconds.
pub const ANOMALY_WINDOW_MS: i64 = 5_000;

/// Retained-entry count above which the sustained-anomaly notice fires.
pub const SUSTAINED_ANOMALY_THRESHOLD: usize = 3;

/// Timestamps of recent out-of-range readings, in arrival order.
///
/// Owned exclusively by one ingestion session; dropped when the session
/// ends. Invariant: immediately after any mutation, every retained entry
/// is within [`ANOMALY_WINDOW_MS`] of the most recently observed timestamp.
#[derive(Debug, Default)]
pub struct AnomalyWindow {
    entries: Vec<EpochMillis>,
}

impl AnomalyWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a timestamp, preserving arrival order.
    pub fn record(&mut self, timestamp: EpochMillis) {
        self.entries.push(timestamp);
    }

    /// Drop every entry older than the window relative to `now`.
    ///
    /// An entry exactly [`ANOMALY_WINDOW_MS`] old is retained. Arrival
    /// order is not assumed to be sorted, so the whole list is scanned.
    pub fn prune(&mut self, now: EpochMillis) {
        self.entries.retain(|&ts| now - ts <= ANOMALY_WINDOW_MS);
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record an out-of-range timestamp, prune against it, and report
    /// whether the sustained-anomaly condition now holds.
    ///
    /// Prune runs before the size check so stale entries never count.
    pub fn observe(&mut self, timestamp: EpochMillis) -> bool {
        self.record(timestamp);
        self.prune(timestamp);
        self.len() > SUSTAINED_ANOMALY_THRESHOLD
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_window_is_empty() {
        let window = AnomalyWindow::new();
        assert!(window.is_empty());
        assert_eq!(window.len(), 0);
    }

    #[test]
    fn fourth_observation_in_window_escalates() {
        let mut window = AnomalyWindow::new();
        assert!(!window.observe(1_000));
        assert!(!window.observe(2_000));
        assert!(!window.observe(3_000));
        assert!(window.observe(4_000));
    }

    #[test]
    fn fifth_observation_still_escalates_while_entries_remain() {
        let mut window = AnomalyWindow::new();
        for ts in [1_000, 2_000, 3_000, 4_000] {
            window.observe(ts);
        }
        assert!(window.observe(5_000));
        assert_eq!(window.len(), 5);
    }

    #[test]
    fn stale_entries_are_pruned_before_the_size_check() {
        let mut window = AnomalyWindow::new();
        window.observe(1_000);
        window.observe(1_100);
        window.observe(1_200);
        // More than 5000ms after all three — they are pruned first, so
        // this is the only retained entry and no escalation fires.
        assert!(!window.observe(7_000));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn entry_exactly_at_window_edge_is_retained() {
        let mut window = AnomalyWindow::new();
        window.observe(1_000);
        window.observe(1_001);
        window.observe(1_002);
        // 6000 - 1000 == ANOMALY_WINDOW_MS exactly: the oldest entry stays.
        assert!(window.observe(6_000));
        assert_eq!(window.len(), 4);
    }

    #[test]
    fn entry_just_past_window_edge_is_dropped() {
        let mut window = AnomalyWindow::new();
        window.observe(1_000);
        window.observe(1_001);
        window.observe(1_002);
        assert!(!window.observe(6_001));
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn sliding_burst_keeps_escalating() {
        let mut window = AnomalyWindow::new();
        let mut fired = 0;
        for i in 0..10 {
            if window.observe(i * 500) {
                fired += 1;
            }
        }
        // Everything stays within 5000ms of its predecessors at this rate,
        // so observations 4 through 10 all escalate.
        assert_eq!(fired, 7);
    }

    #[test]
    fn prune_on_empty_window_is_a_noop() {
        let mut window = AnomalyWindow::new();
        window.prune(10_000);
        assert!(window.is_empty());
    }
}
