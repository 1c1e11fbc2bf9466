//! Host-side harness for the Morse timing engine
//!
//! Runs channels and schedulers on tokio instead of embassy. Under
//! `#[tokio::test(start_paused = true)]` every wait completes in virtual
//! time, so whole transmission cycles replay in microseconds with exact
//! millisecond timestamps.

use std::sync::{Arc, Mutex};

use morse_core::{Duration, PulseTimer};

pub use morse_core::test_utils::signal_capture::*;

/// Pulse timer backed by `tokio::time::sleep`
#[derive(Copy, Clone, Debug, Default)]
pub struct TokioTimer;

impl PulseTimer for TokioTimer {
    async fn wait(&mut self, duration: Duration) {
        tokio::time::sleep(std::time::Duration::from_millis(duration.as_millis())).await;
    }
}

/// Timer that returns at once and remembers what it was asked to wait
#[derive(Clone, Debug, Default)]
pub struct RecordingTimer {
    waits: Arc<Mutex<Vec<u64>>>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requested wait in milliseconds, oldest first
    pub fn waits(&self) -> Vec<u64> {
        self.waits.lock().unwrap().clone()
    }
}

impl PulseTimer for RecordingTimer {
    async fn wait(&mut self, duration: Duration) {
        self.waits.lock().unwrap().push(duration.as_millis());
    }
}

/// Milliseconds since the call, on the tokio clock
///
/// Must be called inside a runtime; with paused time this is virtual time.
pub fn virtual_clock() -> impl Fn() -> u64 + Send + Sync + 'static {
    let origin = tokio::time::Instant::now();
    move || origin.elapsed().as_millis() as u64
}

/// Compare a captured trace against the expected one
///
/// Each duration may be off by `tolerance_ms` for clock rounding.
pub fn assert_trace_matches(actual: &[(bool, u64)], expected: &[(bool, u64)], tolerance_ms: u64) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "trace length differs: {:?} vs {:?}",
        actual,
        expected
    );
    for (index, (got, want)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(got.0, want.0, "pulse {} has the wrong state", index);
        assert!(
            got.1.abs_diff(want.1) <= tolerance_ms,
            "pulse {} lasted {}ms, expected {}ms",
            index,
            got.1,
            want.1
        );
    }
}

#[cfg(test)]
mod encoder_tests;
#[cfg(test)]
mod sequential_tests;
