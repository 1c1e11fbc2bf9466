//! Test utilities for the Morse timing engine

#[cfg(feature = "test-utils")]
pub mod signal_capture {
    //! Output capture and analysis for testing
    //!
    //! Every [`RecordingSignal`] created from one [`SignalLog`] appends to the
    //! same ordered log, so a run over several channels can be checked as a
    //! single timeline.

    use crate::hal::{DriverError, SignalDriver};
    use crate::types::Pulse;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    /// What a driver was asked to do
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SignalEvent {
        ReadyQueried,
        Configured,
        Set(bool),
    }

    /// One captured driver call
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SignalRecord {
        pub channel: usize,
        pub at_ms: u64,
        pub event: SignalEvent,
    }

    type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

    /// Shared, time-stamped log of driver calls
    #[derive(Clone)]
    pub struct SignalLog {
        records: Arc<Mutex<Vec<SignalRecord>>>,
        clock: Clock,
    }

    impl SignalLog {
        /// Log stamped with milliseconds from `clock`
        pub fn new<F>(clock: F) -> Self
        where
            F: Fn() -> u64 + Send + Sync + 'static,
        {
            Self {
                records: Arc::new(Mutex::new(Vec::new())),
                clock: Arc::new(clock),
            }
        }

        /// Log without a clock; every record is stamped 0
        pub fn untimed() -> Self {
            Self::new(|| 0)
        }

        /// Driver for `channel` that reports ready and configures cleanly
        pub fn signal(&self, channel: usize) -> RecordingSignal {
            RecordingSignal {
                channel,
                log: self.clone(),
                ready: true,
                config_error: None,
            }
        }

        fn push(&self, channel: usize, event: SignalEvent) {
            let at_ms = (self.clock)();
            self.records
                .lock()
                .unwrap()
                .push(SignalRecord { channel, at_ms, event });
        }

        /// Snapshot of everything captured so far
        pub fn records(&self) -> Vec<SignalRecord> {
            self.records.lock().unwrap().clone()
        }

        /// Channels whose readiness was queried, in query order
        pub fn ready_queries(&self) -> Vec<usize> {
            self.records()
                .iter()
                .filter(|r| r.event == SignalEvent::ReadyQueried)
                .map(|r| r.channel)
                .collect()
        }

        /// Channels that were configured, in order
        pub fn configured(&self) -> Vec<usize> {
            self.records()
                .iter()
                .filter(|r| r.event == SignalEvent::Configured)
                .map(|r| r.channel)
                .collect()
        }

        /// `(at_ms, active)` for every `set_active` call on `channel`
        pub fn states(&self, channel: usize) -> Vec<(u64, bool)> {
            self.records()
                .iter()
                .filter(|r| r.channel == channel)
                .filter_map(|r| match r.event {
                    SignalEvent::Set(active) => Some((r.at_ms, active)),
                    _ => None,
                })
                .collect()
        }

        /// Reconstruct the pulses a channel sent, in milliseconds
        ///
        /// Each pulse lasts until the next `set_active` call on the same
        /// channel; the final call has no end and is dropped.
        pub fn pulse_trace(&self, channel: usize) -> Vec<(bool, u64)> {
            self.states(channel)
                .windows(2)
                .map(|w| (w[0].1, w[1].0 - w[0].0))
                .collect()
        }

        /// Channels in the order they first went active
        pub fn activation_order(&self) -> Vec<usize> {
            let mut order = Vec::new();
            let mut previous: BTreeMap<usize, bool> = BTreeMap::new();
            for record in self.records() {
                if let SignalEvent::Set(active) = record.event {
                    let was = previous.insert(record.channel, active).unwrap_or(false);
                    if active && !was {
                        order.push(record.channel);
                    }
                }
            }
            order
        }

        /// Largest number of outputs that were on at the same time
        pub fn max_concurrently_active(&self) -> usize {
            let mut state: BTreeMap<usize, bool> = BTreeMap::new();
            let mut max = 0;
            for record in self.records() {
                if let SignalEvent::Set(active) = record.event {
                    state.insert(record.channel, active);
                    max = max.max(state.values().filter(|on| **on).count());
                }
            }
            max
        }
    }

    /// Expected trace for a pulse sequence at `unit_ms`
    pub fn expected_trace<I>(pulses: I, unit_ms: u64) -> Vec<(bool, u64)>
    where
        I: IntoIterator<Item = Pulse>,
    {
        pulses
            .into_iter()
            .map(|p| (p.active, p.units as u64 * unit_ms))
            .collect()
    }

    /// Thread-safe driver that writes every call into a [`SignalLog`]
    pub struct RecordingSignal {
        channel: usize,
        log: SignalLog,
        ready: bool,
        config_error: Option<i32>,
    }

    impl RecordingSignal {
        /// Report not ready at startup
        pub fn not_ready(mut self) -> Self {
            self.ready = false;
            self
        }

        /// Fail configuration with the given platform code
        pub fn failing(mut self, code: i32) -> Self {
            self.config_error = Some(code);
            self
        }

        pub fn channel(&self) -> usize {
            self.channel
        }
    }

    impl SignalDriver for RecordingSignal {
        fn configure(&mut self) -> Result<(), DriverError> {
            if let Some(code) = self.config_error {
                return Err(DriverError::Config(code));
            }
            self.log.push(self.channel, SignalEvent::Configured);
            Ok(())
        }

        fn set_active(&mut self, active: bool) {
            self.log.push(self.channel, SignalEvent::Set(active));
        }

        fn is_ready(&self) -> bool {
            self.log.push(self.channel, SignalEvent::ReadyQueried);
            self.ready
        }
    }
}
