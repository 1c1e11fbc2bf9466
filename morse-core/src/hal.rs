//! Hardware Abstraction Layer for signal outputs

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::Duration;

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::Duration;

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Mock duration type for compilation without embassy-time
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Duration(u64);

    impl Duration {
        pub const fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub const fn from_secs(secs: u64) -> Self {
            Self(secs * 1000)
        }

        pub const fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }

    impl core::ops::Add for Duration {
        type Output = Duration;

        fn add(self, rhs: Duration) -> Duration {
            Duration(self.0 + rhs.0)
        }
    }
}

use embedded_hal::digital::OutputPin;

/// Error types reported by a signal driver
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Output hardware has not been initialized
    NotReady,
    /// Platform refused to configure the pin as an output; carries the platform code
    Config(i32),
}

#[cfg(feature = "std")]
impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::NotReady => write!(f, "Output hardware not ready"),
            DriverError::Config(code) => write!(f, "Output configuration failed (code {})", code),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DriverError {}

/// One physical on/off output (an LED, a keying line, ...)
///
/// The scheduler owns each driver exclusively; no two execution contexts
/// ever address the same output.
pub trait SignalDriver {
    /// Put the output into a known, inactive, output-capable state
    fn configure(&mut self) -> Result<(), DriverError>;

    /// Set the logical output state (true = on). Fire-and-forget.
    fn set_active(&mut self, active: bool);

    /// Check whether the underlying hardware is initialized
    fn is_ready(&self) -> bool;
}

impl<S: SignalDriver + ?Sized> SignalDriver for &mut S {
    fn configure(&mut self) -> Result<(), DriverError> {
        (**self).configure()
    }

    fn set_active(&mut self, active: bool) {
        (**self).set_active(active)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Generic implementation for embedded-hal compatible output pins
pub struct EmbeddedHalSignal<P> {
    pin: P,
    active_low: bool,
}

impl<P> EmbeddedHalSignal<P>
where
    P: OutputPin,
{
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }

    fn drive(&mut self, active: bool) -> Result<(), P::Error> {
        let level = if self.active_low { !active } else { active };
        if level {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}

impl<P> SignalDriver for EmbeddedHalSignal<P>
where
    P: OutputPin,
{
    fn configure(&mut self) -> Result<(), DriverError> {
        // embedded-hal pins are output-capable by construction
        self.drive(false).map_err(|_| DriverError::Config(-1))
    }

    fn set_active(&mut self, active: bool) {
        let _ = self.drive(active);
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use super::*;
    use core::cell::{Cell, RefCell};
    use heapless::Vec;

    /// Number of `set_active` calls a mock remembers
    pub const MOCK_HISTORY: usize = 128;

    /// Single-threaded mock output with a bounded call history
    #[derive(Default)]
    pub struct MockSignal {
        not_ready: bool,
        config_error: Option<i32>,
        configured: Cell<bool>,
        active: Cell<bool>,
        ready_queries: Cell<u32>,
        history: RefCell<Vec<bool, MOCK_HISTORY>>,
    }

    impl MockSignal {
        pub fn new() -> Self {
            Self::default()
        }

        /// Mock whose hardware reports not ready
        pub fn not_ready() -> Self {
            Self {
                not_ready: true,
                ..Self::default()
            }
        }

        /// Mock whose configuration fails with the given platform code
        pub fn failing(code: i32) -> Self {
            Self {
                config_error: Some(code),
                ..Self::default()
            }
        }

        pub fn is_active(&self) -> bool {
            self.active.get()
        }

        pub fn is_configured(&self) -> bool {
            self.configured.get()
        }

        pub fn ready_queries(&self) -> u32 {
            self.ready_queries.get()
        }

        /// States passed to `set_active`, oldest first
        pub fn history(&self) -> Vec<bool, MOCK_HISTORY> {
            self.history.borrow().clone()
        }
    }

    impl SignalDriver for MockSignal {
        fn configure(&mut self) -> Result<(), DriverError> {
            if let Some(code) = self.config_error {
                return Err(DriverError::Config(code));
            }
            self.configured.set(true);
            self.active.set(false);
            Ok(())
        }

        fn set_active(&mut self, active: bool) {
            self.active.set(active);
            // Oldest entries win once the history is full
            let _ = self.history.borrow_mut().push(active);
        }

        fn is_ready(&self) -> bool {
            self.ready_queries.set(self.ready_queries.get() + 1);
            !self.not_ready
        }
    }
}
