#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Morse Core
//!
//! Morse timing engine for embedded systems.
//! Turns words into timed on/off pulses with International Morse ratios and
//! drives any number of independent outputs through them, in parallel or
//! taking turns.

pub mod types;
pub mod error;
pub mod alphabet;
pub mod encoder;
pub mod sequencer;
pub mod scheduler;
pub mod hal;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use error::*;
pub use encoder::*;
pub use sequencer::*;
pub use scheduler::*;
pub use hal::{*, Duration};

/// Morse core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration: T = 150 ms, parallel channels, 500 ms settle
pub fn default_config() -> MorseConfig {
    MorseConfig {
        unit: Duration::from_millis(DEFAULT_UNIT_MS),
        mode: ScheduleMode::Parallel,
        settle_delay: Duration::from_millis(DEFAULT_SETTLE_MS),
    }
}
