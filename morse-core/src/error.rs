//! Construction and startup errors
//!
//! Everything here is raised before the first pulse goes out. Once channels
//! are running there is no error path.

use crate::hal::DriverError;

/// Errors building patterns, words and timing parameters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MorseError {
    /// Pattern contains something other than `.` or `-`
    InvalidSymbol { found: char, position: u8 },
    /// Pattern has no symbols
    EmptyPattern,
    /// Pattern is longer than a letter can hold
    PatternTooLong,
    /// Word has no letters
    EmptyWord,
    /// Word has more letters than fit inline
    WordTooLong,
    /// Character has no entry in the alphabet
    UnknownLetter(char),
    /// Channel has no words to send
    NoWords,
    /// Channel has more words than fit inline
    TooManyWords,
    /// Time unit is zero or unreasonably slow
    InvalidTimeUnit,
}

#[cfg(feature = "std")]
impl core::fmt::Display for MorseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MorseError::InvalidSymbol { found, position } => {
                write!(f, "Invalid symbol {:?} at position {}", found, position)
            }
            MorseError::EmptyPattern => write!(f, "Pattern has no symbols"),
            MorseError::PatternTooLong => write!(f, "Pattern is too long"),
            MorseError::EmptyWord => write!(f, "Word has no letters"),
            MorseError::WordTooLong => write!(f, "Word is too long"),
            MorseError::UnknownLetter(c) => write!(f, "No Morse pattern for {:?}", c),
            MorseError::NoWords => write!(f, "Channel has no words"),
            MorseError::TooManyWords => write!(f, "Channel has too many words"),
            MorseError::InvalidTimeUnit => write!(f, "Time unit out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MorseError {}

/// Fatal errors raised while starting the scheduler
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// Scheduler-wide configuration failed validation
    InvalidConfig(MorseError),
    /// No channels were given
    NoChannels,
    /// More channels than the scheduler has room for
    TooManyChannels,
    /// A channel's words or time unit failed validation
    InvalidChannel { channel: usize, error: MorseError },
    /// A channel's output hardware is not initialized
    DriverNotReady { channel: usize },
    /// The platform failed to configure a channel's output
    DriverConfigError { channel: usize, code: i32 },
    /// No free execution context for a channel
    SpawnFailed { channel: usize },
}

impl StartupError {
    /// Index of the channel that caused the failure, if any
    pub const fn channel(&self) -> Option<usize> {
        match self {
            StartupError::InvalidConfig(_) | StartupError::NoChannels | StartupError::TooManyChannels => None,
            StartupError::InvalidChannel { channel, .. }
            | StartupError::DriverNotReady { channel }
            | StartupError::DriverConfigError { channel, .. }
            | StartupError::SpawnFailed { channel } => Some(*channel),
        }
    }

    pub(crate) fn from_driver(channel: usize, error: DriverError) -> Self {
        match error {
            DriverError::NotReady => StartupError::DriverNotReady { channel },
            DriverError::Config(code) => StartupError::DriverConfigError { channel, code },
        }
    }
}

#[cfg(feature = "std")]
impl core::fmt::Display for StartupError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StartupError::InvalidConfig(error) => write!(f, "Scheduler configuration: {}", error),
            StartupError::NoChannels => write!(f, "No channels configured"),
            StartupError::TooManyChannels => write!(f, "Too many channels"),
            StartupError::InvalidChannel { channel, error } => {
                write!(f, "Channel {}: {}", channel, error)
            }
            StartupError::DriverNotReady { channel } => {
                write!(f, "Channel {}: output not ready", channel)
            }
            StartupError::DriverConfigError { channel, code } => {
                write!(f, "Channel {}: output configuration failed (code {})", channel, code)
            }
            StartupError::SpawnFailed { channel } => {
                write!(f, "Channel {}: no free task slot", channel)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StartupError {}
