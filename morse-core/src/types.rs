//! Core data types for the Morse timing engine

use crate::error::MorseError;
use crate::hal::Duration;

/// Dot length in units
pub const DOT_UNITS: u32 = 1;
/// Dash length in units
pub const DASH_UNITS: u32 = 3;
/// Gap between symbols of the same letter
pub const SYMBOL_GAP_UNITS: u32 = 1;
/// Gap between letters of a word
pub const LETTER_GAP_UNITS: u32 = 3;
/// Gap after a word, before it repeats or the next word starts
pub const WORD_GAP_UNITS: u32 = 7;

/// Longest pattern a letter may carry (stored as bits of a `u8`)
pub const MAX_SYMBOLS_PER_PATTERN: usize = 8;
/// Letters per word
pub const MAX_LETTERS_PER_WORD: usize = 16;
/// Words one channel can cycle through
pub const MAX_WORDS_PER_CHANNEL: usize = 4;
/// Channels one scheduler can drive
pub const MAX_CHANNELS: usize = 8;

/// Default base time unit in milliseconds
pub const DEFAULT_UNIT_MS: u64 = 150;
/// Default pause between configuring the outputs and the first pulse
pub const DEFAULT_SETTLE_MS: u64 = 500;
/// Slowest accepted time unit
pub const MAX_UNIT_MS: u64 = 2000;

/// Morse symbols
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    /// Short mark
    Dot,
    /// Long mark
    Dash,
}

impl Symbol {
    /// Returns the on-time of this symbol in units
    pub const fn duration_units(&self) -> u32 {
        match self {
            Symbol::Dot => DOT_UNITS,
            Symbol::Dash => DASH_UNITS,
        }
    }

    /// Textual marker used in pattern strings
    pub const fn marker(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }

    /// Parse a textual marker
    pub const fn from_marker(marker: char) -> Option<Symbol> {
        match marker {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            _ => None,
        }
    }
}

/// One atomic step of a transmission: hold the output at `active` for `units` × T
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    pub active: bool,
    pub units: u32,
}

impl Pulse {
    /// Output on for `units`
    pub const fn on(units: u32) -> Self {
        Self { active: true, units }
    }

    /// Output off for `units`
    pub const fn off(units: u32) -> Self {
        Self { active: false, units }
    }

    /// Wall-clock length for the given time unit
    pub fn duration(&self, unit: Duration) -> Duration {
        unit * self.units
    }
}

/// How the scheduler maps channels onto execution contexts
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleMode {
    /// One execution context per channel, all transmitting at once
    #[default]
    Parallel,
    /// One execution context, channels take turns in fixed order
    Sequential,
}

impl ScheduleMode {
    /// Number of execution contexts needed for `channels` channels
    pub const fn contexts(&self, channels: usize) -> usize {
        match self {
            ScheduleMode::Parallel => channels,
            ScheduleMode::Sequential => 1,
        }
    }
}

/// Transmission configuration parameters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MorseConfig {
    /// Base time unit T (dot duration)
    pub unit: Duration,
    /// Parallel or sequential scheduling
    pub mode: ScheduleMode,
    /// Pause after configuration before the first pulse
    pub settle_delay: Duration,
}

impl Default for MorseConfig {
    fn default() -> Self {
        Self {
            unit: Duration::from_millis(DEFAULT_UNIT_MS),
            mode: ScheduleMode::Parallel,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_MS),
        }
    }
}

impl MorseConfig {
    /// Create a new configuration with validation
    pub fn new(unit_ms: u64, mode: ScheduleMode) -> Result<Self, MorseError> {
        Ok(Self {
            unit: validate_unit_ms(unit_ms)?,
            mode,
            ..Self::default()
        })
    }

    /// Create a configuration from a speed in words per minute
    pub fn from_wpm(wpm: u32, mode: ScheduleMode) -> Result<Self, MorseError> {
        if wpm == 0 || wpm > 100 {
            return Err(MorseError::InvalidTimeUnit);
        }

        // PARIS standard: 50 units per word
        Self::new(1200 / wpm as u64, mode)
    }

    /// Replace the settle delay
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Get Words Per Minute from current unit timing
    pub fn wpm(&self) -> u32 {
        (1200 / self.unit.as_millis().max(1)).max(1) as u32
    }

    pub fn dot_duration(&self) -> Duration {
        self.unit * DOT_UNITS
    }

    pub fn dash_duration(&self) -> Duration {
        self.unit * DASH_UNITS
    }

    pub fn symbol_gap(&self) -> Duration {
        self.unit * SYMBOL_GAP_UNITS
    }

    pub fn letter_gap(&self) -> Duration {
        self.unit * LETTER_GAP_UNITS
    }

    pub fn word_gap(&self) -> Duration {
        self.unit * WORD_GAP_UNITS
    }
}

/// Check a time unit in milliseconds and turn it into a `Duration`
pub fn validate_unit_ms(unit_ms: u64) -> Result<Duration, MorseError> {
    if unit_ms == 0 || unit_ms > MAX_UNIT_MS {
        return Err(MorseError::InvalidTimeUnit);
    }
    Ok(Duration::from_millis(unit_ms))
}
