//! Symbol encoder: letter patterns and their pulse sequences

use core::fmt;

use crate::error::MorseError;
use crate::types::{Pulse, Symbol, MAX_SYMBOLS_PER_PATTERN, SYMBOL_GAP_UNITS};

/// Dot/dash pattern of one letter
///
/// Symbols are packed into a byte, bit `i` set meaning symbol `i` is a dash.
/// A pattern always holds at least one symbol.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pattern {
    bits: u8,
    len: u8,
}

impl Pattern {
    /// Parse a pattern string such as `"--."`
    ///
    /// Usable in const context, which is how the alphabet table gets checked
    /// at build time.
    pub const fn parse(code: &str) -> Result<Self, MorseError> {
        let bytes = code.as_bytes();
        if bytes.is_empty() {
            return Err(MorseError::EmptyPattern);
        }
        if bytes.len() > MAX_SYMBOLS_PER_PATTERN {
            return Err(MorseError::PatternTooLong);
        }

        let mut bits = 0u8;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'.' => {}
                b'-' => bits |= 1 << i,
                other => {
                    let found = if other.is_ascii() { other as char } else { char::REPLACEMENT_CHARACTER };
                    return Err(MorseError::InvalidSymbol { found, position: i as u8 });
                }
            }
            i += 1;
        }

        Ok(Self { bits, len: bytes.len() as u8 })
    }

    /// Build a pattern from symbols
    pub fn from_symbols(symbols: &[Symbol]) -> Result<Self, MorseError> {
        if symbols.is_empty() {
            return Err(MorseError::EmptyPattern);
        }
        if symbols.len() > MAX_SYMBOLS_PER_PATTERN {
            return Err(MorseError::PatternTooLong);
        }

        let bits = symbols
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Symbol::Dash)
            .fold(0u8, |bits, (i, _)| bits | 1 << i);

        Ok(Self { bits, len: symbols.len() as u8 })
    }

    /// Number of symbols
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; kept for API symmetry with slices
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Symbol at `index`, if in range
    pub const fn symbol(&self, index: usize) -> Option<Symbol> {
        if index >= self.len as usize {
            None
        } else if self.bits & (1 << index) != 0 {
            Some(Symbol::Dash)
        } else {
            Some(Symbol::Dot)
        }
    }

    /// Symbols in sending order
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.len()).filter_map(move |i| self.symbol(i))
    }

    /// Lazy pulse sequence for this letter, without leading or trailing gaps
    pub fn pulses(&self) -> SymbolPulses {
        SymbolPulses {
            pattern: *self,
            next: 0,
            gap_pending: false,
        }
    }

    /// Sum of all pulse units of this letter
    pub fn units(&self) -> u32 {
        let marks: u32 = self.symbols().map(|s| s.duration_units()).sum();
        marks + (self.len as u32 - 1) * SYMBOL_GAP_UNITS
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.symbols() {
            write!(f, "{}", symbol.marker())?;
        }
        Ok(())
    }
}

/// Pulses of a single letter: marks separated by 1T gaps
#[derive(Clone, Debug)]
pub struct SymbolPulses {
    pattern: Pattern,
    next: u8,
    gap_pending: bool,
}

impl Iterator for SymbolPulses {
    type Item = Pulse;

    fn next(&mut self) -> Option<Pulse> {
        if self.gap_pending {
            self.gap_pending = false;
            return Some(Pulse::off(SYMBOL_GAP_UNITS));
        }

        let symbol = self.pattern.symbol(self.next as usize)?;
        self.next += 1;
        self.gap_pending = self.next < self.pattern.len;
        Some(Pulse::on(symbol.duration_units()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let marks = self.pattern.len.saturating_sub(self.next) as usize;
        let remaining = (marks * 2).saturating_sub(1) + self.gap_pending as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SymbolPulses {}
