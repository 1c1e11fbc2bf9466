//! Word sequencer: letters joined by letter gaps, closed by a word gap

use core::fmt;

use heapless::Vec;

use crate::alphabet;
use crate::encoder::{Pattern, SymbolPulses};
use crate::error::MorseError;
use crate::hal::Duration;
use crate::types::{Pulse, LETTER_GAP_UNITS, MAX_LETTERS_PER_WORD, WORD_GAP_UNITS};

/// Ordered, non-empty list of letters
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Word {
    letters: Vec<Pattern, MAX_LETTERS_PER_WORD>,
}

impl Word {
    /// Build a word from letter patterns in spelling order
    pub fn from_letters<I>(letters: I) -> Result<Self, MorseError>
    where
        I: IntoIterator<Item = Pattern>,
    {
        let mut word = Vec::new();
        for pattern in letters {
            word.push(pattern).map_err(|_| MorseError::WordTooLong)?;
        }
        if word.is_empty() {
            return Err(MorseError::EmptyWord);
        }
        Ok(Self { letters: word })
    }

    /// Spell `text` through the alphabet table
    pub fn from_text(text: &str) -> Result<Self, MorseError> {
        let mut letters: Vec<Pattern, MAX_LETTERS_PER_WORD> = Vec::new();
        for c in text.chars() {
            let pattern = alphabet::encode_letter(c)?;
            letters.push(pattern).map_err(|_| MorseError::WordTooLong)?;
        }
        Self::from_letters(letters)
    }

    /// Build a word from raw pattern strings, e.g. `&["--.", "."]`
    pub fn from_patterns(codes: &[&str]) -> Result<Self, MorseError> {
        let mut letters: Vec<Pattern, MAX_LETTERS_PER_WORD> = Vec::new();
        for code in codes {
            letters
                .push(Pattern::parse(code)?)
                .map_err(|_| MorseError::WordTooLong)?;
        }
        Self::from_letters(letters)
    }

    pub fn letters(&self) -> &[Pattern] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Never true for a constructed word
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Pulse sequence for one transmission of the word
    pub fn pulses(&self) -> WordPulses<'_> {
        WordPulses::new(self)
    }

    /// Units in one full cycle, trailing word gap included
    pub fn cycle_units(&self) -> u32 {
        let letters: u32 = self.letters.iter().map(Pattern::units).sum();
        let letter_gaps = (self.letters.len() as u32 - 1) * LETTER_GAP_UNITS;
        letters + letter_gaps + WORD_GAP_UNITS
    }

    /// Wall-clock length of one cycle
    pub fn cycle_duration(&self, unit: Duration) -> Duration {
        unit * self.cycle_units()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pattern in &self.letters {
            match alphabet::letter_for(*pattern) {
                Some(letter) => write!(f, "{}", letter.to_ascii_lowercase())?,
                None => write!(f, "[{}]", pattern)?,
            }
        }
        Ok(())
    }
}

/// Restartable pulse iterator over a word
#[derive(Clone, Debug)]
pub struct WordPulses<'a> {
    word: &'a Word,
    letter: usize,
    current: SymbolPulses,
    finished: bool,
}

impl<'a> WordPulses<'a> {
    fn new(word: &'a Word) -> Self {
        Self {
            word,
            letter: 0,
            current: word.letters[0].pulses(),
            finished: false,
        }
    }

    /// Rewind to the first pulse of the word
    pub fn restart(&mut self) {
        *self = Self::new(self.word);
    }
}

impl Iterator for WordPulses<'_> {
    type Item = Pulse;

    fn next(&mut self) -> Option<Pulse> {
        if let Some(pulse) = self.current.next() {
            return Some(pulse);
        }
        if self.finished {
            return None;
        }

        self.letter += 1;
        match self.word.letters.get(self.letter) {
            Some(pattern) => {
                self.current = pattern.pulses();
                Some(Pulse::off(LETTER_GAP_UNITS))
            }
            None => {
                self.finished = true;
                Some(Pulse::off(WORD_GAP_UNITS))
            }
        }
    }
}
