//! International Morse letter table (A–Z, 0–9)

use crate::encoder::Pattern;
use crate::error::MorseError;

const fn entry(letter: char, code: &str) -> (char, Pattern) {
    match Pattern::parse(code) {
        Ok(pattern) => (letter, pattern),
        Err(_) => panic!("malformed pattern in Morse table"),
    }
}

/// Letter → pattern table, validated at compile time
pub static ALPHABET: [(char, Pattern); 36] = [
    entry('A', ".-"),
    entry('B', "-..."),
    entry('C', "-.-."),
    entry('D', "-.."),
    entry('E', "."),
    entry('F', "..-."),
    entry('G', "--."),
    entry('H', "...."),
    entry('I', ".."),
    entry('J', ".---"),
    entry('K', "-.-"),
    entry('L', ".-.."),
    entry('M', "--"),
    entry('N', "-."),
    entry('O', "---"),
    entry('P', ".--."),
    entry('Q', "--.-"),
    entry('R', ".-."),
    entry('S', "..."),
    entry('T', "-"),
    entry('U', "..-"),
    entry('V', "...-"),
    entry('W', ".--"),
    entry('X', "-..-"),
    entry('Y', "-.--"),
    entry('Z', "--.."),
    entry('0', "-----"),
    entry('1', ".----"),
    entry('2', "..---"),
    entry('3', "...--"),
    entry('4', "....-"),
    entry('5', "....."),
    entry('6', "-...."),
    entry('7', "--..."),
    entry('8', "---.."),
    entry('9', "----."),
];

/// Pattern for a letter; lookup ignores case
pub fn pattern_for(letter: char) -> Option<Pattern> {
    let letter = letter.to_ascii_uppercase();
    ALPHABET
        .iter()
        .find(|(c, _)| *c == letter)
        .map(|(_, pattern)| *pattern)
}

/// Letter a pattern spells, if it is in the table
pub fn letter_for(pattern: Pattern) -> Option<char> {
    ALPHABET
        .iter()
        .find(|(_, p)| *p == pattern)
        .map(|(c, _)| *c)
}

/// Like [`pattern_for`] but reports the offending character
pub fn encode_letter(letter: char) -> Result<Pattern, MorseError> {
    pattern_for(letter).ok_or(MorseError::UnknownLetter(letter))
}
