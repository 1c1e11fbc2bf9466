//! Table-driven and property tests for the encoder and sequencer

use morse_core::alphabet::{letter_for, pattern_for, ALPHABET};
use morse_core::*;
use proptest::prelude::*;
use rstest::rstest;

fn on(units: u32) -> Pulse {
    Pulse::on(units)
}

fn off(units: u32) -> Pulse {
    Pulse::off(units)
}

#[rstest]
#[case(".", &[on(1)])]
#[case("-", &[on(3)])]
#[case(".-", &[on(1), off(1), on(3)])]
#[case("--.", &[on(3), off(1), on(3), off(1), on(1)])]
#[case("...-", &[on(1), off(1), on(1), off(1), on(1), off(1), on(3)])]
fn test_pattern_pulses(#[case] code: &str, #[case] expected: &[Pulse]) {
    let pattern = Pattern::parse(code).unwrap();
    let pulses: Vec<Pulse> = pattern.pulses().collect();
    assert_eq!(pulses, expected);
}

#[rstest]
#[case("", MorseError::EmptyPattern)]
#[case(".-x", MorseError::InvalidSymbol { found: 'x', position: 2 })]
#[case("_", MorseError::InvalidSymbol { found: '_', position: 0 })]
#[case(".........", MorseError::PatternTooLong)]
fn test_pattern_rejects(#[case] code: &str, #[case] expected: MorseError) {
    assert_eq!(Pattern::parse(code), Err(expected));
}

#[rstest]
#[case(&["--.", "."], &[on(3), off(1), on(3), off(1), on(1), off(3), on(1), off(7)])]
#[case(&["."], &[on(1), off(7)])]
#[case(&["-", "-"], &[on(3), off(3), on(3), off(7)])]
fn test_word_pulses(#[case] codes: &[&str], #[case] expected: &[Pulse]) {
    let word = Word::from_patterns(codes).unwrap();
    let pulses: Vec<Pulse> = word.pulses().collect();
    assert_eq!(pulses, expected);
}

#[rstest]
#[case("geoff", 58)]
#[case("e", 8)]
#[case("t", 10)]
#[case("sos", 34)]
fn test_word_cycle_units(#[case] text: &str, #[case] units: u32) {
    let word = Word::from_text(text).unwrap();
    assert_eq!(word.cycle_units(), units);
    assert_eq!(
        word.cycle_duration(Duration::from_millis(DEFAULT_UNIT_MS)).as_millis(),
        units as u64 * DEFAULT_UNIT_MS
    );
}

#[rstest]
#[case(150, 8)]
#[case(60, 20)]
#[case(100, 12)]
fn test_config_wpm(#[case] unit_ms: u64, #[case] wpm: u32) {
    let config = MorseConfig::new(unit_ms, ScheduleMode::Parallel).unwrap();
    assert_eq!(config.wpm(), wpm);
    assert_eq!(MorseConfig::from_wpm(wpm, ScheduleMode::Parallel).unwrap().unit.as_millis(), unit_ms);
}

#[test]
fn test_alphabet_round_trip() {
    println!("🔤 Checking {} alphabet entries...", ALPHABET.len());
    for (letter, pattern) in ALPHABET.iter() {
        assert_eq!(pattern_for(*letter), Some(*pattern));
        assert_eq!(letter_for(*pattern), Some(*letter));
    }
    println!("  ✅ Alphabet is a bijection");
}

fn pattern_code() -> impl Strategy<Value = String> {
    "[.-]{1,8}"
}

proptest! {
    #[test]
    fn prop_pattern_alternates_and_ends_active(code in pattern_code()) {
        let pattern = Pattern::parse(&code).unwrap();
        let pulses: Vec<Pulse> = pattern.pulses().collect();
        let n = code.len();

        prop_assert_eq!(pulses.len(), 2 * n - 1);
        prop_assert!(pulses.first().unwrap().active);
        prop_assert!(pulses.last().unwrap().active);
        for (i, pulse) in pulses.iter().enumerate() {
            prop_assert_eq!(pulse.active, i % 2 == 0);
            if !pulse.active {
                prop_assert_eq!(pulse.units, SYMBOL_GAP_UNITS);
            }
        }
        let marks: String = pulses
            .iter()
            .filter(|p| p.active)
            .map(|p| if p.units == DASH_UNITS { '-' } else { '.' })
            .collect();
        prop_assert_eq!(marks, code);
    }

    #[test]
    fn prop_word_gaps_only_between_letters(text in "[a-z0-9]{1,16}") {
        let word = Word::from_text(&text).unwrap();
        let pulses: Vec<Pulse> = word.pulses().collect();
        let k = text.len();

        let letter_gaps = pulses.iter().filter(|p| **p == Pulse::off(LETTER_GAP_UNITS)).count();
        let word_gaps = pulses.iter().filter(|p| **p == Pulse::off(WORD_GAP_UNITS)).count();
        prop_assert_eq!(letter_gaps, k - 1);
        prop_assert_eq!(word_gaps, 1);
        prop_assert_eq!(*pulses.last().unwrap(), Pulse::off(WORD_GAP_UNITS));

        let total: u32 = pulses.iter().map(|p| p.units).sum();
        prop_assert_eq!(total, word.cycle_units());
    }

    #[test]
    fn prop_word_replays_identically(text in "[a-zA-Z]{1,16}") {
        let word = Word::from_text(&text).unwrap();
        let mut pulses = word.pulses();
        let first: Vec<Pulse> = pulses.by_ref().collect();
        pulses.restart();
        let second: Vec<Pulse> = pulses.collect();
        prop_assert_eq!(first, second);
    }
}
