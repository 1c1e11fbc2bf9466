//! Encoder and sequencer throughput
//!
//! Run with:
//!   cargo bench -p morse-tests --bench sequencer_throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use morse_core::alphabet::pattern_for;
use morse_core::{Pattern, Pulse, Word};

fn bench_pattern_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_parse");

    for code in ["-", ".-", "--.", "-.-.", "-----"] {
        group.bench_with_input(BenchmarkId::from_parameter(code), code, |b, code| {
            b.iter(|| Pattern::parse(black_box(code)))
        });
    }

    group.finish();
}

fn bench_word_pulses(c: &mut Criterion) {
    let mut group = c.benchmark_group("word_pulses");

    for text in ["e", "geoff", "digimon", "abcdefghijklmnop"] {
        let word = Word::from_text(text).unwrap_or_else(|e| panic!("{}: {}", text, e));
        let pulses = word.pulses().count() as u64;
        group.throughput(Throughput::Elements(pulses));

        group.bench_with_input(BenchmarkId::from_parameter(text), &word, |b, word| {
            b.iter(|| word.pulses().map(|p: Pulse| p.units).sum::<u32>())
        });
    }

    group.finish();
}

fn bench_word_from_text(c: &mut Criterion) {
    c.bench_function("word_from_text_geoff", |b| b.iter(|| Word::from_text(black_box("geoff"))));
    c.bench_function("pattern_for_lookup", |b| {
        b.iter(|| "THEQUICKBROWNFOX".chars().filter_map(|l| pattern_for(black_box(l))).count())
    });
}

criterion_group!(benches, bench_pattern_parse, bench_word_pulses, bench_word_from_text);
criterion_main!(benches);
