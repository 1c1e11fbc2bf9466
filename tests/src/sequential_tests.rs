//! Sequential mode: a single context, channels taking turns

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::*;
use morse_core::*;

static TURNS: [(&str, &[&str]); 4] = [
    ("led0", &["geoff"]),
    ("led1", &["chavez"]),
    ("led2", &["likes"]),
    ("led3", &["digimon"]),
];

fn sequential_config() -> MorseConfig {
    MorseConfig {
        mode: ScheduleMode::Sequential,
        ..default_config()
    }
}

fn start_turns(log: &SignalLog) -> Scheduler<RecordingSignal> {
    let configs = TURNS
        .iter()
        .enumerate()
        .map(|(id, &(label, words))| ChannelConfig::new(label, log.signal(id), words));
    Scheduler::start(configs, sequential_config()).unwrap()
}

/// Run the round robin until `run_ms` of virtual time has passed
async fn run_turns(scheduler: &mut Scheduler<RecordingSignal>, run_ms: u64) {
    let stop = Arc::new(AtomicBool::new(false));
    let stopper = {
        let stop = stop.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(run_ms)).await;
            stop.store(true, Ordering::Release);
        })
    };

    scheduler.run_sequential_until(&mut TokioTimer, &stop).await;
    stopper.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_sequential_round_robin_order() {
    println!("🔁 Testing sequential round robin...");
    let log = SignalLog::new(virtual_clock());
    let mut scheduler = start_turns(&log);
    assert_eq!(scheduler.mode(), ScheduleMode::Sequential);

    run_turns(&mut scheduler, 120_000).await;

    let mut turns = log.activation_order();
    turns.dedup();
    assert!(turns.len() >= 8, "only {} turns", turns.len());
    for (index, channel) in turns.iter().enumerate() {
        assert_eq!(*channel, index % 4, "turn {} went to channel {}", index, channel);
    }
    println!("  ✅ {} turns in order 0, 1, 2, 3", turns.len());
}

#[tokio::test(start_paused = true)]
async fn test_sequential_never_overlaps() {
    let log = SignalLog::new(virtual_clock());
    let mut scheduler = start_turns(&log);

    run_turns(&mut scheduler, 60_000).await;

    assert_eq!(log.max_concurrently_active(), 1);
    for channel in 0..4 {
        let last = log.states(channel).last().copied().unwrap();
        assert!(!last.1, "channel {} left on", channel);
    }
}

#[tokio::test(start_paused = true)]
async fn test_sequential_turns_start_after_previous_word() {
    let log = SignalLog::new(virtual_clock());
    let mut scheduler = start_turns(&log);
    let words: Vec<Word> = scheduler.channels().iter().map(|c| c.words()[0].clone()).collect();

    // One full round plus the start of channel 0's second turn
    run_turns(&mut scheduler, 40_000).await;

    let mut expected_start = DEFAULT_SETTLE_MS;
    for (channel, word) in words.iter().enumerate() {
        let states = log.states(channel);
        let (at_ms, active) = states[0];
        assert!(active);
        assert!(
            at_ms.abs_diff(expected_start) <= 1,
            "channel {} started at {}ms, expected {}ms",
            channel,
            at_ms,
            expected_start
        );

        // Every pulse but the trailing word gap; that one lasts until this
        // channel's next turn
        let once = expected_trace(word.pulses(), DEFAULT_UNIT_MS);
        let body = once.len() - 1;
        assert_trace_matches(&log.pulse_trace(channel)[..body], &once[..body], 1);

        // The word gap runs until the next channel takes over
        let gap_start = states[body].0;
        let next = (channel + 1) % words.len();
        // After the last channel, channel 0's second turn follows its first word
        let next_turn = if next == 0 { words[0].pulses().count() } else { 0 };
        let next_start = log.states(next)[next_turn].0;
        assert!(
            (next_start - gap_start).abs_diff(WORD_GAP_UNITS as u64 * DEFAULT_UNIT_MS) <= 1,
            "gap after channel {} lasted {}ms",
            channel,
            next_start - gap_start
        );

        expected_start += word.cycle_duration(Duration::from_millis(DEFAULT_UNIT_MS)).as_millis();
    }
}

#[test]
fn test_stop_before_first_turn_only_settles() {
    let log = SignalLog::untimed();
    let mut scheduler = start_turns(&log);
    let mut timer = RecordingTimer::new();
    let stop = AtomicBool::new(true);

    tokio_test::block_on(scheduler.run_sequential_until(&mut timer, &stop));

    assert_eq!(timer.waits(), vec![DEFAULT_SETTLE_MS]);
    assert_eq!(log.activation_order(), Vec::<usize>::new());
    for channel in 0..4 {
        assert_eq!(log.states(channel), vec![(0, false)]);
    }
}

#[test]
fn test_channel_turn_waits_follow_pulses() {
    static ET: &[&str] = &["e", "t"];
    let log = SignalLog::untimed();
    let scheduler = Scheduler::start([ChannelConfig::new("led0", log.signal(0), ET)], sequential_config()).unwrap();
    let mut channel = scheduler.into_channels().into_iter().next().unwrap();
    let mut timer = RecordingTimer::new();

    tokio_test::block_on(channel.transmit_all(&mut timer));
    assert_eq!(timer.waits(), vec![150, 1050, 450, 1050]);
    assert_eq!(log.states(0), vec![(0, true), (0, false), (0, true), (0, false)]);

    // Rotation picks up where it left off
    let mut timer = RecordingTimer::new();
    tokio_test::block_on(async {
        channel.transmit_next(&mut timer).await;
        channel.transmit_next(&mut timer).await;
        channel.transmit_next(&mut timer).await;
    });
    assert_eq!(timer.waits(), vec![150, 1050, 450, 1050, 150, 1050]);
}
