//! Transmission scheduler: drives channels through their words forever
//!
//! Startup runs in three passes over every channel: validate words, query
//! readiness, configure outputs. Nothing transmits unless all three pass for
//! all channels. After that there is no failure path; the only suspension
//! point is [`PulseTimer::wait`] between pulses.

use core::sync::atomic::{AtomicBool, Ordering};

use heapless::Vec;

use crate::error::{MorseError, StartupError};
use crate::hal::{Duration, SignalDriver};
use crate::sequencer::Word;
use crate::types::{validate_unit_ms, MorseConfig, ScheduleMode, MAX_CHANNELS, MAX_WORDS_PER_CHANNEL};

/// Suspends the current execution context between pulses
#[allow(async_fn_in_trait)]
pub trait PulseTimer {
    /// Suspend for `duration`; must not block other execution contexts
    async fn wait(&mut self, duration: Duration);
}

/// Timer backed by the embassy time driver
#[cfg(feature = "embassy-time")]
#[derive(Copy, Clone, Debug, Default)]
pub struct EmbassyTimer;

#[cfg(feature = "embassy-time")]
impl PulseTimer for EmbassyTimer {
    async fn wait(&mut self, duration: Duration) {
        embassy_time::Timer::after(duration).await;
    }
}

/// What one channel should send, and on which output
pub struct ChannelConfig<S> {
    /// Output handle; identifies the physical output
    pub signal: S,
    /// Name used in log output
    pub label: &'static str,
    /// Words in sending order, spelled in plain letters
    pub words: &'static [&'static str],
    /// Time unit override; the scheduler default applies when `None`
    pub unit_ms: Option<u64>,
}

impl<S> ChannelConfig<S> {
    pub fn new(label: &'static str, signal: S, words: &'static [&'static str]) -> Self {
        Self {
            signal,
            label,
            words,
            unit_ms: None,
        }
    }

    /// Use a time unit other than the scheduler default
    pub fn with_unit_ms(mut self, unit_ms: u64) -> Self {
        self.unit_ms = Some(unit_ms);
        self
    }
}

/// One output bound to the words it transmits
pub struct Channel<S> {
    id: usize,
    label: &'static str,
    signal: S,
    words: Vec<Word, MAX_WORDS_PER_CHANNEL>,
    unit: Duration,
    settle: Duration,
    next_word: usize,
    active: bool,
}

impl<S: SignalDriver> Channel<S> {
    fn build(id: usize, config: ChannelConfig<S>, defaults: &MorseConfig) -> Result<Self, MorseError> {
        let unit = match config.unit_ms {
            Some(ms) => validate_unit_ms(ms)?,
            None => defaults.unit,
        };

        let mut words = Vec::new();
        for text in config.words {
            words
                .push(Word::from_text(text)?)
                .map_err(|_| MorseError::TooManyWords)?;
        }
        if words.is_empty() {
            return Err(MorseError::NoWords);
        }

        Ok(Self {
            id,
            label: config.label,
            signal: config.signal,
            words,
            unit,
            settle: defaults.settle_delay,
            next_word: 0,
            active: false,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn unit(&self) -> Duration {
        self.unit
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn signal(&self) -> &S {
        &self.signal
    }

    /// Last state written to the output
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drive the output off
    pub fn silence(&mut self) {
        self.signal.set_active(false);
        self.active = false;
    }

    /// Send one word once, trailing word gap included
    pub async fn transmit_word<T: PulseTimer>(&mut self, index: usize, timer: &mut T) {
        #[cfg(feature = "defmt")]
        defmt::trace!("📡 {}: word {}", self.label, index);

        let Self {
            signal,
            words,
            unit,
            active,
            ..
        } = self;
        let Some(word) = words.get(index) else {
            return;
        };

        for pulse in word.pulses() {
            signal.set_active(pulse.active);
            *active = pulse.active;
            timer.wait(pulse.duration(*unit)).await;
        }
    }

    /// Send the next word in rotation
    pub async fn transmit_next<T: PulseTimer>(&mut self, timer: &mut T) {
        let index = self.next_word;
        self.transmit_word(index, timer).await;
        self.next_word = (index + 1) % self.words.len();
    }

    /// Send every word once, in order; one turn in sequential mode
    pub async fn transmit_all<T: PulseTimer>(&mut self, timer: &mut T) {
        for index in 0..self.words.len() {
            self.transmit_word(index, timer).await;
        }
    }

    /// Parallel-mode body: settle, then cycle through the words forever
    ///
    /// Never completes.
    pub async fn run_forever<T: PulseTimer>(mut self, mut timer: T) {
        #[cfg(feature = "defmt")]
        defmt::info!("🚀 Channel {} ({}) started", self.id, self.label);

        timer.wait(self.settle).await;
        loop {
            self.transmit_next(&mut timer).await;
        }
    }

    /// Like [`Channel::run_forever`] but checks `stop` at every word boundary
    ///
    /// The output is left off when this returns.
    pub async fn run_until<T: PulseTimer>(&mut self, timer: &mut T, stop: &AtomicBool) {
        timer.wait(self.settle).await;
        while !stop.load(Ordering::Acquire) {
            self.transmit_next(timer).await;
        }
        self.silence();

        #[cfg(feature = "defmt")]
        defmt::info!("⏹️ Channel {} ({}) stopped", self.id, self.label);
    }
}

/// Validated, configured set of channels ready to transmit
pub struct Scheduler<S> {
    channels: Vec<Channel<S>, MAX_CHANNELS>,
    config: MorseConfig,
}

impl<S: SignalDriver> Scheduler<S> {
    /// Validate every channel, check every output is ready, then configure them
    ///
    /// The scheduler-wide time unit is checked first, with the same bounds
    /// as per-channel overrides.
    ///
    /// All-or-nothing: on any failure no channel is returned and every output
    /// that was already configured is driven off. Each channel's readiness is
    /// queried even after an earlier one failed; the first failure is reported.
    pub fn start<I>(configs: I, config: MorseConfig) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = ChannelConfig<S>>,
    {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "🔧 Starting scheduler: {}ms unit, {} WPM, {:?}",
            config.unit.as_millis(),
            config.wpm(),
            config.mode
        );

        validate_unit_ms(config.unit.as_millis()).map_err(StartupError::InvalidConfig)?;

        let mut channels: Vec<Channel<S>, MAX_CHANNELS> = Vec::new();
        for (id, channel_config) in configs.into_iter().enumerate() {
            let channel = Channel::build(id, channel_config, &config)
                .map_err(|error| StartupError::InvalidChannel { channel: id, error })?;
            channels
                .push(channel)
                .map_err(|_| StartupError::TooManyChannels)?;
        }
        if channels.is_empty() {
            return Err(StartupError::NoChannels);
        }

        let mut first_failure = None;
        for channel in channels.iter() {
            if !channel.signal.is_ready() {
                #[cfg(feature = "defmt")]
                defmt::error!("❌ Channel {} ({}): output not ready", channel.id, channel.label);
                first_failure.get_or_insert(StartupError::DriverNotReady { channel: channel.id });
            }
        }
        if let Some(error) = first_failure {
            return Err(error);
        }

        let mut scheduler = Self { channels, config };
        for index in 0..scheduler.channels.len() {
            let channel = &mut scheduler.channels[index];
            if let Err(error) = channel.signal.configure() {
                #[cfg(feature = "defmt")]
                defmt::error!("❌ Channel {} ({}): configure failed: {:?}", channel.id, channel.label, error);

                let error = StartupError::from_driver(channel.id, error);
                for configured in scheduler.channels[..index].iter_mut() {
                    configured.silence();
                }
                return Err(error);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "✅ {} channels configured, {} execution contexts",
            scheduler.channels.len(),
            config.mode.contexts(scheduler.channels.len())
        );

        Ok(scheduler)
    }

    pub fn mode(&self) -> ScheduleMode {
        self.config.mode
    }

    pub fn config(&self) -> &MorseConfig {
        &self.config
    }

    pub fn channels(&self) -> &[Channel<S>] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Never true for a started scheduler
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Drive every output off
    pub fn all_off(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.silence();
        }
    }

    /// Hand out the channels, one per execution context (parallel mode)
    pub fn into_channels(self) -> Vec<Channel<S>, MAX_CHANNELS> {
        self.channels
    }

    /// Sequential mode: one context, channels take turns in fixed order
    ///
    /// Never completes.
    pub async fn run_sequential<T: PulseTimer>(mut self, mut timer: T) {
        #[cfg(feature = "defmt")]
        defmt::info!("🔁 Sequential transmission over {} channels", self.channels.len());

        timer.wait(self.config.settle_delay).await;
        loop {
            for channel in self.channels.iter_mut() {
                channel.transmit_all(&mut timer).await;
            }
        }
    }

    /// Like [`Scheduler::run_sequential`] but checks `stop` before each turn
    pub async fn run_sequential_until<T: PulseTimer>(&mut self, timer: &mut T, stop: &AtomicBool) {
        timer.wait(self.config.settle_delay).await;
        'rounds: loop {
            for channel in self.channels.iter_mut() {
                if stop.load(Ordering::Acquire) {
                    break 'rounds;
                }
                channel.transmit_all(timer).await;
            }
        }
        self.all_off();
    }
}
