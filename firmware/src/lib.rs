#![no_std]

//! Firmware library: board drivers, demo words and the embassy tasks that
//! run the Morse channels

pub use embassy_executor::Spawner;

pub use morse_core::*;

pub use crate::ch32v203_hardware::*;
pub use crate::tasks::*;
pub use crate::time_driver::init_systick;

/// Words each LED repeats, LED0 first
pub mod words {
    /// One word per LED, all blinking at once
    pub static PARALLEL_WORDS: [&[&str]; 4] = [&["geoff"], &["cha"], &["is"], &["dumb"]];

    /// One word per LED, the LEDs taking turns
    pub static SEQUENTIAL_WORDS: [&[&str]; 4] = [&["geoff"], &["chavez"], &["likes"], &["digimon"]];
}

// Embassy tasks module
pub mod tasks {
    use super::*;

    /// Size of the channel task pool below
    pub const CHANNEL_TASKS: usize = 4;

    /// One channel per task; the pool holds one task per board LED
    #[embassy_executor::task(pool_size = 4)]
    pub async fn channel_task(channel: Channel<LedPin>) {
        channel.run_forever(EmbassyTimer).await;
    }

    /// Validate and configure every channel, then start transmitting
    ///
    /// Parallel mode spawns one task per channel and returns. Sequential mode
    /// runs all channels on the calling task and does not return.
    pub async fn start<I>(spawner: Spawner, configs: I, config: MorseConfig) -> Result<(), StartupError>
    where
        I: IntoIterator<Item = ChannelConfig<LedPin>>,
    {
        let mut scheduler = Scheduler::start(configs, config)?;

        match scheduler.mode() {
            ScheduleMode::Parallel => {
                if scheduler.len() > CHANNEL_TASKS {
                    scheduler.all_off();
                    return Err(StartupError::SpawnFailed { channel: CHANNEL_TASKS });
                }

                for channel in scheduler.into_channels() {
                    let id = channel.id();
                    spawner
                        .spawn(channel_task(channel))
                        .map_err(|_| StartupError::SpawnFailed { channel: id })?;
                }

                #[cfg(feature = "defmt")]
                defmt::info!("✨ Channel tasks spawned");

                Ok(())
            }
            ScheduleMode::Sequential => {
                scheduler.run_sequential(EmbassyTimer).await;
                Ok(())
            }
        }
    }
}

// CH32V203 hardware module
pub mod ch32v203_hardware;

// Time driver for embassy
mod time_driver;
