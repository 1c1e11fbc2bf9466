#![no_std]
#![no_main]

#[cfg(feature = "defmt")]
use defmt_rtt as _;

// RISC-V runtime
use riscv_rt as _;

// Panic handler
#[cfg(not(feature = "defmt"))]
use panic_halt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

use morse_blinker_firmware::*;

/// Core clock after reset (HSI, no PLL)
const HCLK_HZ: u32 = 8_000_000;

const LABELS: [&str; pins::LED_COUNT] = ["led0", "led1", "led2", "led3"];

/// Main firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    #[cfg(feature = "defmt")]
    defmt::info!("🔧 Morse Blinker Firmware v{} Starting...", VERSION);

    init_gpio_clocks();
    init_systick(HCLK_HZ);
    // SAFETY: the time driver and its interrupt are set up
    unsafe { riscv::interrupt::enable() };

    #[cfg(feature = "defmt")]
    defmt::info!("✅ Hardware initialized");

    let (mode, table) = if cfg!(feature = "sequential") {
        (ScheduleMode::Sequential, &words::SEQUENTIAL_WORDS)
    } else {
        (ScheduleMode::Parallel, &words::PARALLEL_WORDS)
    };
    let config = MorseConfig { mode, ..default_config() };

    let configs = LABELS
        .into_iter()
        .zip(table.iter())
        .zip(board_leds())
        .map(|((label, words), led)| ChannelConfig::new(label, led, *words));

    if let Err(error) = start(spawner, configs, config).await {
        #[cfg(feature = "defmt")]
        defmt::error!("💥 Startup failed: {}", error);
        #[cfg(not(feature = "defmt"))]
        let _ = error;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("✨ Morse blinker running");

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
