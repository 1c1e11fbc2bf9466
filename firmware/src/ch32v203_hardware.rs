//! CH32V203 Hardware Implementation
//!
//! 64KB Flash / 20KB RAM. LEDs on GPIO port A/B, driven through the
//! BSHR/BCR set/reset registers so each write is a single atomic store.

use core::ptr::{read_volatile, write_volatile};

use morse_core::{DriverError, SignalDriver};

/// Register addresses
mod regs {
    /// RCC APB2 peripheral clock enable register
    pub const RCC_APB2PCENR: usize = 0x4002_1018;

    pub const GPIOA_BASE: usize = 0x4001_0800;
    pub const GPIOB_BASE: usize = 0x4001_0C00;

    /// Port configuration, pins 0..=7 and 8..=15 (4 bits per pin)
    pub const CFGLR: usize = 0x00;
    pub const CFGHR: usize = 0x04;
    /// Set (low half) / reset (high half)
    pub const BSHR: usize = 0x10;
    /// Reset
    pub const BCR: usize = 0x14;

    /// Push-pull output, 2 MHz
    pub const OUTPUT_PUSH_PULL_2MHZ: u32 = 0b0010;
}

/// Platform error codes reported through [`DriverError::Config`]
pub mod codes {
    /// Pin number out of range
    pub const EINVAL: i32 = -22;
    /// Configuration did not stick
    pub const EIO: i32 = -5;
}

/// GPIO port
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
}

impl Port {
    const fn base(self) -> usize {
        match self {
            Port::A => regs::GPIOA_BASE,
            Port::B => regs::GPIOB_BASE,
        }
    }

    /// Clock enable bit in RCC_APB2PCENR
    const fn clock_bit(self) -> u32 {
        match self {
            Port::A => 1 << 2,
            Port::B => 1 << 3,
        }
    }

    fn clock_enabled(self) -> bool {
        // SAFETY: read-only access to a fixed, always-mapped RCC register
        let enabled = unsafe { read_volatile(regs::RCC_APB2PCENR as *const u32) };
        enabled & self.clock_bit() != 0
    }

    fn enable_clock(self) {
        critical_section::with(|_| {
            // SAFETY: read-modify-write inside a critical section
            unsafe {
                let reg = regs::RCC_APB2PCENR as *mut u32;
                write_volatile(reg, read_volatile(reg) | self.clock_bit());
            }
        });
    }
}

/// One LED on a GPIO pin
pub struct LedPin {
    port: Port,
    pin: u8,
    active_low: bool,
}

impl LedPin {
    pub const fn new(port: Port, pin: u8, active_low: bool) -> Self {
        Self { port, pin, active_low }
    }

    fn write_level(&mut self, high: bool) {
        let offset = if high { regs::BSHR } else { regs::BCR };
        // SAFETY: BSHR/BCR writes only touch the bit for this pin
        unsafe { write_volatile((self.port.base() + offset) as *mut u32, 1 << self.pin) };
    }

    fn config_register(&self) -> (usize, u32) {
        let (offset, slot) = if self.pin < 8 {
            (regs::CFGLR, self.pin)
        } else {
            (regs::CFGHR, self.pin - 8)
        };
        (self.port.base() + offset, slot as u32 * 4)
    }
}

impl SignalDriver for LedPin {
    fn configure(&mut self) -> Result<(), DriverError> {
        if self.pin > 15 {
            return Err(DriverError::Config(codes::EINVAL));
        }
        if !self.port.clock_enabled() {
            return Err(DriverError::NotReady);
        }

        // Drive inactive before switching the pin to output
        self.set_active(false);

        let (address, shift) = self.config_register();
        let written = critical_section::with(|_| {
            // SAFETY: read-modify-write of this pin's nibble inside a critical section
            unsafe {
                let reg = address as *mut u32;
                let value = (read_volatile(reg) & !(0xF << shift)) | (regs::OUTPUT_PUSH_PULL_2MHZ << shift);
                write_volatile(reg, value);
                read_volatile(reg)
            }
        });

        if (written >> shift) & 0xF != regs::OUTPUT_PUSH_PULL_2MHZ {
            return Err(DriverError::Config(codes::EIO));
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("🔌 P{}{} configured as output", self.port, self.pin);

        Ok(())
    }

    fn set_active(&mut self, active: bool) {
        let high = if self.active_low { !active } else { active };
        self.write_level(high);
    }

    fn is_ready(&self) -> bool {
        self.port.clock_enabled()
    }
}

/// Enable the GPIO port clocks the LEDs live on
pub fn init_gpio_clocks() {
    for port in [Port::A, Port::B] {
        port.enable_clock();
    }

    #[cfg(feature = "defmt")]
    defmt::info!("🔌 CH32V203 GPIO clocks enabled");
}

/// The four board LEDs, in channel order
pub fn board_leds() -> [LedPin; pins::LED_COUNT] {
    pins::LEDS.map(|(port, pin)| LedPin::new(port, pin, pins::LEDS_ACTIVE_LOW))
}

/// CH32V203 pin configuration constants
pub mod pins {
    use super::Port;

    pub const LED_COUNT: usize = 4;

    /// LED0..LED3
    pub const LEDS: [(Port, u8); LED_COUNT] = [
        (Port::A, 4),
        (Port::A, 5),
        (Port::B, 12),
        (Port::B, 13),
    ];

    /// LEDs sink current into the pin
    pub const LEDS_ACTIVE_LOW: bool = true;
}

