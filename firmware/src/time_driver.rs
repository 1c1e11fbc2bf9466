//! Embassy time driver on the CH32V203 SysTick, one tick per millisecond

use core::cell::Cell;

use critical_section::Mutex;
use embassy_time_driver::{AlarmHandle, Driver};
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

/// SysTick registers
mod stk {
    pub const CTLR: usize = 0xE000_F000;
    pub const SR: usize = 0xE000_F004;
    pub const CMPLR: usize = 0xE000_F010;

    /// Enable counter, enable interrupt, HCLK source, auto-reload
    pub const CTLR_RUN: u32 = 0b1_1111;

    /// PFIC interrupt enable register 1 and the SysTick bit in it
    pub const PFIC_IENR1: usize = 0xE000_E100;
    pub const SYSTICK_IRQ: u32 = 1 << 12;
}

#[derive(Copy, Clone)]
struct AlarmCallback {
    callback: fn(*mut ()),
    ctx: *mut (),
}

// The context pointer is only ever handed back to embassy's own callback
unsafe impl Send for AlarmCallback {}

/// Millisecond tick counter with a single alarm slot
pub struct SysTickDriver {
    ticks: AtomicU64,
    alarm_at: AtomicU64,
    alarm_taken: AtomicBool,
    callback: Mutex<Cell<Option<AlarmCallback>>>,
}

impl SysTickDriver {
    const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            alarm_at: AtomicU64::new(u64::MAX),
            alarm_taken: AtomicBool::new(false),
            callback: Mutex::new(Cell::new(None)),
        }
    }

    /// Advance time by one tick and fire the alarm when due
    fn on_tick(&self) {
        let now = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        if now < self.alarm_at.load(Ordering::Relaxed) {
            return;
        }

        self.alarm_at.store(u64::MAX, Ordering::Relaxed);
        let pending = critical_section::with(|cs| self.callback.borrow(cs).get());
        if let Some(alarm) = pending {
            (alarm.callback)(alarm.ctx);
        }
    }
}

impl Driver for SysTickDriver {
    fn now(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    unsafe fn allocate_alarm(&self) -> Option<AlarmHandle> {
        if self.alarm_taken.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(AlarmHandle::new(0))
        }
    }

    fn set_alarm_callback(&self, _alarm: AlarmHandle, callback: fn(*mut ()), ctx: *mut ()) {
        critical_section::with(|cs| {
            self.callback.borrow(cs).set(Some(AlarmCallback { callback, ctx }));
        });
    }

    fn set_alarm(&self, _alarm: AlarmHandle, timestamp: u64) -> bool {
        if timestamp <= self.now() {
            self.alarm_at.store(u64::MAX, Ordering::Relaxed);
            return false;
        }
        self.alarm_at.store(timestamp, Ordering::Relaxed);
        true
    }
}

embassy_time_driver::time_driver_impl!(static DRIVER: SysTickDriver = SysTickDriver::new());

/// Start SysTick at 1 kHz from the core clock
pub fn init_systick(hclk_hz: u32) {
    // SAFETY: SysTick is owned by the time driver; nothing else touches it
    unsafe {
        core::ptr::write_volatile(stk::CMPLR as *mut u64, (hclk_hz / 1_000) as u64 - 1);
        core::ptr::write_volatile(stk::SR as *mut u32, 0);
        core::ptr::write_volatile(stk::CTLR as *mut u32, stk::CTLR_RUN);
        core::ptr::write_volatile(stk::PFIC_IENR1 as *mut u32, stk::SYSTICK_IRQ);
    }
}

/// Interrupt flag in `mcause`
const MCAUSE_INTERRUPT: usize = 1 << 31;

/// QingKe core interrupt number of SysTick
const SYSTICK_CODE: usize = 12;

/// Interrupt sources this firmware handles
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Irq {
    SysTick,
    Unhandled,
}

const fn decode_mcause(mcause: usize) -> Irq {
    if mcause & MCAUSE_INTERRUPT != 0 && mcause & 0xFFF == SYSTICK_CODE {
        Irq::SysTick
    } else {
        Irq::Unhandled
    }
}

const _: () = assert!(matches!(decode_mcause(MCAUSE_INTERRUPT | SYSTICK_CODE), Irq::SysTick));
const _: () = assert!(matches!(decode_mcause(SYSTICK_CODE), Irq::Unhandled));
const _: () = assert!(matches!(decode_mcause(MCAUSE_INTERRUPT | 7), Irq::Unhandled));

/// riscv-rt only indexes its table for the standard interrupt codes 0..=11;
/// every other code, SysTick included, ends up in `DefaultHandler`
#[no_mangle]
extern "C" fn DefaultHandler() {
    match decode_mcause(riscv::register::mcause::read().bits()) {
        Irq::SysTick => on_systick(),
        Irq::Unhandled => loop {},
    }
}

fn on_systick() {
    // SAFETY: clearing the compare flag of the peripheral we own
    unsafe { core::ptr::write_volatile(stk::SR as *mut u32, 0) };
    DRIVER.on_tick();
}

// Critical section implementation for single-core RISC-V
critical_section::set_impl!(RiscvCriticalSection);

struct RiscvCriticalSection;

unsafe impl critical_section::Impl for RiscvCriticalSection {
    unsafe fn acquire() -> u8 {
        let mut mstatus: usize;
        core::arch::asm!("csrrci {}, mstatus, 8", out(reg) mstatus);
        (mstatus & 8) as u8
    }

    unsafe fn release(was_active: u8) {
        if was_active != 0 {
            core::arch::asm!("csrsi mstatus, 8");
        }
    }
}
