//! Busy-wait delay
//!
//! Counts core cycles at the configured system clock. Only used during LCD
//! bring-up, where millisecond precision is plenty.

use embedded_hal::delay::DelayNs;

/// Cycle-counting delay provider
pub struct CycleDelay {
    sysclk_hz: u32,
}

impl CycleDelay {
    pub const fn new(sysclk_hz: u32) -> Self {
        Self { sysclk_hz }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (ns as u64 * self.sysclk_hz as u64).div_ceil(1_000_000_000);
        cortex_m::asm::delay(cycles.min(u32::MAX as u64) as u32);
    }
}
