//! System clock configuration
//!
//! Runs the 16 MHz main oscillator through the PLL (400 MHz with DIV400) and
//! divides down to the bus frequency. Must complete before any peripheral
//! baud or bit-rate divisor is programmed.

use quadrx_hal::RegisterBus;

use crate::map::sysctl::*;

/// Supported system bus frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFrequency {
    Mhz80,
    Mhz66_67,
    Mhz50,
    Mhz40,
    Mhz20,
    Mhz16,
}

impl BusFrequency {
    /// Combined SYSDIV2:SYSDIV2LSB value; bus = 400 MHz / (n + 1)
    pub const fn sysdiv2(self) -> u32 {
        match self {
            BusFrequency::Mhz80 => 4,
            BusFrequency::Mhz66_67 => 5,
            BusFrequency::Mhz50 => 7,
            BusFrequency::Mhz40 => 9,
            BusFrequency::Mhz20 => 19,
            BusFrequency::Mhz16 => 24,
        }
    }

    /// Resulting bus frequency in Hz
    pub const fn hz(self) -> u32 {
        400_000_000 / (self.sysdiv2() + 1)
    }
}

/// Switch the system clock to the PLL at `freq`
///
/// Spins until the PLL reports lock.
pub fn init<B: RegisterBus>(bus: &mut B, freq: BusFrequency) {
    // Use RCC2 and run from the raw oscillator while reprogramming
    bus.set_bits(RCC2, RCC2_USERCC2);
    bus.set_bits(RCC2, RCC2_BYPASS2);

    bus.write_field(RCC, RCC_XTAL_MASK, RCC_XTAL_16MHZ);
    bus.clear_bits(RCC2, RCC2_OSCSRC2_MASK);
    bus.clear_bits(RCC2, RCC2_PWRDN2);

    bus.set_bits(RCC2, RCC2_DIV400);
    bus.write_field(
        RCC2,
        RCC2_SYSDIV2_MASK,
        freq.sysdiv2() << RCC2_SYSDIV2_SHIFT,
    );

    bus.wait_set(RIS, RIS_PLLLRIS);
    bus.clear_bits(RCC2, RCC2_BYPASS2);
}
