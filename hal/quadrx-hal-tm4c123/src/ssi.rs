//! SSI0 as an SPI master
//!
//! Freescale SPI frame format, 8-bit frames, polled. Implements the
//! `embedded-hal` [`SpiBus`] so display drivers stay chip-agnostic.

use core::convert::Infallible;

use embedded_hal::spi::{ErrorType, SpiBus};
use quadrx_hal::spi::{Phase, Polarity, SpiConfig};
use quadrx_hal::{Pin, Port, RegisterBus};

use crate::gpio;
use crate::map::ssi0::*;
use crate::sysctl::ClockGates;

/// SSI0 clock on PA2
pub const CLK_PIN: Pin = Pin::new(Port::A, 2);
/// SSI0 frame select on PA3
pub const FSS_PIN: Pin = Pin::new(Port::A, 3);
/// SSI0 transmit on PA5
pub const TX_PIN: Pin = Pin::new(Port::A, 5);

/// Port-control function code for the SSI0 pins
const PIN_FUNCTION: u8 = 2;

/// Clock gates SSI0 and its pins need
pub const GATES: ClockGates = ClockGates {
    uarts: 0,
    ports: 1 << Port::A.index(),
    ssis: 1,
};

/// SSI construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SsiError {
    /// No prescaler and serial clock rate pair reaches the requested frequency
    UnreachableFrequency,
}

/// Bit-rate divisor pair
///
/// `bit rate = sysclk / (prescale * (1 + scr))` with an even prescale of
/// 2-254 and a serial clock rate of 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SsiClock {
    pub prescale: u8,
    pub scr: u8,
}

impl SsiClock {
    /// Fastest setting that does not exceed `target_hz`
    pub const fn compute(sysclk_hz: u32, target_hz: u32) -> Option<Self> {
        if target_hz == 0 {
            return None;
        }

        let mut prescale = 2u64;
        while prescale <= 254 {
            // Smallest divisor with sysclk / divisor <= target
            let divisor = (sysclk_hz as u64).div_ceil(prescale * target_hz as u64);
            let divisor = if divisor == 0 { 1 } else { divisor };
            if divisor <= 256 {
                return Some(Self {
                    prescale: prescale as u8,
                    scr: (divisor - 1) as u8,
                });
            }
            prescale += 2;
        }
        None
    }

    /// Bit rate this setting produces
    pub const fn hz(&self, sysclk_hz: u32) -> u32 {
        sysclk_hz / (self.prescale as u32 * (self.scr as u32 + 1))
    }
}

/// Route PA2, PA3 and PA5 to SSI0
///
/// The port A clock must already be running.
pub fn configure_pins<B: RegisterBus>(bus: &mut B) {
    for pin in [CLK_PIN, FSS_PIN, TX_PIN] {
        gpio::configure_alternate(bus, pin, PIN_FUNCTION);
    }
}

/// SSI0 master
pub struct Ssi0<B> {
    bus: B,
}

impl<B: RegisterBus> Ssi0<B> {
    /// Configure and enable SSI0
    ///
    /// The SSI0 clock must already be running.
    pub fn new(mut bus: B, sysclk_hz: u32, config: &SpiConfig) -> Result<Self, SsiError> {
        let clock =
            SsiClock::compute(sysclk_hz, config.frequency).ok_or(SsiError::UnreachableFrequency)?;

        bus.clear_bits(CR1, CR1_SSE);
        bus.clear_bits(CR1, CR1_MS);
        bus.write(CPSR, clock.prescale as u32);

        let mut cr0 = ((clock.scr as u32) << CR0_SCR_SHIFT) | CR0_FRF_MOTO | CR0_DSS_8;
        if config.polarity == Polarity::IdleHigh {
            cr0 |= CR0_SPO;
        }
        if config.phase == Phase::CaptureOnSecondTransition {
            cr0 |= CR0_SPH;
        }
        bus.write(CR0, cr0);

        bus.set_bits(CR1, CR1_SSE);

        Ok(Self { bus })
    }

    /// Release the bus
    pub fn free(self) -> B {
        self.bus
    }

    /// Discard stale receive data left by write-only transfers
    fn drain(&mut self) {
        for _ in 0..FIFO_DEPTH {
            if self.bus.read(SR) & SR_RNE == 0 {
                break;
            }
            self.bus.read(DR);
        }
    }

    fn exchange(&mut self, byte: u8) -> u8 {
        self.bus.wait_set(SR, SR_TNF);
        self.bus.write(DR, byte as u32);
        self.bus.wait_set(SR, SR_RNE);
        self.bus.read(DR) as u8
    }
}

impl<B> ErrorType for Ssi0<B> {
    type Error = Infallible;
}

impl<B: RegisterBus> SpiBus<u8> for Ssi0<B> {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.drain();
        for word in words.iter_mut() {
            *word = self.exchange(0);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for &word in words {
            self.bus.wait_set(SR, SR_TNF);
            self.bus.write(DR, word as u32);
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.drain();
        let len = read.len().max(write.len());
        for i in 0..len {
            let out = write.get(i).copied().unwrap_or(0);
            let byte = self.exchange(out);
            if let Some(slot) = read.get_mut(i) {
                *slot = byte;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.drain();
        for word in words.iter_mut() {
            *word = self.exchange(*word);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.bus.wait_set(SR, SR_TFE);
        self.bus.wait_clear(SR, SR_BSY);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board_bus;
    use quadrx_hal::spi::Mode;

    #[test]
    fn test_clock_compute() {
        // 80 MHz / (2 * 5) = 8 MHz
        let clock = SsiClock::compute(80_000_000, 8_000_000).unwrap();
        assert_eq!(clock, SsiClock { prescale: 2, scr: 4 });
        assert_eq!(clock.hz(80_000_000), 8_000_000);

        // Never faster than requested
        let clock = SsiClock::compute(80_000_000, 3_000_000).unwrap();
        assert!(clock.hz(80_000_000) <= 3_000_000);

        // Needs a larger prescale
        let clock = SsiClock::compute(80_000_000, 100_000).unwrap();
        assert_eq!(clock.hz(80_000_000), 100_000);
        assert!(clock.prescale > 2);

        assert_eq!(SsiClock::compute(80_000_000, 0), None);
        assert_eq!(SsiClock::compute(80_000_000, 1), None);
    }

    #[test]
    fn test_new_programs_registers_and_enables_last() {
        let mut bus = board_bus();
        let config = SpiConfig::new(8_000_000, Mode::Mode0);
        let ssi = Ssi0::new(&mut bus, 80_000_000, &config).unwrap();
        let bus = ssi.free();

        assert_eq!(bus.peek(CPSR), 2);
        assert_eq!(bus.peek(CR0), (4 << 8) | 0x07);
        assert_eq!(bus.last_write_in(BASE, BASE + 0x1000), Some((CR1, CR1_SSE)));
    }

    #[test]
    fn test_mode3_sets_polarity_and_phase() {
        let mut bus = board_bus();
        let config = SpiConfig::new(1_000_000, Mode::Mode3);
        let _ = Ssi0::new(&mut bus, 80_000_000, &config).unwrap();

        assert_eq!(bus.peek(CR0) & (CR0_SPO | CR0_SPH), CR0_SPO | CR0_SPH);
    }

    #[test]
    fn test_unreachable_frequency() {
        let mut bus = board_bus();
        let config = SpiConfig::new(10, Mode::Mode0);
        assert!(matches!(
            Ssi0::new(&mut bus, 80_000_000, &config),
            Err(SsiError::UnreachableFrequency)
        ));
    }

    #[test]
    fn test_write_and_flush() {
        let mut bus = board_bus();
        let mut ssi = Ssi0::new(&mut bus, 80_000_000, &SpiConfig::default()).unwrap();
        ssi.write(&[0x2A, 0x00, 0x7F]).unwrap();
        ssi.flush().unwrap();
        let bus = ssi.free();

        assert_eq!(bus.writes_to(DR).collect::<Vec<_>>(), [0x2A, 0x00, 0x7F]);
    }

    #[test]
    fn test_transfer_in_place_reads_back() {
        let mut bus = board_bus();
        bus.preload(SR, SR_TFE | SR_TNF | SR_RNE);
        bus.preload(DR, 0x5A);
        let mut ssi = Ssi0::new(&mut bus, 80_000_000, &SpiConfig::default()).unwrap();

        let mut words = [0x01];
        ssi.transfer_in_place(&mut words).unwrap();
        // The simulated data register echoes the last write
        assert_eq!(words, [0x01]);
    }

    #[test]
    fn test_configure_pins() {
        let mut bus = board_bus();
        configure_pins(&mut bus);

        let base = crate::map::gpio::port_base(Port::A);
        assert_eq!(bus.peek(base + crate::map::gpio::AFSEL), 0x2C);
        assert_eq!(bus.peek(base + crate::map::gpio::PCTL), 0x0020_2200);
    }
}
