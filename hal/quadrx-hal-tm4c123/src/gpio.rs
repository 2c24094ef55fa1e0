//! GPIO pin multiplexing and outputs
//!
//! Every per-pin operation is a read-modify-write that touches only the
//! pin's own bit (or nibble, for port control), so pins sharing a port can be
//! configured independently and in any order.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use quadrx_hal::{Pin, Port, RegisterBus};

use crate::map::gpio::*;

/// Base address of a pin's port
const fn base(pin: Pin) -> u32 {
    port_base(pin.port())
}

/// Check if a pin sits behind the commit lock (NMI and JTAG defaults)
pub const fn is_locked(pin: Pin) -> bool {
    matches!(
        (pin.port(), pin.index()),
        (Port::C, 0..=3) | (Port::D, 7) | (Port::F, 0)
    )
}

/// Clock-gate bit for a pin's port
pub const fn gate_mask(pin: Pin) -> u32 {
    1 << pin.port().index()
}

fn unlock<B: RegisterBus>(bus: &mut B, pin: Pin) {
    let base = base(pin);
    bus.write(base + LOCK, LOCK_KEY);
    bus.set_bits(base + CR, pin.mask());
}

/// Route a pin to a peripheral function
///
/// Sets the alternate-function select bit, writes `function` into the pin's
/// port-control nibble, enables the digital buffer and disables the analog
/// mode. Locked pins are unlocked first.
pub fn configure_alternate<B: RegisterBus>(bus: &mut B, pin: Pin, function: u8) {
    if is_locked(pin) {
        unlock(bus, pin);
    }

    let base = base(pin);
    let mask = pin.mask();

    bus.set_bits(base + AFSEL, mask);
    bus.write_field(
        base + PCTL,
        pin.pctl_mask(),
        ((function & 0xF) as u32) << pin.pctl_shift(),
    );
    bus.set_bits(base + DEN, mask);
    bus.clear_bits(base + AMSEL, mask);
}

/// Make a pin a plain digital output
pub fn configure_output<B: RegisterBus>(bus: &mut B, pin: Pin) {
    if is_locked(pin) {
        unlock(bus, pin);
    }

    let base = base(pin);
    let mask = pin.mask();

    bus.set_bits(base + DIR, mask);
    bus.clear_bits(base + AFSEL, mask);
    bus.write_field(base + PCTL, pin.pctl_mask(), 0);
    bus.set_bits(base + DEN, mask);
    bus.clear_bits(base + AMSEL, mask);
}

/// Push-pull output pin
///
/// Writes go through the masked data aperture, so setting one pin is a
/// single store that cannot disturb the others.
pub struct GpioOutput<B> {
    bus: B,
    pin: Pin,
}

impl<B: RegisterBus> GpioOutput<B> {
    /// Configure `pin` as an output and wrap it
    pub fn new(mut bus: B, pin: Pin) -> Self {
        configure_output(&mut bus, pin);
        Self { bus, pin }
    }

    /// Pin being driven
    pub fn pin(&self) -> Pin {
        self.pin
    }

    fn data_addr(&self) -> u32 {
        base(self.pin) + DATA + (self.pin.mask() << 2)
    }
}

impl<B> ErrorType for GpioOutput<B> {
    type Error = Infallible;
}

impl<B: RegisterBus> OutputPin for GpioOutput<B> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let addr = self.data_addr();
        self.bus.write(addr, 0);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let addr = self.data_addr();
        self.bus.write(addr, self.pin.mask());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use quadrx_hal::sim::SimBus;

    #[test]
    fn test_configure_alternate_pd6() {
        let mut bus = SimBus::new();
        let pin = Pin::new(Port::D, 6);
        configure_alternate(&mut bus, pin, 1);

        let base = 0x4000_7000;
        assert_eq!(bus.peek(base + AFSEL), 0x40);
        assert_eq!(bus.peek(base + PCTL), 0x0100_0000);
        assert_eq!(bus.peek(base + DEN), 0x40);
        assert_eq!(bus.peek(base + AMSEL), 0);
        // Not behind the commit lock
        assert!(!bus.touched(base + LOCK, base + CR + 4));
    }

    #[test]
    fn test_configure_alternate_keeps_other_pins() {
        let mut bus = SimBus::new();
        let base = port_base(Port::C);
        bus.preload(base + AFSEL, 0x0F);
        bus.preload(base + DEN, 0x0F);
        bus.preload(base + AMSEL, 0x40 | 0x01);

        configure_alternate(&mut bus, Pin::new(Port::C, 6), 1);

        assert_eq!(bus.peek(base + AFSEL), 0x4F);
        assert_eq!(bus.peek(base + DEN), 0x4F);
        assert_eq!(bus.peek(base + AMSEL), 0x01);
    }

    #[test]
    fn test_locked_pin_unlocked_first() {
        let mut bus = SimBus::new();
        let pin = Pin::new(Port::D, 7);
        configure_alternate(&mut bus, pin, 1);

        let base = port_base(Port::D);
        assert_eq!(bus.writes_to(base + LOCK).collect::<Vec<_>>(), [LOCK_KEY]);
        assert_eq!(bus.peek(base + CR), 0x80);
        assert!(bus.first_write(base + LOCK) < bus.first_write(base + AFSEL));
    }

    #[test]
    fn test_jtag_pins_are_locked() {
        for index in 0..=3 {
            assert!(is_locked(Pin::new(Port::C, index)));
        }
        assert!(!is_locked(Pin::new(Port::C, 4)));
        assert!(!is_locked(Pin::new(Port::C, 6)));
        assert!(!is_locked(Pin::new(Port::D, 6)));

        let mut bus = SimBus::new();
        let pin = Pin::new(Port::C, 2);
        configure_output(&mut bus, pin);

        let base = port_base(Port::C);
        assert_eq!(bus.writes_to(base + LOCK).collect::<Vec<_>>(), [LOCK_KEY]);
        assert_eq!(bus.peek(base + CR), 0x04);
        assert!(bus.first_write(base + LOCK) < bus.first_write(base + DEN));
    }

    #[test]
    fn test_output_pin_masked_writes() {
        let mut bus = SimBus::new();
        let pin = Pin::new(Port::A, 6);
        let mut out = GpioOutput::new(&mut bus, pin);
        out.set_high().unwrap();
        out.set_low().unwrap();

        let base = port_base(Port::A);
        let aperture = base + (0x40 << 2);
        assert_eq!(bus.writes_to(aperture).collect::<Vec<_>>(), [0x40, 0]);
        assert_eq!(bus.peek(base + DIR), 0x40);
        assert_eq!(bus.peek(base + AFSEL), 0);
    }

    proptest! {
        #[test]
        fn prop_pctl_nibble_isolation(
            initial in any::<u32>(),
            index in 0u8..8,
            function in 0u8..16,
        ) {
            let mut bus = SimBus::new();
            let pin = Pin::new(Port::E, index);
            let base = port_base(Port::E);
            bus.preload(base + PCTL, initial);

            configure_alternate(&mut bus, pin, function);

            let after = bus.peek(base + PCTL);
            prop_assert_eq!(after & !pin.pctl_mask(), initial & !pin.pctl_mask());
            prop_assert_eq!((after & pin.pctl_mask()) >> pin.pctl_shift(), function as u32);
        }
    }
}
