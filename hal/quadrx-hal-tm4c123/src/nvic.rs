//! NVIC line control
//!
//! Register-level so the board sequence can be verified on the simulated
//! bus. The set-enable registers ignore zero bits, so a plain write is used
//! instead of read-modify-write.

use quadrx_hal::RegisterBus;

use crate::map::nvic::{EN0, PRI0, PRI_SHIFT};

fn bank(irq: u16) -> (u32, u32) {
    let irq = irq as u32;
    ((irq / 32) * 4, 1 << (irq % 32))
}

/// Unmask an interrupt line
pub fn enable_irq<B: RegisterBus>(bus: &mut B, irq: u16) {
    let (offset, bit) = bank(irq);
    bus.write(EN0 + offset, bit);
}

/// Set an interrupt's priority level (0 = highest, 7 = lowest)
pub fn set_priority<B: RegisterBus>(bus: &mut B, irq: u16, level: u8) {
    let irq = irq as u32;
    let addr = PRI0 + (irq / 4) * 4;
    let shift = (irq % 4) * 8;
    let value = ((level & 0x7) as u32) << PRI_SHIFT;
    bus.write_field(addr, 0xFF << shift, value << shift);
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadrx_hal::sim::SimBus;

    #[test]
    fn test_enable_uart_lines() {
        let mut bus = SimBus::new();
        enable_irq(&mut bus, 33);
        enable_irq(&mut bus, 63);
        enable_irq(&mut bus, 5);

        assert_eq!(bus.writes_to(EN0 + 4).collect::<Vec<_>>(), [1 << 1, 1 << 31]);
        assert_eq!(bus.writes_to(EN0).collect::<Vec<_>>(), [1 << 5]);
    }

    #[test]
    fn test_priority_byte_lane() {
        let mut bus = SimBus::new();
        // IRQ 60 and 61 share PRI15
        set_priority(&mut bus, 60, 2);
        set_priority(&mut bus, 61, 7);

        assert_eq!(bus.peek(PRI0 + 60), (2 << 5) | ((7 << 5) << 8));
    }
}
