//! Simulated TM4C123 for host tests
//!
//! Builds on [`quadrx_hal::sim::SimBus`] with the behavior the drivers poll
//! for: clocks report ready, the PLL reports lock, the SSI transmit FIFO has
//! room, and writes to a UART's interrupt-clear register clear the matching
//! raw status bits.

use quadrx_hal::sim::SimBus;

use crate::map::{ssi0, sysctl, uart as regs};
use crate::uart::UartId;

/// A register file that behaves like a TM4C123 after reset
pub fn board_bus() -> SimBus {
    let mut bus = SimBus::new();

    bus.preload(sysctl::PRUART, 0xFF);
    bus.preload(sysctl::PRGPIO, 0x3F);
    bus.preload(sysctl::PRSSI, 0x0F);
    bus.preload(sysctl::RIS, sysctl::RIS_PLLLRIS);
    bus.preload(ssi0::SR, ssi0::SR_TFE | ssi0::SR_TNF);

    for uart in UartId::ALL {
        let base = uart.base();
        bus.link_write_one_to_clear(base + regs::ICR, base + regs::RIS);
    }

    bus
}

/// Make a byte arrive on a UART
///
/// Loads the data register and raises the receive status bit. Pend the
/// UART's interrupt line on a [`quadrx_hal::sim::SimInterruptController`]
/// to deliver it.
pub fn inject_rx(bus: &mut SimBus, uart: UartId, byte: u8) {
    let base = uart.base();
    bus.preload(base + regs::DR, byte as u32);
    let status = bus.peek(base + regs::RIS);
    bus.preload(base + regs::RIS, status | regs::RIS_RXRIS);
}
