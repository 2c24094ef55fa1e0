//! Run-mode clock gating
//!
//! A peripheral's registers fault or read as zero until its clock gate is
//! set and the matching peripheral-ready bit comes up. The ready wait has no
//! timeout: if the bit never sets, boot stalls here.

use quadrx_hal::RegisterBus;

use crate::map::sysctl::{PRGPIO, PRSSI, PRUART, RCGCGPIO, RCGCSSI, RCGCUART};

/// Clock-gate bit masks for one set of peripherals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockGates {
    /// One bit per UART module (bit n = UARTn)
    pub uarts: u32,
    /// One bit per GPIO port (bit 0 = port A)
    pub ports: u32,
    /// One bit per SSI module
    pub ssis: u32,
}

/// Enable clocks for every peripheral in `gates` and wait until all are ready
///
/// Gates are set first for all module types, then readiness is polled, so
/// the modules power up in parallel.
pub fn enable<B: RegisterBus>(bus: &mut B, gates: ClockGates) {
    if gates.uarts != 0 {
        bus.set_bits(RCGCUART, gates.uarts);
    }
    if gates.ports != 0 {
        bus.set_bits(RCGCGPIO, gates.ports);
    }
    if gates.ssis != 0 {
        bus.set_bits(RCGCSSI, gates.ssis);
    }

    if gates.uarts != 0 {
        bus.wait_set(PRUART, gates.uarts);
    }
    if gates.ports != 0 {
        bus.wait_set(PRGPIO, gates.ports);
    }
    if gates.ssis != 0 {
        bus.wait_set(PRSSI, gates.ssis);
    }
}
