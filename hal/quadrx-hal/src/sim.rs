//! Register-level simulation for host tests
//!
//! [`SimBus`] is a sparse register file that records every access in order,
//! so tests can assert on write ordering (enable last, acknowledge before
//! read) rather than only on final register state. [`SimInterruptController`]
//! stands in for the NVIC: handlers are registered against interrupt numbers
//! and run when the test pends the line and dispatches.

use heapless::{FnvIndexMap, Vec};

use crate::irq::InterruptHandler;
use crate::mmio::RegisterBus;

/// Maximum number of distinct registers a simulation can hold
pub const SIM_REGISTERS: usize = 256;

/// Maximum number of recorded accesses
pub const SIM_LOG_LEN: usize = 1024;

/// Maximum number of write-one-to-clear links
const MAX_CLEAR_LINKS: usize = 16;

/// A single recorded register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    Read { addr: u32, value: u32 },
    Write { addr: u32, value: u32 },
}

impl Access {
    /// Address touched by this access
    pub fn addr(&self) -> u32 {
        match *self {
            Access::Read { addr, .. } | Access::Write { addr, .. } => addr,
        }
    }

    /// Check if this is a write
    pub fn is_write(&self) -> bool {
        matches!(self, Access::Write { .. })
    }
}

/// Sparse simulated register file
///
/// Unwritten registers read as zero, matching the reset value of most
/// peripheral registers.
pub struct SimBus {
    regs: FnvIndexMap<u32, u32, SIM_REGISTERS>,
    log: Vec<Access, SIM_LOG_LEN>,
    clear_links: Vec<(u32, u32), MAX_CLEAR_LINKS>,
    log_overflowed: bool,
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBus {
    /// Create an empty register file
    pub fn new() -> Self {
        Self {
            regs: FnvIndexMap::new(),
            log: Vec::new(),
            clear_links: Vec::new(),
            log_overflowed: false,
        }
    }

    /// Set a register value without recording an access
    pub fn preload(&mut self, addr: u32, value: u32) {
        self.store(addr, value);
    }

    /// Read a register value without recording an access
    pub fn peek(&self, addr: u32) -> u32 {
        self.regs.get(&addr).copied().unwrap_or(0)
    }

    /// Model an interrupt-clear register
    ///
    /// Writing a 1 bit to `clear_addr` clears the same bit in `status_addr`.
    pub fn link_write_one_to_clear(&mut self, clear_addr: u32, status_addr: u32) {
        if self.clear_links.push((clear_addr, status_addr)).is_err() {
            panic!("sim: too many write-one-to-clear links");
        }
    }

    /// All recorded accesses, oldest first
    pub fn accesses(&self) -> &[Access] {
        &self.log
    }

    /// Forget recorded accesses (register values are kept)
    pub fn clear_log(&mut self) {
        self.log.clear();
        self.log_overflowed = false;
    }

    /// Check that no access was dropped because the log was full
    pub fn is_log_complete(&self) -> bool {
        !self.log_overflowed
    }

    /// Values written to `addr`, oldest first
    pub fn writes_to(&self, addr: u32) -> impl Iterator<Item = u32> + '_ {
        self.log.iter().filter_map(move |a| match *a {
            Access::Write { addr: a, value } if a == addr => Some(value),
            _ => None,
        })
    }

    /// Log position of the first write to `addr`
    pub fn first_write(&self, addr: u32) -> Option<usize> {
        self.log
            .iter()
            .position(|a| a.is_write() && a.addr() == addr)
    }

    /// Log position of the first read of `addr`
    pub fn first_read(&self, addr: u32) -> Option<usize> {
        self.log
            .iter()
            .position(|a| !a.is_write() && a.addr() == addr)
    }

    /// Last write whose address falls in `[start, end)`
    pub fn last_write_in(&self, start: u32, end: u32) -> Option<(u32, u32)> {
        self.log.iter().rev().find_map(|a| match *a {
            Access::Write { addr, value } if (start..end).contains(&addr) => Some((addr, value)),
            _ => None,
        })
    }

    /// Check whether any access touched `[start, end)`
    pub fn touched(&self, start: u32, end: u32) -> bool {
        self.log.iter().any(|a| (start..end).contains(&a.addr()))
    }

    fn store(&mut self, addr: u32, value: u32) {
        if self.regs.insert(addr, value).is_err() {
            panic!("sim: register file full");
        }
    }

    fn record(&mut self, access: Access) {
        if self.log.push(access).is_err() {
            self.log_overflowed = true;
        }
    }
}

impl RegisterBus for SimBus {
    fn read(&mut self, addr: u32) -> u32 {
        let value = self.peek(addr);
        self.record(Access::Read { addr, value });
        value
    }

    fn write(&mut self, addr: u32, value: u32) {
        self.record(Access::Write { addr, value });

        let mut cleared = false;
        for i in 0..self.clear_links.len() {
            let (clear_addr, status_addr) = self.clear_links[i];
            if clear_addr == addr {
                let status = self.peek(status_addr);
                self.store(status_addr, status & !value);
                cleared = true;
            }
        }

        // Clear registers do not hold state of their own
        if !cleared {
            self.store(addr, value);
        }
    }
}

/// Number of interrupt lines tracked by the simulated controller
const SIM_IRQ_LINES: usize = 256;

/// Simulated nested vectored interrupt controller
///
/// Handlers run to completion, lowest interrupt number first, mirroring
/// fixed-priority preemption with equal configured priorities.
pub struct SimInterruptController<'a, B: RegisterBus, const N: usize> {
    handlers: Vec<&'a dyn InterruptHandler<B>, N>,
    pending: [u32; SIM_IRQ_LINES / 32],
}

impl<'a, B: RegisterBus, const N: usize> Default for SimInterruptController<'a, B, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, B: RegisterBus, const N: usize> SimInterruptController<'a, B, N> {
    /// Create a controller with no handlers bound
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            pending: [0; SIM_IRQ_LINES / 32],
        }
    }

    /// Bind a handler to its interrupt line
    ///
    /// Returns the handler back if the controller has no free slot.
    pub fn register(
        &mut self,
        handler: &'a dyn InterruptHandler<B>,
    ) -> Result<(), &'a dyn InterruptHandler<B>> {
        self.handlers.push(handler)
    }

    /// Raise an interrupt line
    pub fn pend(&mut self, irq: u16) {
        let irq = irq as usize % SIM_IRQ_LINES;
        self.pending[irq / 32] |= 1 << (irq % 32);
    }

    /// Check if an interrupt line is pending
    pub fn is_pending(&self, irq: u16) -> bool {
        let irq = irq as usize % SIM_IRQ_LINES;
        self.pending[irq / 32] & (1 << (irq % 32)) != 0
    }

    /// Run handlers for every pending line until none remain
    ///
    /// Returns the number of interrupt lines serviced. A pending line with no
    /// bound handler is dropped, like an unhandled interrupt falling through
    /// to a default handler.
    pub fn dispatch(&mut self, bus: &mut B) -> usize {
        let mut serviced = 0;
        while let Some(irq) = self.next_pending() {
            self.pending[irq / 32] &= !(1 << (irq % 32));
            for handler in self.handlers.iter() {
                if handler.irq() as usize == irq {
                    handler.on_interrupt(bus);
                }
            }
            serviced += 1;
        }
        serviced
    }

    fn next_pending(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .find(|(_, word)| **word != 0)
            .map(|(i, word)| i * 32 + word.trailing_zeros() as usize)
    }
}
