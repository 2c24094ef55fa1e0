//! Interrupt service abstractions
//!
//! Interrupt handlers are plain objects bound to an interrupt number. On
//! target the firmware calls them from its vector table entries; on the host
//! they are registered with [`crate::sim::SimInterruptController`] and
//! dispatched by the test harness.

use crate::mmio::RegisterBus;

/// An interrupt service routine that runs to completion
pub trait InterruptHandler<B: RegisterBus + ?Sized> {
    /// NVIC interrupt number this handler is bound to
    fn irq(&self) -> u16;

    /// Service the interrupt
    ///
    /// Called with the interrupt already taken. Implementations must clear
    /// the peripheral's pending condition or the interrupt fires again on
    /// return.
    fn on_interrupt(&self, bus: &mut B);
}
