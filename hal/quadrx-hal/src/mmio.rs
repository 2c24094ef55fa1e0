//! Memory-mapped register access
//!
//! All peripheral drivers in quadrx are written against [`RegisterBus`]
//! instead of dereferencing raw pointers directly. On target the bus is a
//! zero-sized volatile accessor; in tests it is [`crate::sim::SimBus`],
//! which records the order of every access.

/// 32-bit register bus
///
/// Addresses are absolute physical addresses. Reads take `&mut self` because
/// reading a hardware register can have side effects (popping a FIFO) and
/// simulated buses record reads as well as writes.
pub trait RegisterBus {
    /// Read a 32-bit register
    fn read(&mut self, addr: u32) -> u32;

    /// Write a 32-bit register
    fn write(&mut self, addr: u32, value: u32);

    /// Read-modify-write a register
    fn modify<F>(&mut self, addr: u32, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(addr);
        self.write(addr, f(value));
    }

    /// Set the bits of `mask`, leaving the rest untouched
    fn set_bits(&mut self, addr: u32, mask: u32) {
        self.modify(addr, |v| v | mask);
    }

    /// Clear the bits of `mask`, leaving the rest untouched
    fn clear_bits(&mut self, addr: u32, mask: u32) {
        self.modify(addr, |v| v & !mask);
    }

    /// Replace the bits selected by `mask` with `value` (already shifted)
    fn write_field(&mut self, addr: u32, mask: u32, value: u32) {
        self.modify(addr, |v| (v & !mask) | (value & mask));
    }

    /// Spin until every bit of `mask` reads back as set
    ///
    /// There is no timeout. A peripheral that never reports ready stalls the
    /// caller forever, which is the intended boot-time behavior.
    fn wait_set(&mut self, addr: u32, mask: u32) {
        while self.read(addr) & mask != mask {
            core::hint::spin_loop();
        }
    }

    /// Spin until every bit of `mask` reads back as clear
    fn wait_clear(&mut self, addr: u32, mask: u32) {
        while self.read(addr) & mask != 0 {
            core::hint::spin_loop();
        }
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read(&mut self, addr: u32) -> u32 {
        (**self).read(addr)
    }

    fn write(&mut self, addr: u32, value: u32) {
        (**self).write(addr, value)
    }
}

/// Bit mask covering `width` bits starting at `shift`
pub const fn field_mask(shift: u32, width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        ((1u32 << width) - 1) << shift
    }
}
