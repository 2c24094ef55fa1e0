//! Volatile memory-mapped register bus
//!
//! The only module in this crate that dereferences raw addresses.

#![allow(unsafe_code)]

use quadrx_hal::RegisterBus;

/// Register bus over the real TM4C123 address space
///
/// Zero-sized; copies are free and all copies access the same hardware.
#[derive(Debug, Clone, Copy)]
pub struct VolatileBus {
    _private: (),
}

impl VolatileBus {
    /// Create a bus handle
    ///
    /// # Safety
    ///
    /// Only valid on a TM4C123 target. Every address later passed to
    /// [`RegisterBus::read`] or [`RegisterBus::write`] must be a mapped,
    /// word-aligned register. Callers are responsible for not racing
    /// read-modify-write sequences on the same register from interrupt and
    /// thread context.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for VolatileBus {
    #[inline(always)]
    fn read(&mut self, addr: u32) -> u32 {
        // SAFETY: upheld by the contract of `VolatileBus::new`
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    #[inline(always)]
    fn write(&mut self, addr: u32, value: u32) {
        // SAFETY: upheld by the contract of `VolatileBus::new`
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }
}
