//! GPIO pin identifiers
//!
//! Pins are named the way the datasheet and board schematics name them:
//! a port letter and a pin index, e.g. `PD6`.

/// Number of pins per GPIO port
pub const PINS_PER_PORT: u8 = 8;

/// GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Port {
    /// Zero-based port index (A = 0)
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// A physical pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    port: Port,
    index: u8,
}

impl Pin {
    /// Create a pin
    ///
    /// Panics (at compile time, in const context) if `index` is not 0-7.
    pub const fn new(port: Port, index: u8) -> Self {
        assert!(index < PINS_PER_PORT, "pin index out of range");
        Self { port, index }
    }

    /// Port this pin belongs to
    pub const fn port(&self) -> Port {
        self.port
    }

    /// Pin index within its port (0-7)
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Single-bit mask for per-pin registers (AFSEL, DEN, AMSEL, ...)
    pub const fn mask(&self) -> u32 {
        1 << self.index
    }

    /// Bit offset of this pin's nibble in a port control register
    pub const fn pctl_shift(&self) -> u32 {
        self.index as u32 * 4
    }

    /// Mask of this pin's nibble in a port control register
    pub const fn pctl_mask(&self) -> u32 {
        0xF << self.pctl_shift()
    }
}
