//! quadrx Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits shared by the
//! chip-specific HAL (TM4C123) and the board-agnostic core. Drivers talk to
//! peripherals through [`RegisterBus`], which lets the exact same register
//! sequences run against real memory-mapped I/O on target and against a
//! recording simulation on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (quadrx-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  quadrx-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ quadrx-hal-   │       │  sim::SimBus  │
//! │   tm4c123     │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`mmio::RegisterBus`] - 32-bit memory-mapped register access
//! - [`irq::InterruptHandler`] - Interrupt service routines bound to a bus
//! - [`uart::UartTx`], [`uart::UartRx`] - Polled serial communication

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod irq;
pub mod mmio;
pub mod spi;
pub mod uart;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

// Re-export key traits at crate root for convenience
pub use gpio::{Pin, Port};
pub use irq::InterruptHandler;
pub use mmio::RegisterBus;
pub use uart::{UartConfig, UartRx, UartTx};
