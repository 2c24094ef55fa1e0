//! TM4C123-specific HAL for the quadrx firmware
//!
//! This crate provides TM4C123GH6PM register sequences written against
//! [`quadrx_hal::RegisterBus`]:
//!
//! - System clock (PLL) and peripheral clock gating
//! - UART configuration, receive interrupt handling and polled I/O
//! - GPIO pin multiplexing and push-pull outputs
//! - SSI0 as an `embedded-hal` SPI bus
//! - NVIC line enable and priority
//! - The board wiring of the four-channel receive monitor
//!
//! # Features
//!
//! - `defmt` - Enable debug formatting support
//! - `sim` - Simulated TM4C123 register file for host tests

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod board;
pub mod gpio;
pub mod map;
pub mod nvic;
pub mod pll;
pub mod ssi;
pub mod sysctl;
pub mod uart;
pub mod volatile;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

// Re-export shared types from quadrx-hal
pub use quadrx_hal::{Pin, Port, RegisterBus, UartConfig};

pub use board::{BoardConfig, RxChannel};
pub use uart::{RxHandler, UartId};
pub use volatile::VolatileBus;
