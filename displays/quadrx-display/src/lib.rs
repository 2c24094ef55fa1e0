//! LCD output for the quadrx receive monitor
//!
//! - [`message`]: text layout of a labelled value on a half-screen line
//! - [`st7735`]: ST7735 128x160 TFT driver over any `embedded-hal` SPI bus,
//!   implementing both the `embedded-graphics` draw target and
//!   [`quadrx_core::DisplaySink`]

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod message;
pub mod st7735;

pub use st7735::St7735;
