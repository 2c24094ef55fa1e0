//! Board-agnostic core logic for the quadrx receive monitor
//!
//! This crate contains the parts of the firmware that do not touch
//! registers:
//!
//! - Receive sampler: one atomic "last value wins" cell per monitored UART,
//!   with write capability split per cell and a read-only view for the loop
//! - Monitor: one render pass of every cell to a display sink
//! - Display sink trait and monitor configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod monitor;
pub mod sampler;
pub mod traits;

pub use config::MonitorConfig;
pub use monitor::Monitor;
pub use sampler::{ReceiveSampler, SampleReader, SamplerError, SlotWriter};
pub use traits::{DisplayError, DisplaySink, Half};
