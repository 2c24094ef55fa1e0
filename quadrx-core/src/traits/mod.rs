//! Hardware abstraction traits
//!
//! These traits define the interface between the monitor logic and the
//! hardware-specific collaborators.

pub mod display;

pub use display::{DisplayError, DisplaySink, Half, LINES_PER_HALF};
