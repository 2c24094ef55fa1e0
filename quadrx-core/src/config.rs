//! Monitor configuration
//!
//! Controls how receive slots are laid out on the display. Board wiring
//! (which UART feeds which slot) lives in the chip HAL's board module.

use crate::traits::{Half, LINES_PER_HALF};

/// Label printed before every slot value
pub const DEFAULT_LABEL: &str = "Value: ";

/// Display layout for the receive monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Text printed before each value
    pub label: &'static str,
    /// Half the first slot is drawn on
    pub half: Half,
    /// Line the first slot is drawn on (0-3)
    pub first_line: u8,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL,
            half: Half::Top,
            first_line: 0,
        }
    }
}

impl MonitorConfig {
    /// Screen position of slot `index`
    ///
    /// Slots fill the starting half line by line and spill into the bottom
    /// half. Returns `None` for slots that do not fit on the screen.
    pub fn placement(&self, index: usize) -> Option<(Half, u8)> {
        let start = match self.half {
            Half::Top => 0,
            Half::Bottom => LINES_PER_HALF as usize,
        };
        let row = start + self.first_line as usize + index;

        if row < LINES_PER_HALF as usize {
            Some((Half::Top, row as u8))
        } else if row < 2 * LINES_PER_HALF as usize {
            Some((Half::Bottom, (row - LINES_PER_HALF as usize) as u8))
        } else {
            None
        }
    }
}
