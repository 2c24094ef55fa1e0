//! Display sink trait for the debug LCD

/// Number of message lines in each half of the screen
pub const LINES_PER_HALF: u8 = 4;

/// Errors that can occur while writing to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus or pin error talking to the panel
    Communication,
    /// Line outside 0-3 or coordinates outside the panel
    InvalidCoordinates,
    /// Panel used before its init sequence ran
    NotInitialized,
}

/// Which half of the screen a message goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    /// Half for a device selector: zero is the top half, anything else the bottom
    pub const fn from_selector(device: u8) -> Self {
        if device == 0 {
            Half::Top
        } else {
            Half::Bottom
        }
    }
}

/// Write-only message sink
///
/// The screen is split into a top and a bottom half of
/// [`LINES_PER_HALF`] lines each. A message is a label followed by a signed
/// integer and replaces whatever was on that line.
pub trait DisplaySink {
    /// Render `label` followed by `value` on `line` of `half`
    fn message(&mut self, half: Half, line: u8, label: &str, value: i32)
        -> Result<(), DisplayError>;

    /// Blank the whole screen
    fn clear(&mut self) -> Result<(), DisplayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_from_selector() {
        assert_eq!(Half::from_selector(0), Half::Top);
        assert_eq!(Half::from_selector(1), Half::Bottom);
        assert_eq!(Half::from_selector(7), Half::Bottom);
    }
}
