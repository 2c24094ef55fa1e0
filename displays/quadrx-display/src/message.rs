//! Message layout
//!
//! The panel is 16 text rows of 21 columns in a 6x10 font. The top half owns
//! rows 0-7 and the bottom half rows 8-15; each half shows
//! [`LINES_PER_HALF`] message lines starting at its first row.

use core::fmt::Write;

use heapless::String;
use quadrx_core::traits::{DisplayError, Half, LINES_PER_HALF};

/// Glyph cell width in pixels
pub const CHAR_WIDTH: u32 = 6;
/// Text row height in pixels
pub const ROW_HEIGHT: u32 = 10;
/// Characters per text row
pub const COLUMNS: usize = 21;
/// Text rows per half
pub const ROWS_PER_HALF: u8 = 8;

/// Text row for a message line
pub fn row_of(half: Half, line: u8) -> Result<u8, DisplayError> {
    if line >= LINES_PER_HALF {
        return Err(DisplayError::InvalidCoordinates);
    }
    Ok(match half {
        Half::Top => line,
        Half::Bottom => ROWS_PER_HALF + line,
    })
}

/// Label followed by the decimal value, cut at the row width
pub fn format_message(label: &str, value: i32) -> String<COLUMNS> {
    let mut text = String::new();
    for ch in label.chars() {
        if text.push(ch).is_err() {
            return text;
        }
    }

    // i32::MIN is 11 characters
    let mut digits: String<11> = String::new();
    if write!(digits, "{}", value).is_ok() {
        for ch in digits.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
    }
    text
}
