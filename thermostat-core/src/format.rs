//! Bounded number formatting for character displays
//!
//! Numbers are rendered into a fixed 8-character buffer. Values whose
//! text does not fit are rejected with [`DisplayError::FormatOverflow`]
//! instead of being truncated.

use core::fmt::Write;

use heapless::String;

use crate::traits::DisplayError;

/// Capacity of the number text buffer in characters
pub const NUMBER_TEXT_LEN: usize = 8;

/// Text of a formatted number
pub type NumberText = String<NUMBER_TEXT_LEN>;

/// Smallest value [`format_decimal`] accepts
pub const DECIMAL_MIN: i32 = -9_999_999;

/// Largest value [`format_decimal`] accepts
pub const DECIMAL_MAX: i32 = 99_999_999;

/// Format a signed integer in base 10
pub fn format_decimal(value: i32) -> Result<NumberText, DisplayError> {
    let mut text = NumberText::new();
    write!(text, "{}", value).map_err(|_| DisplayError::FormatOverflow)?;
    Ok(text)
}

/// Format an unsigned integer in base 16 with lowercase digits, no prefix
///
/// Every `u32` fits in eight hex digits.
pub fn format_hex(value: u32) -> NumberText {
    let mut text = NumberText::new();
    // Cannot fail: at most eight digits
    let _ = write!(text, "{:x}", value);
    text
}
