//! Character display trait

use crate::format::{format_decimal, format_hex};

/// Errors that can occur when driving a character display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Row or column outside the display grid
    AddressOutOfRange,
    /// Number does not fit the fixed text buffer
    FormatOverflow,
    /// A control or data pin refused the new level
    Pin,
}

/// Trait for text-mode character displays
///
/// The cursor position lives in the display controller; implementations
/// do not mirror it.
pub trait TextDisplay {
    /// Clear the entire screen and return the cursor to (0, 0)
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Return the cursor to (0, 0) without erasing anything
    fn home(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor
    ///
    /// - `column`: Column number (0-based)
    /// - `row`: Row number (0-based)
    fn set_cursor(&mut self, column: u8, row: u8) -> Result<(), DisplayError>;

    /// Write raw character codes at the cursor
    ///
    /// Codes go to the controller unchanged, so glyphs outside ASCII
    /// (such as the degree sign) can be written.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), DisplayError>;

    /// Get the display dimensions as (columns, rows)
    fn dimensions(&self) -> (u8, u8);

    /// Write text at the cursor
    ///
    /// There is no wrapping or truncation: text running past the end of a
    /// line continues wherever the controller's address counter goes.
    fn write_str(&mut self, text: &str) -> Result<(), DisplayError> {
        self.write_bytes(text.as_bytes())
    }

    /// Move the cursor to the start of a row
    fn set_line(&mut self, row: u8) -> Result<(), DisplayError> {
        self.set_cursor(0, row)
    }
}

/// Helper trait for writing numbers
pub trait TextDisplayExt: TextDisplay {
    /// Write a signed integer in base 10
    fn write_integer(&mut self, value: i32) -> Result<(), DisplayError> {
        let text = format_decimal(value)?;
        self.write_str(&text)
    }

    /// Write an unsigned integer in base 16 (lowercase, no prefix)
    fn write_hex(&mut self, value: u32) -> Result<(), DisplayError> {
        let text = format_hex(value);
        self.write_str(&text)
    }
}

// Blanket implementation for all TextDisplay types
impl<T: TextDisplay> TextDisplayExt for T {}
