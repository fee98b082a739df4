//! Thermostat status screen
//!
//! ```text
//! Temp: 85°F
//! Heater is ON
//! ```

use thermostat_core::control::HeaterState;
use thermostat_core::temperature::TemperatureUnit;
use thermostat_core::traits::{DisplayError, TextDisplay, TextDisplayExt};

/// HD44780 ROM code A00 degree sign
pub const DEGREE_GLYPH: u8 = 0xDF;

/// Start-up banner
pub const SPLASH_TEXT: &str = "LM92 Thermostat...";

/// Row the heater state is shown on
pub const HEATER_ROW: u8 = 1;

/// Clear the screen and show the start-up banner
pub fn render_splash<L: TextDisplay>(display: &mut L) -> Result<(), DisplayError> {
    display.clear()?;
    display.write_str(SPLASH_TEXT)
}

/// Clear the screen and show the reading on the first row
///
/// The reading is truncated toward zero to whole degrees.
pub fn render_temperature<L: TextDisplay>(
    display: &mut L,
    reading: f32,
    unit: TemperatureUnit,
) -> Result<(), DisplayError> {
    display.clear()?;
    display.write_str("Temp: ")?;
    display.write_integer(reading as i32)?;
    display.write_bytes(&[DEGREE_GLYPH, unit.symbol()])
}

/// Show the heater state on the second row
///
/// Does not clear; call after [`render_temperature`].
pub fn render_heater_state<L: TextDisplay>(
    display: &mut L,
    state: HeaterState,
) -> Result<(), DisplayError> {
    display.set_line(HEATER_ROW)?;
    display.write_str(state.status_text())
}
