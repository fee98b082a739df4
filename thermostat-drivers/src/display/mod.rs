//! Character display drivers and screens

pub mod hd44780;
pub mod status;

pub use hd44780::{cursor_address, Hd44780, LcdPins, Mode};
pub use status::{render_heater_state, render_splash, render_temperature};
