//! Temperature units and conversion

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unit a reading is displayed and compared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TemperatureUnit {
    Celsius,
    #[default]
    Fahrenheit,
}

impl TemperatureUnit {
    /// Letter shown after the degree glyph
    pub const fn symbol(self) -> u8 {
        match self {
            TemperatureUnit::Celsius => b'C',
            TemperatureUnit::Fahrenheit => b'F',
        }
    }

    /// Convert a Celsius value into this unit
    pub fn from_celsius(self, celsius: f32) -> f32 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }
}

/// Convert degrees Celsius to degrees Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

/// Convert degrees Fahrenheit to degrees Celsius
pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) / 1.8
}
