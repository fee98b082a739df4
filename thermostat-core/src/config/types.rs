//! Configuration type definitions
//!
//! These types represent the thermostat configuration. Values are fixed
//! when the firmware is built; there is no runtime reconfiguration.

use crate::temperature::TemperatureUnit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of display rows the controller can address
pub const MAX_DISPLAY_ROWS: u8 = 4;

/// Longest display line the controller can address
pub const MAX_DISPLAY_COLUMNS: u8 = 40;

/// Configuration values that cannot work together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Lower threshold is not below the upper threshold
    InvertedThresholds,
    /// Display rows/columns outside what the controller addresses
    InvalidDisplayGeometry,
}

/// Thermostat configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThermostatConfig {
    /// Heater turns off above this reading
    pub upper_threshold: f32,
    /// Heater turns on below this reading
    pub lower_threshold: f32,
    /// Unit for thresholds and display
    pub unit: TemperatureUnit,
    /// Pause between control cycles (ms)
    pub refresh_ms: u32,
    /// How long the start-up banner stays up (ms)
    pub splash_ms: u32,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            upper_threshold: 86.0,
            lower_threshold: 84.0,
            unit: TemperatureUnit::Fahrenheit,
            refresh_ms: 1044,
            splash_ms: 3000,
        }
    }
}

impl ThermostatConfig {
    /// Check that the thresholds form a hysteresis band
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lower_threshold < self.upper_threshold) {
            return Err(ConfigError::InvertedThresholds);
        }
        Ok(())
    }
}

/// Character display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Characters per line
    pub columns: u8,
    /// Number of lines
    pub rows: u8,
    /// Show the underline cursor
    pub cursor_visible: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 4,
            cursor_visible: true,
        }
    }
}

impl DisplayConfig {
    /// 16x2 module
    pub const LCD_16X2: Self = Self {
        columns: 16,
        rows: 2,
        cursor_visible: true,
    };

    /// 20x4 module
    pub const LCD_20X4: Self = Self {
        columns: 20,
        rows: 4,
        cursor_visible: true,
    };

    /// Check the geometry against the controller's memory map
    ///
    /// Rows 2 and 3 of a four-line module continue rows 0 and 1 at
    /// offset 0x14, which limits such modules to 20 columns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rows_ok = (1..=MAX_DISPLAY_ROWS).contains(&self.rows);
        let columns_ok = (1..=MAX_DISPLAY_COLUMNS).contains(&self.columns);
        let four_line_ok = self.rows <= 2 || self.columns <= 20;

        if rows_ok && columns_ok && four_line_ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidDisplayGeometry)
        }
    }
}
