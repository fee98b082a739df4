//! Hysteresis threshold policy
//!
//! Turns the heater on below the lower threshold and off above the upper
//! threshold. Between the two the current state is kept, so the relay
//! only switches on boundary crossings.

use crate::config::{ConfigError, ThermostatConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Heater state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeaterState {
    /// Relay energised
    Heating,
    /// Relay released
    #[default]
    Idle,
}

impl HeaterState {
    /// Check if the heater should be energised
    pub const fn is_heating(self) -> bool {
        matches!(self, HeaterState::Heating)
    }

    /// Status line shown on the display
    pub const fn status_text(self) -> &'static str {
        match self {
            HeaterState::Heating => "Heater is ON",
            HeaterState::Idle => "Heater is OFF",
        }
    }
}

/// Two-threshold hysteresis policy
///
/// Thresholds are in whatever unit the readings are taken in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HysteresisPolicy {
    lower: f32,
    upper: f32,
}

impl HysteresisPolicy {
    /// Create a policy
    ///
    /// # Arguments
    /// - `lower`: Heater turns on strictly below this reading
    /// - `upper`: Heater turns off strictly above this reading
    pub fn new(lower: f32, upper: f32) -> Result<Self, ConfigError> {
        if !(lower < upper) {
            return Err(ConfigError::InvertedThresholds);
        }
        Ok(Self { lower, upper })
    }

    /// Create a policy from the thermostat configuration
    pub fn from_config(config: &ThermostatConfig) -> Result<Self, ConfigError> {
        Self::new(config.lower_threshold, config.upper_threshold)
    }

    /// Lower threshold
    pub fn lower(&self) -> f32 {
        self.lower
    }

    /// Upper threshold
    pub fn upper(&self) -> f32 {
        self.upper
    }

    /// Compute the next heater state from the current one and a reading
    pub fn next(&self, state: HeaterState, reading: f32) -> HeaterState {
        match state {
            HeaterState::Heating if reading > self.upper => HeaterState::Idle,
            HeaterState::Idle if reading < self.lower => HeaterState::Heating,
            _ => state,
        }
    }
}

impl Default for HysteresisPolicy {
    fn default() -> Self {
        let config = ThermostatConfig::default();
        Self {
            lower: config.lower_threshold,
            upper: config.upper_threshold,
        }
    }
}
