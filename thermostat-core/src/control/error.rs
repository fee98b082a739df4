//! Control cycle errors

use crate::traits::{DisplayError, HeaterError, SensorError};

/// Any failure during a control cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThermostatError {
    /// Reading the temperature failed
    Sensor(SensorError),
    /// Rendering to the display failed
    Display(DisplayError),
    /// Switching the heater failed
    Heater(HeaterError),
}

impl From<SensorError> for ThermostatError {
    fn from(e: SensorError) -> Self {
        ThermostatError::Sensor(e)
    }
}

impl From<DisplayError> for ThermostatError {
    fn from(e: DisplayError) -> Self {
        ThermostatError::Display(e)
    }
}

impl From<HeaterError> for ThermostatError {
    fn from(e: HeaterError) -> Self {
        ThermostatError::Heater(e)
    }
}
