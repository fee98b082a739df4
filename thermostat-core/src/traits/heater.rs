//! Heater and temperature sensor traits

use thermostat_hal::BusError;

use crate::control::HeaterState;
use crate::temperature::celsius_to_fahrenheit;

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus completion flag never set within the poll budget
    BusTimeout,
    /// Sensor did not acknowledge its address or a data byte
    BusNack,
    /// Any other bus failure (arbitration, sequencing, unexpected status)
    BusFault,
    /// Sensor answered with a value that cannot be a temperature
    InvalidReading,
}

impl From<BusError> for SensorError {
    fn from(e: BusError) -> Self {
        match e {
            BusError::Timeout => SensorError::BusTimeout,
            BusError::Nack => SensorError::BusNack,
            BusError::ArbitrationLost
            | BusError::NoTransaction
            | BusError::UnexpectedStatus(_) => SensorError::BusFault,
        }
    }
}

/// Trait for temperature sensors
///
/// Implementations handle the specific sensor type and its bus protocol.
pub trait TemperatureSensor {
    /// Read the current temperature in degrees Celsius
    ///
    /// Takes `&mut self` because every read is a bus transaction.
    fn read_celsius(&mut self) -> Result<f32, SensorError>;

    /// Read the current temperature in degrees Fahrenheit
    fn read_fahrenheit(&mut self) -> Result<f32, SensorError> {
        self.read_celsius().map(celsius_to_fahrenheit)
    }
}

/// Errors from driving the heater output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaterError {
    /// The output pin refused the new level
    Pin,
}

/// Trait for heater output control
///
/// Implementations switch the heater element via a GPIO-driven relay or SSR.
pub trait HeaterOutput {
    /// Turn the heater on or off
    fn set_on(&mut self, on: bool) -> Result<(), HeaterError>;

    /// Check if the heater is currently on
    fn is_on(&self) -> bool;

    /// Drive the output to match a heater state
    fn apply(&mut self, state: HeaterState) -> Result<(), HeaterError> {
        self.set_on(state.is_heating())
    }
}
