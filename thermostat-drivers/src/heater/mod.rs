//! Heater output and the thermostat built on it

pub mod gpio;
pub mod thermostat;

pub use gpio::GpioHeater;
pub use thermostat::{Cycle, Thermostat};
