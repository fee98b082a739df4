//! Thermostat control logic
//!
//! The heater state is an explicit value owned by the caller and threaded
//! through each control cycle; nothing here keeps global state.

pub mod error;
pub mod policy;

pub use error::ThermostatError;
pub use policy::{HeaterState, HysteresisPolicy};
