//! Board-agnostic core logic for the thermostat firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (temperature sensor, heater, text display)
//! - Bounded number formatting for character displays
//! - Hysteresis threshold policy and heater state
//! - Temperature unit conversion
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod format;
pub mod temperature;
pub mod traits;
