//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in thermostat-core and thermostat-hal:
//!
//! - Two-wire bus master on a TWI register block
//! - HD44780 character display in 4-bit mode
//! - LM92 digital temperature sensor
//! - GPIO heater relay and the hysteresis thermostat built on all of the above

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod bus;
pub mod display;
pub mod heater;
pub mod sensor;

#[cfg(test)]
mod testing;
