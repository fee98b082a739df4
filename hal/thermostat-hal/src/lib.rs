//! Thermostat Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits shared by the
//! thermostat drivers. Chip support only has to provide a register block
//! for the two-wire peripheral; everything above it is portable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (thermostat control loop)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermostat-drivers (TWI master, LM92)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermostat-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  TWI register block (chip specific)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`twi::TwiRegisters`] - Raw two-wire control/status/data registers
//! - [`twi::TwoWireBus`] - Bus primitives (start, stop, send, receive)
//! - [`i2c::I2cBus`] - Whole write/read transfers

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod twi;

// Re-export key traits at crate root for convenience
pub use i2c::{I2cBus, I2cConfig};
pub use twi::{BusError, TwiRegisters, TwoWireBus};
