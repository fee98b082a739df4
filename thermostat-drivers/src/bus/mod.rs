//! Two-wire bus master implementations

pub mod twi;

pub use twi::TwiMaster;
