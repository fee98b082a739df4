//! Temperature sensor drivers

pub mod lm92;

pub use lm92::{Lm92, Lm92Config, Lm92Status, TemperatureEncoding, Threshold};
