//! Configuration types
//!
//! Board-agnostic configuration structures. Everything is fixed at
//! construction time; nothing is reconfigured while running.

pub mod types;

pub use types::*;
