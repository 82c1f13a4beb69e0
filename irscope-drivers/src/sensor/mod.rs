//! Thermal sensors

pub mod amg8833;

pub use amg8833::{Amg8833, SensorError};
