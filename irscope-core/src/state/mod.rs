//! Application state machine
//!
//! The scope boots, brings up the sensor, then runs until power-off.
//! A sensor that fails bring-up halts the application for good.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{FaultKind, State};
