//! User input

pub mod joystick;

pub use joystick::{Button, Debouncer, Joystick, Latches};
