//! Embassy async tasks

pub mod joystick;

pub use joystick::{joystick_task, take_presses, BoardJoystick};
