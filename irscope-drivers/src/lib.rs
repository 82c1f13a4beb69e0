//! Hardware driver implementations
//!
//! This crate provides the transport engines and device drivers of the
//! thermal camera, all written against the `irscope-hal` traits:
//!
//! - Polled I2C master engine with bounded waits and fault recovery
//! - Polled transmit-only SPI link
//! - AMG8833 8x8 thermal array sensor
//! - ST7735 color LCD controller
//! - Joystick debouncing
//! - Screen rendering (heat map, readouts, menu)

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod display;
pub mod input;
pub mod sensor;
pub mod ui;

#[cfg(test)]
pub(crate) mod mock;
