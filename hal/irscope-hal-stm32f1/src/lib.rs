//! STM32F1-specific HAL for the IRScope firmware
//!
//! Implements the register-level `irscope-hal` traits for the I2C v1 and
//! SPI v1 blocks of the STM32F1 family, plus GPIO wrappers around
//! embassy's pin drivers.
//!
//! Pin muxing and clock enables are left to embassy's blocking drivers;
//! once a driver is built, its peripheral is handed to the wrappers here
//! and driven directly through the PAC by the polled engines in
//! `irscope-drivers`.
//!
//! # Features
//!
//! - `stm32f103c8` - STM32F103C8 (Blue Pill)
//! - `stm32f103cb` - STM32F103CB
//! - `defmt` - Enable debug formatting support

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod spi;

pub use gpio::{Stm32Input, Stm32Output};
pub use i2c::Stm32I2c;
pub use spi::Stm32Spi;
