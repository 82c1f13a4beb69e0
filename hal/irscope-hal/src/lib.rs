//! IRScope Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that are implemented
//! by chip-specific HALs and consumed by the board-agnostic drivers. The
//! protocol engines in `irscope-drivers` are written against the
//! register-level traits so they can be exercised on the host against a
//! simulated peripheral.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (irscope-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  irscope-drivers (engines, devices, UI) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  irscope-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ irscope-hal-  │
//!             │    stm32f1    │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`i2c::I2cRegisters`] - Polled I2C peripheral (status word, START/STOP, data)
//! - [`i2c::I2cBus`] - I2C transactions
//! - [`spi::SpiRegisters`] - Polled transmit-only SPI peripheral
//! - [`spi::SpiBus`] - SPI transmit

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::{I2cBus, I2cConfig, I2cRegisters};
pub use spi::{SpiBus, SpiConfig, SpiRegisters};
