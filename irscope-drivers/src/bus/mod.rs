//! Polled transport engines
//!
//! Both engines busy-wait on peripheral status flags. The I2C engine
//! bounds every wait and recovers the peripheral on timeout; the SPI link
//! waits without bound since the display cannot stall it.

pub mod i2c;
pub mod poll;
pub mod spi;

#[cfg(test)]
pub(crate) mod sim;

pub use i2c::{I2cError, Phase, PolledI2c};
pub use spi::PolledSpi;
