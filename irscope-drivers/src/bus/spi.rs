//! Polled transmit-only SPI link

use core::convert::Infallible;

use irscope_hal::spi::{SpiBus, SpiRegisters};

use super::poll;

/// Blocking SPI writer over a register-level peripheral
///
/// Each byte waits for TXE before it is written; a block returns only
/// after BSY clears, so chip select can be released right away.
pub struct PolledSpi<P> {
    regs: P,
}

impl<P: SpiRegisters> PolledSpi<P> {
    pub fn new(regs: P) -> Self {
        Self { regs }
    }

    /// Release the underlying peripheral
    pub fn release(self) -> P {
        self.regs
    }
}

impl<P: SpiRegisters> SpiBus for PolledSpi<P> {
    type Error = Infallible;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            poll::spin(|| self.regs.tx_empty());
            self.regs.write_data(byte);
        }
        poll::spin(|| !self.regs.busy());
        Ok(())
    }
}
