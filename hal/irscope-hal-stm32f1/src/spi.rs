//! SPI1 register access for STM32F1
//!
//! The display link only ever transmits, so SPI1 runs as a
//! bidirectional-mode master with the output stage permanently enabled
//! and software slave management.

use embassy_stm32::pac;
use embassy_stm32::pac::spi::vals;

use irscope_hal::spi::{Mode, SpiConfig, SpiRegisters};

/// Polled transmit-only SPI1 master
///
/// `D` is the embassy driver that configured SCK/MOSI.
pub struct Stm32Spi<D> {
    _driver: D,
}

impl<D> Stm32Spi<D> {
    /// Take over SPI1 and program it for transmit-only operation
    pub fn new(driver: D, config: &SpiConfig) -> Self {
        let spi = Self { _driver: driver };
        spi.configure(config);
        spi
    }

    fn regs(&self) -> pac::spi::Spi {
        pac::SPI1
    }

    fn configure(&self, config: &SpiConfig) {
        let (cpol, cpha) = match config.mode {
            Mode::Mode0 => (vals::Cpol::IDLE_LOW, vals::Cpha::FIRST_EDGE),
            Mode::Mode1 => (vals::Cpol::IDLE_LOW, vals::Cpha::SECOND_EDGE),
            Mode::Mode2 => (vals::Cpol::IDLE_HIGH, vals::Cpha::FIRST_EDGE),
            Mode::Mode3 => (vals::Cpol::IDLE_HIGH, vals::Cpha::SECOND_EDGE),
        };

        let regs = self.regs();
        regs.cr1().modify(|w| w.set_spe(false));
        regs.cr1().write(|w| {
            w.set_bidimode(vals::Bidimode::BIDIRECTIONAL);
            w.set_bidioe(true);
            w.set_mstr(vals::Mstr::MASTER);
            w.set_ssm(true);
            w.set_ssi(true);
            w.set_cpol(cpol);
            w.set_cpha(cpha);
            w.set_br(vals::Br::from_bits(config.baud_rate_bits()));
            w.set_lsbfirst(vals::Lsbfirst::MSBFIRST);
            w.set_dff(vals::Dff::BITS8);
        });
        regs.cr1().modify(|w| w.set_spe(true));
    }
}

impl<D> SpiRegisters for Stm32Spi<D> {
    fn tx_empty(&mut self) -> bool {
        self.regs().sr().read().txe()
    }

    fn busy(&mut self) -> bool {
        self.regs().sr().read().bsy()
    }

    fn write_data(&mut self, byte: u8) {
        self.regs().dr().write(|w| w.set_dr(byte as u16));
    }
}
