//! I2C1 register access for STM32F1
//!
//! SR1 and SR2 are folded into one status word, SR1 first, so the ADDR
//! flag clears the way the protocol engine expects.

use embassy_stm32::pac;
use embassy_stm32::pac::i2c::vals;

use irscope_hal::i2c::{I2cConfig, I2cRegisters};

/// Polled I2C1 master
///
/// `D` is the embassy driver that configured the SCL/SDA pins; it is only
/// held so the pins stay in their alternate function.
pub struct Stm32I2c<D> {
    _driver: D,
    pclk1: u32,
}

impl<D> Stm32I2c<D> {
    /// Take over I2C1 from an embassy driver
    ///
    /// `pclk1` is the APB1 clock in Hz. No registers are touched until
    /// the first [`I2cRegisters::reinit`].
    pub fn new(driver: D, pclk1: u32) -> Self {
        Self {
            _driver: driver,
            pclk1,
        }
    }

    fn regs(&self) -> pac::i2c::I2c {
        pac::I2C1
    }
}

impl<D> I2cRegisters for Stm32I2c<D> {
    fn status(&mut self) -> u32 {
        let sr1 = self.regs().sr1().read().0 & 0xFFFF;
        let sr2 = self.regs().sr2().read().0 & 0xFFFF;
        sr1 | (sr2 << 16)
    }

    fn generate_start(&mut self) {
        self.regs().cr1().modify(|w| w.set_start(true));
    }

    fn generate_stop(&mut self) {
        self.regs().cr1().modify(|w| w.set_stop(true));
    }

    fn set_ack(&mut self, enabled: bool) {
        self.regs().cr1().modify(|w| w.set_ack(enabled));
    }

    fn write_data(&mut self, byte: u8) {
        self.regs().dr().write(|w| w.set_dr(byte));
    }

    fn read_data(&mut self) -> u8 {
        self.regs().dr().read().dr()
    }

    fn reinit(&mut self, config: &I2cConfig) {
        // Full reset through RCC; clock enable survives
        pac::RCC.apb1rstr().modify(|w| w.set_i2c1rst(true));
        pac::RCC.apb1rstr().modify(|w| w.set_i2c1rst(false));

        let timing = config.timing(self.pclk1);
        let regs = self.regs();

        regs.cr2().modify(|w| w.set_freq(timing.freq));
        regs.cr1().modify(|w| w.set_pe(false));
        regs.ccr().write(|w| {
            w.set_ccr(timing.ccr);
            w.set_f_s(if timing.fast_mode {
                vals::FS::FAST
            } else {
                vals::FS::STANDARD
            });
            w.set_duty(if timing.duty_16_9 {
                vals::Duty::DUTY16_9
            } else {
                vals::Duty::DUTY2_1
            });
        });
        regs.cr1().modify(|w| {
            w.set_pe(true);
            w.set_ack(true);
        });
    }
}
