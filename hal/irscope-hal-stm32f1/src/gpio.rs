//! GPIO wrappers for STM32F1
//!
//! Adapts embassy's `Output` and `Input` drivers to the `irscope-hal`
//! pin traits.

use embassy_stm32::gpio::{Input, Output};

use irscope_hal::gpio::{InputPin, OutputPin};

/// Push-pull output
pub struct Stm32Output<'d>(pub Output<'d>);

impl OutputPin for Stm32Output<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Digital input
pub struct Stm32Input<'d>(pub Input<'d>);

impl InputPin for Stm32Input<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
