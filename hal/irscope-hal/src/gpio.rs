//! GPIO pin abstractions
//!
//! The display needs four control outputs (chip select, data/command,
//! reset, backlight) and the joystick five inputs. Chip HALs wrap their
//! own pin types in these traits.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Switch wired to ground with a pull-up
///
/// Reports `is_high() == true` while the switch is closed, so consumers
/// can treat "high" as "pressed" regardless of wiring.
pub struct ActiveLow<P>(pub P);

impl<P: InputPin> InputPin for ActiveLow<P> {
    fn is_high(&self) -> bool {
        self.0.is_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Level(bool);

    impl InputPin for Level {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_active_low_inverts() {
        assert!(ActiveLow(Level(false)).is_high());
        assert!(!ActiveLow(Level(true)).is_high());
        assert!(ActiveLow(Level(true)).is_low());
    }
}
