//! Five-way joystick
//!
//! Each switch is sampled once per tick. A press is latched when the
//! level goes from released to pressed and has read pressed on two
//! consecutive samples. The consumer keeps latched presses in a
//! [`Latches`] set until it reads and clears them.

use irscope_core::menu::NavPresses;
use irscope_hal::gpio::InputPin;

/// Joystick switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Center,
}

impl Button {
    /// All switches, in pin order
    pub const ALL: [Button; 5] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Center,
    ];

    /// Latch bit of this switch
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of latched presses, one bit per [`Button`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Latches(u8);

impl Latches {
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Rebuild from raw bits (unknown bits are dropped)
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x1F)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    /// Add every press in `other`
    pub fn merge(&mut self, other: Latches) {
        self.0 |= other.0;
    }

    /// Direction presses for the menu
    pub fn nav(self) -> NavPresses {
        NavPresses {
            up: self.contains(Button::Up),
            down: self.contains(Button::Down),
            left: self.contains(Button::Left),
            right: self.contains(Button::Right),
        }
    }
}

/// Two-sample edge debouncer for one switch
#[derive(Debug, Clone, Copy, Default)]
pub struct Debouncer {
    last: bool,
    stable: bool,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            last: false,
            stable: false,
        }
    }

    /// Feed one sample (`true` = pressed); returns `true` when a press
    /// is latched
    pub fn sample(&mut self, pressed: bool) -> bool {
        let mut latched = false;
        if pressed == self.last && pressed != self.stable {
            self.stable = pressed;
            latched = pressed;
        }
        self.last = pressed;
        latched
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.stable
    }
}

/// Joystick over five input pins reading high while pressed
///
/// Wire active-low switches through [`irscope_hal::gpio::ActiveLow`].
pub struct Joystick<P> {
    pins: [P; 5],
    debouncers: [Debouncer; 5],
}

impl<P: InputPin> Joystick<P> {
    /// Pins in [`Button::ALL`] order: up, down, left, right, center
    pub fn new(pins: [P; 5]) -> Self {
        Self {
            pins,
            debouncers: [Debouncer::new(); 5],
        }
    }

    /// Sample every switch once; returns the presses latched by this sample
    pub fn tick(&mut self) -> Latches {
        let mut fresh = Latches::empty();
        for ((button, pin), debouncer) in Button::ALL
            .into_iter()
            .zip(self.pins.iter())
            .zip(self.debouncers.iter_mut())
        {
            if debouncer.sample(pin.is_high()) {
                fresh.insert(button);
            }
        }
        fresh
    }

    /// Debounced level of one switch
    pub fn is_pressed(&self, button: Button) -> bool {
        self.debouncers[button as usize].is_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use irscope_hal::gpio::ActiveLow;

    struct Switch<'a>(&'a Cell<bool>);

    impl InputPin for Switch<'_> {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_press_latches_on_second_sample() {
        let mut d = Debouncer::new();
        assert!(!d.sample(true));
        assert!(d.sample(true));
        // Held: no repeat
        assert!(!d.sample(true));
        assert!(!d.sample(true));
        assert!(d.is_pressed());
    }

    #[test]
    fn test_single_sample_glitch_ignored() {
        let mut d = Debouncer::new();
        assert!(!d.sample(true));
        assert!(!d.sample(false));
        assert!(!d.sample(true));
        assert!(!d.sample(false));
        assert!(!d.is_pressed());
    }

    #[test]
    fn test_release_must_be_stable_before_next_press() {
        let mut d = Debouncer::new();
        d.sample(true);
        assert!(d.sample(true));
        // One released sample is a bounce
        assert!(!d.sample(false));
        assert!(!d.sample(true));
        assert!(d.is_pressed());
        // Stable release, then a new press
        d.sample(false);
        d.sample(false);
        assert!(!d.is_pressed());
        assert!(!d.sample(true));
        assert!(d.sample(true));
    }

    #[test]
    fn test_latches_bits_and_nav() {
        let mut l = Latches::empty();
        l.insert(Button::Up);
        l.insert(Button::Right);
        assert_eq!(l.bits(), 0b01001);
        assert_eq!(
            l.nav(),
            NavPresses {
                up: true,
                down: false,
                left: false,
                right: true,
            }
        );
        assert_eq!(Latches::from_bits(0xFF).bits(), 0x1F);
        assert!(Latches::from_bits(Button::Center.bit()).nav() == NavPresses::default());
    }

    #[test]
    fn test_joystick_latches_accumulate() {
        let levels = [
            Cell::new(true),
            Cell::new(true),
            Cell::new(true),
            Cell::new(true),
            Cell::new(true),
        ];
        // Pull-ups: released reads high
        let mut js = Joystick::new([
            ActiveLow(Switch(&levels[0])),
            ActiveLow(Switch(&levels[1])),
            ActiveLow(Switch(&levels[2])),
            ActiveLow(Switch(&levels[3])),
            ActiveLow(Switch(&levels[4])),
        ]);

        let mut pending = Latches::empty();

        assert!(js.tick().is_empty());
        levels[1].set(false);
        assert!(js.tick().is_empty());
        let fresh = js.tick();
        assert_eq!(fresh, Latches::from_bits(Button::Down.bit()));
        assert!(js.is_pressed(Button::Down));
        pending.merge(fresh);

        // Released, then down and right together, before anyone consumed
        levels[1].set(true);
        pending.merge(js.tick());
        pending.merge(js.tick());
        levels[1].set(false);
        levels[3].set(false);
        pending.merge(js.tick());
        pending.merge(js.tick());

        assert!(pending.contains(Button::Down));
        assert!(pending.contains(Button::Right));
        assert!(!pending.contains(Button::Up));
        assert_eq!(
            pending.nav(),
            NavPresses {
                up: false,
                down: true,
                left: false,
                right: true,
            }
        );
    }
}
