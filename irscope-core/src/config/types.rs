//! Configuration type definitions

use crate::menu::Menu;
use crate::thermal::{Palette, TempUnit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sensor frame rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameRate {
    #[default]
    Hz10,
    Hz1,
}

impl FrameRate {
    /// Frames per second
    pub fn hz(self) -> u8 {
        match self {
            FrameRate::Hz10 => 10,
            FrameRate::Hz1 => 1,
        }
    }

    /// Frame rate from frames per second
    pub fn from_hz(hz: i64) -> Option<Self> {
        match hz {
            10 => Some(FrameRate::Hz10),
            1 => Some(FrameRate::Hz1),
            _ => None,
        }
    }
}

/// Thermal sensor link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// I2C bus clock in Hz
    pub i2c_frequency: u32,
    /// I2C peripheral logic clock in Hz
    pub i2c_logic_clock: u32,
    /// Polls allowed per wait phase before a timeout
    pub timeout_iterations: u32,
    /// Array frame rate
    pub frame_rate: FrameRate,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            i2c_frequency: 100_000,
            i2c_logic_clock: 2_000_000,
            timeout_iterations: 100_000,
            frame_rate: FrameRate::Hz10,
        }
    }
}

/// LCD configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Panel rotation, 0..=3
    pub rotation: u8,
    /// Backlight on after init
    pub backlight: bool,
    /// SPI baud rate prescaler
    pub spi_prescaler: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rotation: 3,
            backlight: true,
            spi_prescaler: 2,
        }
    }
}

/// Main loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoopConfig {
    /// Delay between frames (ms)
    pub frame_interval_ms: u32,
    /// Joystick sampling period (ms)
    pub tick_interval_ms: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 100,
            tick_interval_ms: 10,
        }
    }
}

/// Menu values at power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MenuDefaults {
    pub unit: TempUnit,
    pub palette: Palette,
    pub offset: i8,
    pub gain: i8,
}

impl MenuDefaults {
    /// Build the menu model with these starting values
    pub fn menu(&self) -> Menu {
        Menu::with_values(self.unit, self.palette, self.offset, self.gain)
    }

    /// Minimum of every item, as the menu starts without a config
    pub fn minimum() -> Self {
        let menu = Menu::new();
        Self {
            unit: menu.unit(),
            palette: menu.palette(),
            offset: menu.offset(),
            gain: menu.gain(),
        }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScopeConfig {
    pub sensor: SensorConfig,
    pub display: DisplayConfig,
    pub timing: LoopConfig,
    pub menu: MenuDefaults,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            sensor: SensorConfig::default(),
            display: DisplayConfig::default(),
            timing: LoopConfig::default(),
            menu: MenuDefaults::minimum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_hardware() {
        let config = ScopeConfig::default();
        assert_eq!(config.sensor.i2c_frequency, 100_000);
        assert_eq!(config.sensor.timeout_iterations, 100_000);
        assert_eq!(config.timing.frame_interval_ms, 100);
        assert_eq!(config.menu.offset, -10);
        assert_eq!(config.menu.gain, 0);
    }

    #[test]
    fn test_frame_rate_hz() {
        assert_eq!(FrameRate::from_hz(10), Some(FrameRate::Hz10));
        assert_eq!(FrameRate::from_hz(1), Some(FrameRate::Hz1));
        assert_eq!(FrameRate::from_hz(5), None);
        assert_eq!(FrameRate::Hz1.hz(), 1);
    }

    #[test]
    fn test_menu_defaults_build_menu() {
        let defaults = MenuDefaults {
            unit: TempUnit::Fahrenheit,
            palette: Palette::Blue,
            offset: 4,
            gain: 2,
        };
        let menu = defaults.menu();
        assert_eq!(menu.unit(), TempUnit::Fahrenheit);
        assert_eq!(menu.palette(), Palette::Blue);
        assert_eq!(menu.offset(), 4);
        assert_eq!(menu.gain(), 2);
    }
}
