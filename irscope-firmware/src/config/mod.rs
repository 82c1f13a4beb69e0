//! Board configuration
//!
//! scope.toml is compiled into the image (validated by build.rs) and
//! parsed at start-up with the `no_std` parser from `irscope-core`.

use defmt::*;

use irscope_core::config::{parse_config, ConfigError, ScopeConfig};
use irscope_hal::i2c::{FastDuty, I2cConfig};
use irscope_hal::spi::{Mode, SpiConfig};

/// Embedded configuration; edit scope.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../scope.toml");

/// Parse the embedded configuration
pub fn load() -> Result<ScopeConfig, ConfigError> {
    let config = parse_config(EMBEDDED_CONFIG)?;

    info!(
        "Sensor: {} Hz bus, {} Hz logic clock, {} polls/phase, {} fps",
        config.sensor.i2c_frequency,
        config.sensor.i2c_logic_clock,
        config.sensor.timeout_iterations,
        config.sensor.frame_rate.hz()
    );
    info!(
        "Display: rotation {}, backlight={}, SPI prescaler {}",
        config.display.rotation, config.display.backlight, config.display.spi_prescaler
    );
    info!(
        "Loop: frame every {} ms, joystick every {} ms",
        config.timing.frame_interval_ms, config.timing.tick_interval_ms
    );

    Ok(config)
}

/// I2C engine settings for the sensor link
pub fn i2c_config(config: &ScopeConfig) -> I2cConfig {
    I2cConfig {
        frequency: config.sensor.i2c_frequency,
        logic_clock: config.sensor.i2c_logic_clock,
        duty: FastDuty::Ratio2,
        timeout_iterations: config.sensor.timeout_iterations,
    }
}

/// SPI settings for the display link
pub fn spi_config(config: &ScopeConfig) -> SpiConfig {
    SpiConfig {
        prescaler: config.display.spi_prescaler,
        mode: Mode::Mode0,
    }
}
