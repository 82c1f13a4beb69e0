//! IRScope - Thermal Camera Firmware
//!
//! Main firmware binary for an AMG8833 8x8 infrared array on a Blue Pill
//! (STM32F103C8), rendered as a false-color heat map on an 80x160 ST7735
//! LCD with a joystick-driven settings menu.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::spi::{self, Spi};
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use irscope_core::config::ScopeConfig;
use irscope_core::state::State;
use irscope_drivers::bus::{PolledI2c, PolledSpi};
use irscope_drivers::display::{Color565, St7735};
use irscope_drivers::input::Joystick;
use irscope_drivers::sensor::Amg8833;
use irscope_hal::gpio::ActiveLow;
use irscope_hal_stm32f1::{Stm32I2c, Stm32Input, Stm32Output, Stm32Spi};

use crate::controller::Controller;

mod board;
mod config;
mod controller;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("IRScope firmware v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Build: {}", if cfg!(debug_assertions) { "debug" } else { "release" });

    let p = embassy_stm32::init(Default::default());

    // Parse the embedded config; fall back to defaults so the screen can
    // still report the failure
    let (scope, config_ok) = match config::load() {
        Ok(scope) => (scope, true),
        Err(e) => {
            error!("Failed to parse scope.toml: {}", e);
            (ScopeConfig::default(), false)
        }
    };

    // Display: SPI1 (PA5=SCK, PA7=MOSI), control lines on PA1-PA4
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PA5, p.PA7, spi::Config::default());
    let spi = PolledSpi::new(Stm32Spi::new(spi, &config::spi_config(&scope)));

    let mut lcd = St7735::new(
        spi,
        Stm32Output(Output::new(p.PA4, Level::High, Speed::VeryHigh)),
        Stm32Output(Output::new(p.PA3, Level::Low, Speed::VeryHigh)),
        Stm32Output(Output::new(p.PA2, Level::High, Speed::VeryHigh)),
        Stm32Output(Output::new(p.PA1, Level::Low, Speed::Low)),
    );

    let mut delay = Delay;
    lcd.init(&mut delay).ok();
    lcd.set_rotation(scope.display.rotation).ok();
    lcd.fill_screen(Color565::BLACK).ok();
    lcd.set_backlight(scope.display.backlight);
    info!("Display ready: {}x{}", lcd.width(), lcd.height());

    // Sensor: I2C1 (PB6=SCL, PB7=SDA), timing programmed by the polled engine
    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, i2c::Config::default());
    let mut bus = PolledI2c::new(
        Stm32I2c::new(i2c, board::PCLK1_HZ),
        config::i2c_config(&scope),
    );
    bus.init();
    let sensor = Amg8833::new(bus).with_frame_rate(scope.sensor.frame_rate);

    // Joystick: switches to ground on PB12-PB15 and PA8
    let joystick = Joystick::new([
        ActiveLow(Stm32Input(Input::new(p.PB12, Pull::Up))),
        ActiveLow(Stm32Input(Input::new(p.PB13, Pull::Up))),
        ActiveLow(Stm32Input(Input::new(p.PB14, Pull::Up))),
        ActiveLow(Stm32Input(Input::new(p.PB15, Pull::Up))),
        ActiveLow(Stm32Input(Input::new(p.PA8, Pull::Up))),
    ]);

    let mut controller = Controller::new(sensor, lcd, scope.menu.menu());
    controller.announce();
    Timer::after_millis(100).await;

    let state = if config_ok {
        controller.start()
    } else {
        controller.reject_config()
    };

    if let State::Halted(fault) = state {
        error!("Halted: {}", fault);
        loop {
            Timer::after_secs(60).await;
        }
    }

    spawner
        .spawn(tasks::joystick_task(joystick, scope.timing.tick_interval_ms))
        .unwrap();

    info!("Running");

    let frame_interval = Duration::from_millis(scope.timing.frame_interval_ms as u64);
    loop {
        controller.step(tasks::take_presses().nav());
        Timer::after(frame_interval).await;
    }
}
