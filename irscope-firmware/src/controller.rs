//! Application controller
//!
//! Owns the sensor, the screen and the menu model, and steps them through
//! bring-up and the per-frame loop. State changes go through the core
//! state machine:
//!
//! - Boot → Running when the sensor accepts its bring-up sequence
//! - Boot → Halted on a sensor or configuration failure
//! - Running stays Running when a frame cannot be read; that frame is
//!   skipped and the menu keeps responding

use defmt::*;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use irscope_core::menu::{Menu, NavPresses, Redraw};
use irscope_core::state::{Event, FaultKind, State};
use irscope_core::thermal::ThermalFrame;
use irscope_core::traits::ThermalSensor;
use irscope_drivers::ui;

/// Bring-up banner
const MSG_INITIALIZING: &str = "Initializing Sensor";
/// Sensor bring-up failure
const MSG_SENSOR_FAILED: &str = "  IR Sensor failed  ";
/// Embedded configuration rejected
const MSG_CONFIG_INVALID: &str = "  Config invalid  ";

pub struct Controller<S, D> {
    sensor: S,
    screen: D,
    menu: Menu,
    state: State,
    frame: ThermalFrame,
}

impl<S, D> Controller<S, D>
where
    S: ThermalSensor,
    S::Error: Format,
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(sensor: S, screen: D, menu: Menu) -> Self {
        Self {
            sensor,
            screen,
            menu,
            state: State::Boot,
            frame: ThermalFrame::new(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn apply(&mut self, event: Event) -> State {
        let next = self.state.transition(event);
        if next != self.state {
            debug!("State {} -> {}", self.state, next);
        }
        self.state = next;
        next
    }

    /// Show the bring-up message
    pub fn announce(&mut self) {
        ui::show_message(&mut self.screen, MSG_INITIALIZING, Rgb565::WHITE).ok();
    }

    /// Halt because the embedded configuration could not be used
    pub fn reject_config(&mut self) -> State {
        ui::show_message(&mut self.screen, MSG_CONFIG_INVALID, Rgb565::RED).ok();
        self.apply(Event::ConfigRejected)
    }

    /// Bring up the sensor; on success clear the screen and draw the menu
    pub fn start(&mut self) -> State {
        match self.sensor.init() {
            Ok(()) => {
                info!("Initialized IR sensor");
                self.screen.clear(Rgb565::BLACK).ok();
                let all = Redraw::all(self.menu.selected());
                ui::draw_menu(&mut self.screen, &self.menu, &all).ok();
                info!("Initialized menu");
                self.apply(Event::SensorReady)
            }
            Err(e) => {
                error!("IR sensor init failed: {}... halting", e);
                ui::show_message(&mut self.screen, MSG_SENSOR_FAILED, Rgb565::RED).ok();
                self.apply(Event::SensorFailed(FaultKind::SensorInit))
            }
        }
    }

    /// One pass of the main loop: readouts, heat map, then the menu
    pub fn step(&mut self, presses: NavPresses) {
        if !self.state.is_running() {
            return;
        }

        let unit = self.menu.unit();

        match self.sensor.read_thermistor() {
            Ok(sixteenths) => {
                ui::draw_thermistor(&mut self.screen, sixteenths, unit).ok();
            }
            Err(e) => {
                warn!("Thermistor read failed: {}", e);
                self.apply(Event::FrameFailed);
            }
        }

        match self.sensor.read_frame(&mut self.frame) {
            Ok(()) => {
                ui::draw_center(&mut self.screen, self.frame.center(), unit).ok();
                ui::draw_heatmap(
                    &mut self.screen,
                    &self.frame,
                    self.menu.palette(),
                    self.menu.offset(),
                    self.menu.gain(),
                )
                .ok();
            }
            Err(e) => {
                warn!("Frame read failed, skipping: {}", e);
                self.apply(Event::FrameFailed);
            }
        }

        let redraw = self.menu.process(presses);
        if !redraw.is_empty() {
            trace!("Menu redraw: {}", redraw);
            ui::draw_menu(&mut self.screen, &self.menu, &redraw).ok();
        }
    }
}
