//! State machine definition

use super::events::Event;

/// Application states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Power-on: display up, sensor being initialized
    Boot,
    /// Sampling and rendering frames
    Running,
    /// Fault detected; nothing further is done
    Halted(FaultKind),
}

/// Reasons the application can halt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultKind {
    /// Sensor did not acknowledge its bring-up sequence
    SensorInit,
    /// Configuration could not be loaded
    Config,
}

impl State {
    /// Whether frames should be sampled in this state
    pub fn is_running(&self) -> bool {
        matches!(self, State::Running)
    }

    /// Whether this state is a halt
    pub fn is_halted(&self) -> bool {
        matches!(self, State::Halted(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (Boot, SensorReady) => Running,
            (Boot, SensorFailed(kind)) => Halted(kind),
            (Boot, ConfigRejected) => Halted(FaultKind::Config),

            // A bad frame is dropped, sampling continues
            (Running, FrameFailed) => Running,

            // Halted is terminal
            _ => self,
        }
    }
}
