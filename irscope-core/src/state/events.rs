//! Events that trigger state transitions

use super::machine::FaultKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Sensor bring-up sequence completed
    SensorReady,
    /// Sensor bring-up aborted
    SensorFailed(FaultKind),
    /// One frame could not be read; the frame is skipped
    FrameFailed,
    /// Embedded configuration failed to parse
    ConfigRejected,
}
