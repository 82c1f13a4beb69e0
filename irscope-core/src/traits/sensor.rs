//! Thermal array sensor trait

use crate::thermal::ThermalFrame;

/// An infrared array sensor with an on-chip reference thermistor
///
/// Every call is a complete bus transaction; on error the caller decides
/// whether to skip the frame or give up.
pub trait ThermalSensor {
    /// Error type of the underlying transport
    type Error;

    /// Bring the sensor into continuous measurement
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Read the reference thermistor in sixteenths of a degree Celsius
    fn read_thermistor(&mut self) -> Result<i16, Self::Error>;

    /// Read all array elements into `frame`
    fn read_frame(&mut self, frame: &mut ThermalFrame) -> Result<(), Self::Error>;
}
