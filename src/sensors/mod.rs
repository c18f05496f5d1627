//! Sensor subsystem: the load-cell transport and the calibrated reader.
//!
//! The reader in [`water_level`] only ever sees the narrow [`WeightSource`]
//! capability, so it runs unchanged against the real [`hx711`] driver on
//! the board and against [`sim::SimulatedLoadCell`] on host.

pub mod hx711;
pub mod sim;
pub mod water_level;

use crate::error::SensorError;

/// Averaged raw readings from a weight sensor.
pub trait WeightSource {
    /// Power up / wake the transport so readings can be taken.
    fn prepare(&mut self) -> Result<(), SensorError>;

    /// One reading averaged over `samples` conversions, in sensor units.
    fn read_units(&mut self, samples: usize) -> Result<f32, SensorError>;
}

impl<T: WeightSource + ?Sized> WeightSource for &mut T {
    fn prepare(&mut self) -> Result<(), SensorError> {
        (**self).prepare()
    }

    fn read_units(&mut self, samples: usize) -> Result<f32, SensorError> {
        (**self).read_units(samples)
    }
}
