//! Load-cell water level of the bowl.
//!
//! The bowl sits on a load cell. A raw reading minus the *tare* (empty
//! bowl) gives the net water weight; dividing by the *full scale* (net
//! weight of a full bowl) gives the remaining percentage. Readings are cut
//! to one decimal, the noise floor of the sensor.
//!
//! ## Calibration gating
//!
//! Until an external controller calls [`WaterLevel::set_calibrated`], only
//! the net weight is produced; the percentage and the low-water flag keep
//! whatever they held before. The percentage is only ever computed through
//! a [`PercentBasis`], which cannot carry a zero full scale, so a
//! calibrated-but-empty full scale skips the percentage step instead of
//! dividing by zero.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::WeightSource;
use crate::error::SensorError;

/// Conversions averaged by the transport for every reading.
pub const SCALE_SAMPLES: usize = 10;

/// At or below this remaining percentage the bowl is low.
pub const LOW_LEVEL_PERCENT: f32 = 10.0;

/// Cut `value` to one decimal, toward zero (`-0.37` becomes `-0.3`).
pub fn truncate1(value: f32) -> f32 {
    (value * 10.0).trunc() / 10.0
}

/// Tare / full-scale pair set by the calibration controller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationState {
    /// Raw reading of the empty bowl.
    pub tare: f32,
    /// Net reading (raw - tare) of the full bowl.
    pub full_scale: f32,
    pub calibrated: bool,
}

impl CalibrationState {
    /// The percentage denominator, when calibrated with a usable full scale.
    pub fn basis(&self) -> Option<PercentBasis> {
        if self.calibrated {
            PercentBasis::new(self.full_scale)
        } else {
            None
        }
    }
}

/// A full-scale value that is finite and non-zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentBasis(f32);

impl PercentBasis {
    pub fn new(full_scale: f32) -> Option<Self> {
        (full_scale != 0.0 && full_scale.is_finite()).then_some(Self(full_scale))
    }

    /// Remaining percentage of `net_weight`, truncated to one decimal.
    pub fn percent_of(self, net_weight: f32) -> f32 {
        truncate1(net_weight * 100.0 / self.0)
    }
}

/// Values derived on the latest read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadingState {
    pub net_weight: f32,
    pub remaining_percent: f32,
    pub is_low: bool,
}

pub struct WaterLevel<S> {
    source: S,
    calibration: CalibrationState,
    reading: ReadingState,
    /// Set once the "calibrated without full scale" warning has been logged.
    basis_warned: bool,
}

impl<S: WeightSource> WaterLevel<S> {
    /// Wrap `source` with default calibration. Call [`initialize`](Self::initialize)
    /// before the first read to wake the transport.
    pub fn new(source: S) -> Self {
        Self {
            source,
            calibration: CalibrationState::default(),
            reading: ReadingState::default(),
            basis_warned: false,
        }
    }

    /// Reset calibration and readings to defaults and wake the transport.
    pub fn initialize(&mut self) {
        self.calibration = CalibrationState::default();
        self.reading = ReadingState::default();
        self.basis_warned = false;
        if let Err(e) = self.source.prepare() {
            warn!("WaterLevel: sensor transport not ready: {}", e);
        }
    }

    pub fn set_tare(&mut self, value: f32) {
        self.calibration.tare = value;
    }

    /// A zero full scale is accepted here; percentages stay frozen while it
    /// is in effect.
    pub fn set_full_scale(&mut self, value: f32) {
        self.calibration.full_scale = value;
        self.basis_warned = false;
    }

    pub fn set_calibrated(&mut self, flag: bool) {
        self.calibration.calibrated = flag;
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.calibrated
    }

    pub fn calibration(&self) -> &CalibrationState {
        &self.calibration
    }

    pub fn reading(&self) -> &ReadingState {
        &self.reading
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// One averaged raw reading, leaving all state untouched.
    pub fn sample_raw(&mut self) -> Result<f32, SensorError> {
        self.source.read_units(SCALE_SAMPLES)
    }

    /// Take a reading and update the derived state. Returns the net weight.
    ///
    /// A transport failure is logged and the previous net weight returned.
    pub fn read(&mut self) -> f32 {
        match self.sample_raw() {
            Ok(raw) => self.update(raw),
            Err(e) => {
                warn!("WaterLevel: read failed ({}), keeping last reading", e);
                self.reading.net_weight
            }
        }
    }

    fn update(&mut self, raw: f32) -> f32 {
        let net_weight = truncate1(raw - self.calibration.tare);
        self.reading.net_weight = net_weight;

        if self.calibration.calibrated {
            match self.calibration.basis() {
                Some(basis) => {
                    let percent = basis.percent_of(net_weight);
                    self.reading.remaining_percent = percent;
                    self.reading.is_low = percent <= LOW_LEVEL_PERCENT;
                }
                None if !self.basis_warned => {
                    warn!(
                        "WaterLevel: calibrated with unusable full scale {}, percentage not updated",
                        self.calibration.full_scale
                    );
                    self.basis_warned = true;
                }
                None => {}
            }
        }

        debug!(
            "WaterLevel: raw={} net={} pct={} low={}",
            raw, net_weight, self.reading.remaining_percent, self.reading.is_low
        );
        net_weight
    }
}
