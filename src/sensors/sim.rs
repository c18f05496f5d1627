//! Scripted load cell for host builds and tests.
//!
//! Plays back a fixed sequence of raw readings. Once the script runs dry
//! the last value is held, which mirrors a bowl that simply stops changing.

use heapless::Deque;

use super::WeightSource;
use crate::error::SensorError;

/// Maximum number of scripted readings.
pub const SCRIPT_CAP: usize = 32;

pub struct SimulatedLoadCell {
    script: Deque<f32, SCRIPT_CAP>,
    last: f32,
    pending_fault: Option<SensorError>,
    prepared: bool,
    last_samples: usize,
    reads: u32,
}

impl SimulatedLoadCell {
    /// A load cell that reports `value` forever.
    pub fn constant(value: f32) -> Self {
        Self {
            script: Deque::new(),
            last: value,
            pending_fault: None,
            prepared: false,
            last_samples: 0,
            reads: 0,
        }
    }

    /// A load cell that plays back `values` in order.
    /// Values beyond [`SCRIPT_CAP`] are dropped.
    pub fn scripted(values: &[f32]) -> Self {
        let mut cell = Self::constant(values.first().copied().unwrap_or(0.0));
        for &v in values {
            if cell.script.push_back(v).is_err() {
                log::warn!("SimulatedLoadCell: script truncated at {} values", SCRIPT_CAP);
                break;
            }
        }
        cell
    }

    /// Replace everything with a constant reading.
    pub fn set(&mut self, value: f32) {
        self.script.clear();
        self.last = value;
    }

    /// Make the next read fail with `fault`.
    pub fn fail_next(&mut self, fault: SensorError) {
        self.pending_fault = Some(fault);
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Sample count passed to the most recent read.
    pub fn last_samples(&self) -> usize {
        self.last_samples
    }

    /// Successful reads served so far.
    pub fn reads(&self) -> u32 {
        self.reads
    }
}

impl WeightSource for SimulatedLoadCell {
    fn prepare(&mut self) -> Result<(), SensorError> {
        self.prepared = true;
        Ok(())
    }

    fn read_units(&mut self, samples: usize) -> Result<f32, SensorError> {
        self.last_samples = samples;
        if let Some(fault) = self.pending_fault.take() {
            return Err(fault);
        }
        if samples == 0 {
            return Err(SensorError::NoSamples);
        }
        if let Some(v) = self.script.pop_front() {
            self.last = v;
        }
        self.reads += 1;
        Ok(self.last)
    }
}
