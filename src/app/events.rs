//! Outbound application events.
//!
//! The [`NodeService`](super::service::NodeService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them: log to serial, forward to the
//! control centre, etc.

use serde::Serialize;

use super::ports::StorageError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEvent {
    /// The service has started.
    Started { calibrated: bool },

    /// Periodic reading snapshot.
    Reading(ReadingTelemetry),

    /// Remaining water dropped to the low threshold.
    LowLevel { remaining_percent: f32 },

    /// Remaining water rose back above the low threshold.
    LevelRestored { remaining_percent: f32 },

    /// A new tare was sampled.
    TareCaptured(f32),

    /// A new full scale was sampled.
    FullScaleCaptured(f32),

    /// The calibrated flag changed.
    CalibrationChanged(bool),

    /// A calibration step was refused.
    CalibrationRejected(&'static str),

    /// Calibration written to persistent storage.
    CalibrationSaved,

    /// Calibration could not be written.
    CalibrationSaveFailed(StorageError),

    /// Persisted calibration erased.
    CalibrationForgotten,

    /// The alarm LED was silenced by the user.
    AlarmAcknowledged,
}

/// A point-in-time reading snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadingTelemetry {
    pub tick: u64,
    pub net_weight: f32,
    pub remaining_percent: f32,
    pub is_low: bool,
    pub calibrated: bool,
}

impl ReadingTelemetry {
    /// Compact JSON body for the control centre.
    pub fn to_json(&self) -> String {
        // Plain struct of numbers and bools; serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
