//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured node events to the
//! ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::NodeEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`NodeEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &NodeEvent) {
        match event {
            NodeEvent::Reading(t) => {
                info!("TELEM | {}", t.to_json());
            }
            NodeEvent::Started { calibrated } => {
                info!("START | calibrated={}", calibrated);
            }
            NodeEvent::LowLevel { remaining_percent } => {
                warn!("LEVEL | low, {:.1}% remaining", remaining_percent);
            }
            NodeEvent::LevelRestored { remaining_percent } => {
                info!("LEVEL | restored, {:.1}% remaining", remaining_percent);
            }
            NodeEvent::TareCaptured(tare) => {
                info!("CALIB | tare={:.1}", tare);
            }
            NodeEvent::FullScaleCaptured(full) => {
                info!("CALIB | full_scale={:.1}", full);
            }
            NodeEvent::CalibrationChanged(on) => {
                info!("CALIB | calibrated={}", on);
            }
            NodeEvent::CalibrationRejected(reason) => {
                warn!("CALIB | rejected: {}", reason);
            }
            NodeEvent::CalibrationSaved => {
                info!("STORE | calibration saved");
            }
            NodeEvent::CalibrationSaveFailed(e) => {
                warn!("STORE | save failed: {}", e);
            }
            NodeEvent::CalibrationForgotten => {
                info!("STORE | calibration erased");
            }
            NodeEvent::AlarmAcknowledged => {
                info!("ALARM | acknowledged");
            }
        }
    }
}
