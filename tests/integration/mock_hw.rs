//! Mock adapters for integration tests.
//!
//! Records every indicator call and emitted event so tests can assert on
//! the full history without touching real GPIO or flash.

use kitchennode::app::events::NodeEvent;
use kitchennode::app::ports::{
    CalibrationStore, EventSink, IndicatorPort, StorageError, StoredCalibration,
};

// ── Indicator call record ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedCall {
    Alarm(bool),
    Tare(bool),
    Full(bool),
}

// ── MockIndicators ────────────────────────────────────────────

#[derive(Default)]
pub struct MockIndicators {
    pub calls: Vec<LedCall>,
}

#[allow(dead_code)]
impl MockIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    fn last(&self, pick: fn(&LedCall) -> Option<bool>) -> bool {
        self.calls.iter().rev().find_map(pick).unwrap_or(false)
    }

    pub fn alarm_on(&self) -> bool {
        self.last(|c| match c {
            LedCall::Alarm(on) => Some(*on),
            _ => None,
        })
    }

    pub fn tare_on(&self) -> bool {
        self.last(|c| match c {
            LedCall::Tare(on) => Some(*on),
            _ => None,
        })
    }

    pub fn full_on(&self) -> bool {
        self.last(|c| match c {
            LedCall::Full(on) => Some(*on),
            _ => None,
        })
    }
}

impl IndicatorPort for MockIndicators {
    fn set_water_alarm(&mut self, on: bool) {
        self.calls.push(LedCall::Alarm(on));
    }

    fn set_tare_led(&mut self, on: bool) {
        self.calls.push(LedCall::Tare(on));
    }

    fn set_full_led(&mut self, on: bool) {
        self.calls.push(LedCall::Full(on));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<NodeEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &NodeEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&NodeEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &NodeEvent) {
        self.events.push(event.clone());
    }
}

// ── MemStore ──────────────────────────────────────────────────

/// In-memory [`CalibrationStore`] with switchable failure modes.
#[derive(Default)]
pub struct MemStore {
    pub saved: Option<StoredCalibration>,
    pub fail_load: Option<StorageError>,
    pub fail_save: Option<StorageError>,
    pub saves: u32,
}

#[allow(dead_code)]
impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(calibration: StoredCalibration) -> Self {
        Self {
            saved: Some(calibration),
            ..Self::default()
        }
    }
}

impl CalibrationStore for MemStore {
    fn load(&self) -> Result<Option<StoredCalibration>, StorageError> {
        match self.fail_load {
            Some(e) => Err(e),
            None => Ok(self.saved),
        }
    }

    fn save(&mut self, calibration: &StoredCalibration) -> Result<(), StorageError> {
        if let Some(e) = self.fail_save {
            return Err(e);
        }
        calibration.validate()?;
        self.saved = Some(*calibration);
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.saved = None;
        Ok(())
    }
}
