//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NodeService (domain)
//! ```
//!
//! Driven adapters (indicator LEDs, event sinks, calibration storage)
//! implement these traits. The [`NodeService`](super::service::NodeService)
//! consumes them via generics, so the domain core never touches hardware
//! directly. The load cell itself sits behind
//! [`WeightSource`](crate::sensors::WeightSource).

use serde::{Deserialize, Serialize};

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the front-panel LEDs.
pub trait IndicatorPort {
    /// Water level alarm LED.
    fn set_water_alarm(&mut self, on: bool);

    /// Lit once a tare value is in place.
    fn set_tare_led(&mut self, on: bool);

    /// Lit once a full-bowl value is in place.
    fn set_full_led(&mut self, on: bool);

    /// Everything dark.
    fn all_off(&mut self) {
        self.set_water_alarm(false);
        self.set_tare_led(false);
        self.set_full_led(false);
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`NodeEvent`](super::events::NodeEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::NodeEvent);
}

// ───────────────────────────────────────────────────────────────
// Calibration store (driven adapter: domain ↔ NVS / EEPROM)
// ───────────────────────────────────────────────────────────────

/// Calibration values that survive a power cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredCalibration {
    /// Raw reading of the empty bowl.
    pub tare: f32,
    /// Net reading of the full bowl.
    pub full_scale: f32,
}

impl StoredCalibration {
    /// Neither value may be zero or non-finite.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.tare == 0.0 || !self.tare.is_finite() {
            return Err(StorageError::Invalid("tare must be finite and non-zero"));
        }
        if self.full_scale == 0.0 || !self.full_scale.is_finite() {
            return Err(StorageError::Invalid(
                "full_scale must be finite and non-zero",
            ));
        }
        Ok(())
    }
}

/// Loads and persists the bowl calibration.
///
/// Implementations MUST call [`StoredCalibration::validate`] before
/// persisting and MUST NOT hand back a value that fails it.
pub trait CalibrationStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<StoredCalibration>, StorageError>;

    /// Validate and persist.
    fn save(&mut self, calibration: &StoredCalibration) -> Result<(), StorageError>;

    /// Forget the stored calibration. `Ok(())` if there was none.
    fn clear(&mut self) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`CalibrationStore`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Stored blob failed the version or deserialization check.
    Corrupted,
    /// A value failed validation; describes which and why.
    Invalid(&'static str),
    /// Storage partition is full.
    Full,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from configuration parsing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The provisioning document could not be parsed.
    Malformed,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "stored calibration corrupted"),
            Self::Invalid(msg) => write!(f, "invalid calibration: {}", msg),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Malformed => Self::Config("malformed"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
