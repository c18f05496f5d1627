//! Unified error types for the KitchenNode firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! command handling in [`NodeService`](crate::app::service::NodeService)
//! uniform. All variants are `Copy` so they can be passed around without
//! allocation.

use core::fmt;

use crate::app::ports::StorageError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The load cell could not be read.
    Sensor(SensorError),
    /// The calibration store failed.
    Storage(StorageError),
    /// A calibration step was refused.
    Calibration(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Calibration(msg) => write!(f, "calibration: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The ADC never signalled a finished conversion.
    NotReady,
    /// A GPIO read or write returned an error.
    Pin,
    /// An averaged read was requested over zero samples.
    NoSamples,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "ADC conversion timed out"),
            Self::Pin => write!(f, "GPIO access failed"),
            Self::NoSamples => write!(f, "zero samples requested"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
