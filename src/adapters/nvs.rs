//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`CalibrationStore`] for the bowl calibration.
//!
//! - Validation: both values are checked before persistence and after load.
//! - Format: one version byte followed by the postcard encoding of
//!   [`StoredCalibration`]. Unknown versions load as corrupted.
//! - Atomic writes: ESP-IDF NVS commits are atomic per `set_blob`.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: a blob in the `kitchen` namespace of the default partition.
//! On host/test: an in-memory blob, lost when the adapter is dropped.

use log::{info, warn};

use crate::app::ports::{CalibrationStore, StorageError, StoredCalibration};

#[cfg(feature = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

#[cfg(feature = "espidf")]
const NAMESPACE: &str = "kitchen";
#[cfg(feature = "espidf")]
const CALIBRATION_KEY: &str = "bowlcal";

const FORMAT_VERSION: u8 = 1;
/// Upper bound on an encoded blob (version byte + two varint-free f32s).
pub const MAX_BLOB_SIZE: usize = 16;

/// Serialise `calibration` into the stored blob format.
pub fn encode(calibration: &StoredCalibration) -> Result<Vec<u8>, StorageError> {
    calibration.validate()?;
    let body = postcard::to_allocvec(calibration).map_err(|_| StorageError::IoError)?;
    let mut blob = Vec::with_capacity(body.len() + 1);
    blob.push(FORMAT_VERSION);
    blob.extend_from_slice(&body);
    Ok(blob)
}

/// Parse a stored blob. Anything that does not decode to a valid
/// calibration is [`StorageError::Corrupted`].
pub fn decode(blob: &[u8]) -> Result<StoredCalibration, StorageError> {
    let (&version, body) = blob.split_first().ok_or(StorageError::Corrupted)?;
    if version != FORMAT_VERSION {
        return Err(StorageError::Corrupted);
    }
    let calibration: StoredCalibration =
        postcard::from_bytes(body).map_err(|_| StorageError::Corrupted)?;
    calibration.validate().map_err(|_| StorageError::Corrupted)?;
    Ok(calibration)
}

pub struct NvsCalibrationStore {
    #[cfg(not(feature = "espidf"))]
    blob: Option<Vec<u8>>,
    #[cfg(feature = "espidf")]
    nvs: EspNvs<NvsDefault>,
}

#[cfg(not(feature = "espidf"))]
impl NvsCalibrationStore {
    pub fn new() -> Self {
        info!("NvsCalibrationStore: simulation backend");
        Self { blob: None }
    }

    /// Overwrite the raw blob (host only, for corruption tests).
    pub fn sim_set_blob(&mut self, bytes: &[u8]) {
        self.blob = Some(bytes.to_vec());
    }
}

#[cfg(not(feature = "espidf"))]
impl Default for NvsCalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "espidf")]
impl NvsCalibrationStore {
    /// Open the calibration namespace on the default NVS partition.
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, StorageError> {
        let nvs = EspNvs::new(partition, NAMESPACE, true).map_err(|e| {
            warn!("NvsCalibrationStore: open failed: {}", e);
            StorageError::IoError
        })?;
        info!("NvsCalibrationStore: ESP-IDF NVS namespace '{}' open", NAMESPACE);
        Ok(Self { nvs })
    }
}

impl CalibrationStore for NvsCalibrationStore {
    fn load(&self) -> Result<Option<StoredCalibration>, StorageError> {
        #[cfg(not(feature = "espidf"))]
        let bytes = self.blob.clone();

        #[cfg(feature = "espidf")]
        let bytes = {
            let mut buf = [0u8; MAX_BLOB_SIZE];
            self.nvs
                .get_blob(CALIBRATION_KEY, &mut buf)
                .map_err(|e| {
                    warn!("NvsCalibrationStore: read failed: {}", e);
                    StorageError::IoError
                })?
                .map(<[u8]>::to_vec)
        };

        match bytes {
            Some(blob) => {
                let calibration = decode(&blob).inspect_err(|_| {
                    warn!("NvsCalibrationStore: stored blob corrupted ({} bytes)", blob.len());
                })?;
                info!("NvsCalibrationStore: loaded calibration");
                Ok(Some(calibration))
            }
            None => Ok(None),
        }
    }

    fn save(&mut self, calibration: &StoredCalibration) -> Result<(), StorageError> {
        let blob = encode(calibration)?;
        if blob.len() > MAX_BLOB_SIZE {
            return Err(StorageError::Full);
        }

        #[cfg(not(feature = "espidf"))]
        {
            self.blob = Some(blob);
            info!("NvsCalibrationStore: calibration saved (simulation)");
        }

        #[cfg(feature = "espidf")]
        {
            self.nvs.set_blob(CALIBRATION_KEY, &blob).map_err(|e| {
                warn!("NvsCalibrationStore: write failed: {}", e);
                StorageError::IoError
            })?;
            info!("NvsCalibrationStore: calibration saved ({} bytes)", blob.len());
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        #[cfg(not(feature = "espidf"))]
        {
            self.blob = None;
        }

        #[cfg(feature = "espidf")]
        {
            self.nvs.remove(CALIBRATION_KEY).map_err(|e| {
                warn!("NvsCalibrationStore: erase failed: {}", e);
                StorageError::IoError
            })?;
        }

        info!("NvsCalibrationStore: calibration cleared");
        Ok(())
    }
}
