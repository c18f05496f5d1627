//! System configuration parameters
//!
//! All tunable parameters for the KitchenNode water-bowl scale.
//! Values can be overridden at provisioning time from a JSON document.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::sensors::hx711::Gain;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    // --- Timing ---
    /// Interval between load-cell reads (milliseconds)
    pub read_interval_ms: u32,
    /// Emit a telemetry event every N reads
    pub telemetry_every: u32,

    // --- Load cell ---
    /// HX711 counts per reported unit
    pub scale_factor: f32,
    /// HX711 channel / gain
    pub gain: Gain,

    // --- Buttons ---
    /// Level must be stable this long before a press counts (milliseconds)
    pub button_debounce_ms: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            read_interval_ms: 1000, // 1 Hz
            telemetry_every: 10,
            scale_factor: 1.0,
            gain: Gain::A128,
            button_debounce_ms: 50,
        }
    }
}

impl NodeConfig {
    /// Parse a provisioning document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(100..=60_000).contains(&self.read_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "read_interval_ms must be 100–60000",
            ));
        }
        if self.telemetry_every == 0 {
            return Err(ConfigError::ValidationFailed(
                "telemetry_every must be at least 1",
            ));
        }
        if self.scale_factor == 0.0 || !self.scale_factor.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "scale_factor must be finite and non-zero",
            ));
        }
        if !(5..=500).contains(&self.button_debounce_ms) {
            return Err(ConfigError::ValidationFailed(
                "button_debounce_ms must be 5–500",
            ));
        }
        Ok(())
    }
}
