//! Inbound commands to the node service.
//!
//! These represent actions requested by the outside world (front-panel
//! buttons, provisioning, a future RPC link) that the
//! [`NodeService`](super::service::NodeService) interprets and acts upon.

use crate::drivers::button::ButtonId;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeCommand {
    /// Sample the empty bowl and use it as the tare.
    CaptureTare,

    /// Sample the full bowl and use its net weight as the full scale.
    /// Marks the reader calibrated on success.
    CaptureFull,

    /// Set the tare directly (e.g. restored from elsewhere).
    SetTare(f32),

    /// Set the full scale directly.
    SetFullScale(f32),

    /// Turn the percentage / low-water logic on or off.
    SetCalibrated(bool),

    /// Persist the current tare and full scale.
    SaveCalibration,

    /// Erase the persisted calibration. The values in use are untouched.
    ForgetCalibration,

    /// Silence the water alarm until the level recovers.
    AcknowledgeAlarm,

    /// Back to factory defaults (stored calibration is kept).
    Reset,
}

impl From<ButtonId> for NodeCommand {
    fn from(button: ButtonId) -> Self {
        match button {
            ButtonId::Tare => Self::CaptureTare,
            ButtonId::Full => Self::CaptureFull,
            ButtonId::Save => Self::SaveCalibration,
            ButtonId::AlarmReset => Self::AcknowledgeAlarm,
        }
    }
}
