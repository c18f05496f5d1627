//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements       | Connects to                 |
//! |--------------|------------------|-----------------------------|
//! | `indicators` | IndicatorPort    | Alarm / tare / full LEDs    |
//! | `log_sink`   | EventSink        | Serial log output           |
//! | `nvs`        | CalibrationStore | NVS / in-memory blob        |

pub mod indicators;
pub mod log_sink;
pub mod nvs;
