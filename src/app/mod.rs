//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the water-bowl scale:
//! driving the calibrated reader, the calibration procedure, the low-water
//! alarm and persistence of the calibration. All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
