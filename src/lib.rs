//! KitchenNode firmware library.
//!
//! Exposes the water-bowl reader, its calibration controller and the
//! adapters for integration testing. ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
