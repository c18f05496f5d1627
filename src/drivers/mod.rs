//! Front-panel input drivers.

pub mod button;
