//! GPIO pin assignments for the KitchenNode bowl board (ESP32-S3).
//!
//! Single source of truth: `main.rs` takes every pin through these numbers
//! rather than hard-coding them.

// ---------------------------------------------------------------------------
// Load cell amplifier (HX711)
// ---------------------------------------------------------------------------

/// HX711 data out. Driven low by the chip when a conversion is ready.
pub const HX711_DOUT_GPIO: i32 = 4;
/// HX711 serial clock. Held high for > 60 µs to power the chip down.
pub const HX711_SCK_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Indicator LEDs (active HIGH)
// ---------------------------------------------------------------------------

/// Low-water alarm.
pub const LED_ALARM_GPIO: i32 = 6;
/// Lit once the empty-bowl tare has been captured.
pub const LED_TARE_GPIO: i32 = 7;
/// Lit once the full-bowl reference has been captured.
pub const LED_FULL_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Calibration buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

pub const BUTTON_TARE_GPIO: i32 = 16;
pub const BUTTON_FULL_GPIO: i32 = 17;
pub const BUTTON_SAVE_GPIO: i32 = 18;
pub const BUTTON_ALARM_RESET_GPIO: i32 = 8;
