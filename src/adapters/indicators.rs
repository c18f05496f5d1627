//! Front-panel LEDs behind [`IndicatorPort`].
//!
//! Three plain GPIO outputs, active high. Pin errors are logged and
//! dropped; a dead LED must not stop the read loop.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::IndicatorPort;

pub struct LedIndicators<A, T, F> {
    alarm: A,
    tare: T,
    full: F,
}

impl<A, T, F> LedIndicators<A, T, F>
where
    A: OutputPin,
    T: OutputPin,
    F: OutputPin,
{
    pub fn new(alarm: A, tare: T, full: F) -> Self {
        Self { alarm, tare, full }
    }

    pub fn release(self) -> (A, T, F) {
        (self.alarm, self.tare, self.full)
    }
}

fn drive(pin: &mut impl OutputPin, on: bool, name: &str) {
    if pin.set_state(PinState::from(on)).is_err() {
        warn!("LedIndicators: failed to drive {} LED", name);
    }
}

impl<A, T, F> IndicatorPort for LedIndicators<A, T, F>
where
    A: OutputPin,
    T: OutputPin,
    F: OutputPin,
{
    fn set_water_alarm(&mut self, on: bool) {
        drive(&mut self.alarm, on, "alarm");
    }

    fn set_tare_led(&mut self, on: bool) {
        drive(&mut self.tare, on, "tare");
    }

    fn set_full_led(&mut self, on: bool) {
        drive(&mut self.full, on, "full");
    }
}
