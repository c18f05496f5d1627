//! Debounced front-panel calibration buttons.
//!
//! ## Hardware
//!
//! Four active-low momentary switches with pull-ups. The main loop samples
//! their levels every pass and hands them to [`CalibrationButtons::tick`],
//! which runs one debounce state machine per button.
//!
//! | Button       | Command                |
//! |--------------|------------------------|
//! | `Tare`       | capture empty bowl     |
//! | `Full`       | capture full bowl      |
//! | `Save`       | persist calibration    |
//! | `AlarmReset` | silence the water alarm|
//!
//! A press fires once, as soon as the level has been stable for the
//! debounce window. Holding the button does not repeat.

/// Identifies one calibration button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Tare,
    Full,
    Save,
    AlarmReset,
}

impl ButtonId {
    /// Order of the `pressed` array passed to [`CalibrationButtons::tick`].
    pub const ALL: [ButtonId; 4] = [Self::Tare, Self::Full, Self::Save, Self::AlarmReset];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Released,
    DebounceWait { since_ms: u32 },
    /// Press already reported; waiting for release.
    Held,
}

pub struct CalibrationButtons {
    debounce_ms: u32,
    states: [DebounceState; 4],
}

impl CalibrationButtons {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            states: [DebounceState::Released; 4],
        }
    }

    /// Call every main-loop pass with the current levels (`true` = pressed,
    /// in [`ButtonId::ALL`] order). Returns at most one press per call; the
    /// lowest index wins and the others are reported on later calls.
    pub fn tick(&mut self, now_ms: u32, pressed: [bool; 4]) -> Option<ButtonId> {
        let mut fired = None;

        for (i, &down) in pressed.iter().enumerate() {
            let state = &mut self.states[i];
            *state = match (*state, down) {
                (DebounceState::Released, true) => DebounceState::DebounceWait { since_ms: now_ms },
                (DebounceState::DebounceWait { since_ms }, true) => {
                    if now_ms.wrapping_sub(since_ms) >= self.debounce_ms && fired.is_none() {
                        fired = Some(ButtonId::ALL[i]);
                        DebounceState::Held
                    } else {
                        DebounceState::DebounceWait { since_ms }
                    }
                }
                (DebounceState::Held, true) => DebounceState::Held,
                (_, false) => DebounceState::Released,
            };
        }

        fired
    }
}
