//! Button debounce and press classification.
//!
//! Raw levels are sampled once per loop tick together with a timestamp, so
//! the tracker never reads a clock itself and can be driven from tests.

/// Debounce duration in milliseconds.
pub const DEBOUNCE_MS: u64 = 50;
/// Hold time after which a press counts as long.
pub const LONG_PRESS_MS: u64 = 1000;

/// The three front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Left,
    Ok,
    Right,
}

impl ButtonId {
    pub const ALL: [ButtonId; 3] = [ButtonId::Left, ButtonId::Ok, ButtonId::Right];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Short,
    Long,
}

/// Per-button debounce state with short/long press detection.
#[derive(Debug, Default)]
pub struct ButtonTracker {
    was_pressed: bool,
    last_change: Option<u64>,
    pressed_at: u64,
    long_sent: bool,
}

impl ButtonTracker {
    pub const fn new() -> Self {
        Self {
            was_pressed: false,
            last_change: None,
            pressed_at: 0,
            long_sent: false,
        }
    }

    /// Feed one sample. Buttons are active-low, so `is_low` means pressed.
    ///
    /// Returns `Short` on a release before [`LONG_PRESS_MS`], and `Long`
    /// once while the button is still held past it.
    pub fn sample(&mut self, is_low: bool, now_ms: u64) -> Option<ButtonState> {
        if is_low != self.was_pressed {
            if let Some(last) = self.last_change
                && now_ms.saturating_sub(last) < DEBOUNCE_MS
            {
                return None;
            }

            self.was_pressed = is_low;
            self.last_change = Some(now_ms);

            if is_low {
                self.pressed_at = now_ms;
                self.long_sent = false;
                return None;
            }
            return (!self.long_sent).then_some(ButtonState::Short);
        }

        if self.was_pressed
            && !self.long_sent
            && now_ms.saturating_sub(self.pressed_at) >= LONG_PRESS_MS
        {
            self.long_sent = true;
            return Some(ButtonState::Long);
        }
        None
    }
}
