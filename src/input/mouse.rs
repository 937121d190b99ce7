use super::ButtonMods;

/// A timestamped pointer position with the buttons and keys held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseState {
    /// Event time in milliseconds.
    pub time: i64,
    /// Horizontal position in pixels.
    pub x: i32,
    /// Vertical position in pixels.
    pub y: i32,
    /// Buttons and modifier keys.
    pub modifiers: ButtonMods,
}

impl MouseState {
    /// Overwrite every field.
    pub fn set(&mut self, time: i64, x: i32, y: i32, modifiers: ButtonMods) {
        *self = Self {
            time,
            x,
            y,
            modifiers,
        };
    }

    /// Copy time and modifiers from `current`, and the position only for the
    /// first click of a sequence. Later clicks keep the original anchor.
    pub fn set_current(&mut self, current: &Self, click_count: i32) {
        self.time = current.time;
        self.modifiers = current.modifiers;
        if click_count < 2 {
            self.x = current.x;
            self.y = current.y;
        }
    }

    /// Whether `(x, y)` lies within `range` pixels on both axes.
    #[must_use]
    pub fn in_range(&self, range: i32, x: i32, y: i32) -> bool {
        (x - self.x).abs() <= range && (y - self.y).abs() <= range
    }

    /// Whether an event at `(x, y)` with `modifiers` at `time` continues this
    /// one: in range, same modifiers, and less than `max_delay_ms` later.
    #[must_use]
    pub fn check(
        &self,
        range: i32,
        x: i32,
        y: i32,
        modifiers: ButtonMods,
        time: i64,
        max_delay_ms: i64,
    ) -> bool {
        self.in_range(range, x, y)
            && self.modifiers == modifiers
            && time.saturating_sub(self.time) < max_delay_ms
    }

    /// Same position and time, ignoring modifiers.
    #[must_use]
    pub fn same_sample(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.time == other.time
    }
}

/// The named pointer snapshots the dispatcher keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseHistory {
    /// Latest event of any kind.
    pub current: MouseState,
    /// Latest move (also carries key-chord modifiers).
    pub moved: MouseState,
    /// Latest click.
    pub clicked: MouseState,
    /// Latest press.
    pub pressed: MouseState,
    /// Latest drag sample.
    pub dragged: MouseState,
}

/// Immutable copy of the current pointer state handed to the hover thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseSnapshot {
    /// Incremented on every pointer update.
    pub seq: u64,
    /// Pointer state at `seq`.
    pub state: MouseState,
    /// Whether the update was a plain move (not a press, drag or click).
    pub is_move: bool,
}
