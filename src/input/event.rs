/// Platform-agnostic input events.
///
/// These are fed into an
/// [`ActionDispatcher`](crate::dispatch::ActionDispatcher) which interprets
/// them against the active binding table and picking mode.
///
/// # Example
///
/// ```ignore
/// dispatcher.handle_event(InputEvent::Pressed {
///     time: 1_000,
///     x: 120,
///     y: 80,
///     count: 1,
///     modifiers: ButtonMods::LEFT,
/// });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer moved with no button held.
    Moved {
        /// Event time in milliseconds.
        time: i64,
        /// Horizontal position in physical pixels.
        x: i32,
        /// Vertical position in physical pixels.
        y: i32,
        /// Modifier keys held.
        modifiers: ButtonMods,
    },
    /// A mouse button went down.
    Pressed {
        /// Event time in milliseconds.
        time: i64,
        /// Horizontal position in physical pixels.
        x: i32,
        /// Vertical position in physical pixels.
        y: i32,
        /// Click count reported by the host (informational).
        count: u32,
        /// Button and modifier keys.
        modifiers: ButtonMods,
    },
    /// Pointer moved with a button held.
    Dragged {
        /// Event time in milliseconds.
        time: i64,
        /// Horizontal position in physical pixels.
        x: i32,
        /// Vertical position in physical pixels.
        y: i32,
        /// Button and modifier keys.
        modifiers: ButtonMods,
    },
    /// A mouse button went up.
    Released {
        /// Event time in milliseconds.
        time: i64,
        /// Horizontal position in physical pixels.
        x: i32,
        /// Vertical position in physical pixels.
        y: i32,
        /// Button and modifier keys.
        modifiers: ButtonMods,
    },
    /// A press/release pair completed without a drag.
    Clicked {
        /// Event time in milliseconds.
        time: i64,
        /// Horizontal position in physical pixels.
        x: i32,
        /// Vertical position in physical pixels.
        y: i32,
        /// Click count reported by the host; values above 1 are trusted.
        count: u32,
        /// Button and modifier keys.
        modifiers: ButtonMods,
    },
    /// Scroll wheel notch(es).
    Wheeled {
        /// Event time in milliseconds.
        time: i64,
        /// Signed wheel rotation in notches.
        rotation: i32,
        /// Modifier keys held.
        modifiers: ButtonMods,
    },
    /// Pointer entered the viewer surface.
    Entered {
        /// Event time in milliseconds.
        time: i64,
        /// Horizontal position in physical pixels.
        x: i32,
        /// Vertical position in physical pixels.
        y: i32,
    },
    /// Pointer left the viewer surface.
    Exited {
        /// Event time in milliseconds.
        time: i64,
        /// Horizontal position in physical pixels.
        x: i32,
        /// Vertical position in physical pixels.
        y: i32,
    },
    /// A key went down.
    KeyDown {
        /// The key.
        key: Key,
        /// Modifier keys held.
        modifiers: ButtonMods,
    },
    /// A key went up.
    KeyUp {
        /// The key.
        key: Key,
    },
}

bitflags::bitflags! {
    /// Mouse button and modifier-key mask.
    ///
    /// `ALT` and `MIDDLE` share a bit: an alt-click on a one-button mouse is
    /// indistinguishable from a middle click. A middle click carries no
    /// `LEFT`/`RIGHT` bit, an alt-click does.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
    pub struct ButtonMods: u32 {
        /// Shift key.
        const SHIFT = 1;
        /// Control key.
        const CTRL = 1 << 1;
        /// Right (secondary) button.
        const RIGHT = 1 << 2;
        /// Alt key.
        const ALT = 1 << 3;
        /// Middle button (same bit as `ALT`).
        const MIDDLE = 1 << 3;
        /// Left (primary) button.
        const LEFT = 1 << 4;
    }
}

impl ButtonMods {
    /// Keyboard modifiers only.
    pub const KEYS: Self = Self::SHIFT.union(Self::CTRL).union(Self::ALT);

    /// Canonicalize a raw host mask, discarding bits outside the layout.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self::from_bits_truncate(raw)
    }

    /// Whether the left or right button is held.
    #[must_use]
    pub const fn has_pointer_button(self) -> bool {
        self.intersects(Self::LEFT.union(Self::RIGHT))
    }
}

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Motion without a held button.
    Moved,
    /// Button down.
    Pressed,
    /// Motion with a held button.
    Dragged,
    /// Button up.
    Released,
    /// Completed click.
    Clicked,
    /// Scroll wheel.
    Wheeled,
}

impl EventKind {
    /// Lowercase name, as substituted for `_MODE` in user scripts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Moved => "moved",
            Self::Pressed => "pressed",
            Self::Dragged => "dragged",
            Self::Released => "released",
            Self::Clicked => "clicked",
            Self::Wheeled => "wheeled",
        }
    }
}

/// Keys the dispatcher reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Alt / Option.
    Alt,
    /// Shift.
    Shift,
    /// Control.
    Control,
    /// Escape.
    Escape,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Space bar.
    Space,
    /// Period.
    Period,
    /// Any other key, by host key code.
    Other(u32),
}

impl Key {
    /// Whether this is one of the four arrow keys.
    #[must_use]
    pub const fn is_arrow(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// Whether navigation mode forwards this key to the viewer.
    #[must_use]
    pub const fn is_navigation(self) -> bool {
        self.is_arrow() || matches!(self, Self::Space | Self::Period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_drops_unknown_bits() {
        let mods = ButtonMods::from_raw(0xFFFF_0000 | 16 | 1);
        assert_eq!(mods, ButtonMods::LEFT | ButtonMods::SHIFT);
    }

    #[test]
    fn alt_and_middle_share_a_bit() {
        assert_eq!(ButtonMods::ALT.bits(), ButtonMods::MIDDLE.bits());
        assert!(!ButtonMods::MIDDLE.has_pointer_button());
        assert!((ButtonMods::ALT | ButtonMods::LEFT).has_pointer_button());
    }

    #[test]
    fn navigation_keys() {
        assert!(Key::Up.is_navigation());
        assert!(Key::Period.is_navigation());
        assert!(!Key::Escape.is_navigation());
        assert!(!Key::Space.is_arrow());
    }
}
