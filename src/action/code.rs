//! Canonical integer encoding of (click count, button mask, event kind).
//!
//! Layout of the packed value:
//!
//! | bits   | meaning                                                  |
//! |--------|----------------------------------------------------------|
//! | 0..=4  | [`ButtonMods`]: SHIFT=1, CTRL=2, RIGHT=4, ALT/MIDDLE=8, LEFT=16 |
//! | 5      | WHEEL                                                    |
//! | 8..=9  | click count: 1 single, 2 double, 0 none                  |
//! | 12..=15| event kind: DOWN=1, DRAG=2, UP=4, CLICK=8 (none = moved) |
//!
//! The layout is stable: user bindings are stored and exported by
//! descriptor, and descriptors are re-parsed into these codes.

use std::fmt;
use std::str::FromStr;

use crate::error::InteractError;
use crate::input::{ButtonMods, EventKind};

const MODS_MASK: u32 = 0b1_1111;
const WHEEL: u32 = 1 << 5;
const COUNT_SHIFT: u32 = 8;
const COUNT_MASK: u32 = 0b11 << COUNT_SHIFT;
const DOWN: u32 = 1 << 12;
const DRAG: u32 = 2 << 12;
const UP: u32 = 4 << 12;
const CLICK: u32 = 8 << 12;
const KIND_MASK: u32 = 0xF << 12;
const LAYOUT_MASK: u32 = MODS_MASK | WHEEL | COUNT_MASK | KIND_MASK;

/// Highest click count the layout distinguishes; larger counts clamp.
pub const MAX_CLICK_COUNT: u32 = 2;

/// Packed mouse action key.
///
/// Two codes are equal iff click count, button mask and event kind all
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ActionCode(u32);

impl ActionCode {
    /// The empty code: no button, no count, moved.
    pub const NONE: Self = Self(0);

    /// Build a code, rejecting impossible input.
    ///
    /// Click counts above [`MAX_CLICK_COUNT`] clamp to a double click.
    ///
    /// # Errors
    ///
    /// Returns [`InteractError::InvalidActionCode`] for a negative count.
    pub fn new(
        click_count: i32,
        modifiers: ButtonMods,
        kind: EventKind,
    ) -> Result<Self, InteractError> {
        if click_count < 0 {
            return Err(InteractError::InvalidActionCode(format!(
                "negative click count {click_count}"
            )));
        }
        Ok(Self::of(click_count as u32, modifiers, kind))
    }

    /// Infallible constructor for counts that are already non-negative.
    #[must_use]
    pub const fn of(click_count: u32, modifiers: ButtonMods, kind: EventKind) -> Self {
        let count = if click_count > MAX_CLICK_COUNT {
            MAX_CLICK_COUNT
        } else {
            click_count
        };
        let kind_bits = match kind {
            EventKind::Moved => 0,
            EventKind::Pressed => DOWN,
            EventKind::Dragged => DRAG,
            EventKind::Released => UP,
            EventKind::Clicked => CLICK,
            EventKind::Wheeled => WHEEL,
        };
        Self((modifiers.bits() & MODS_MASK) | (count << COUNT_SHIFT) | kind_bits)
    }

    /// Re-validate a packed value, e.g. one handed back by a host veto hook.
    ///
    /// # Errors
    ///
    /// Returns [`InteractError::InvalidActionCode`] if bits outside the
    /// layout are set, more than one kind bit is set, or the wheel bit is
    /// combined with a kind bit.
    pub fn from_bits(bits: u32) -> Result<Self, InteractError> {
        let kind = bits & KIND_MASK;
        let valid = bits & !LAYOUT_MASK == 0
            && kind.count_ones() <= 1
            && !(kind != 0 && bits & WHEEL != 0);
        if valid {
            Ok(Self(bits))
        } else {
            Err(InteractError::InvalidActionCode(format!("0x{bits:x}")))
        }
    }

    /// The packed value.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Button and modifier mask.
    #[must_use]
    pub const fn button_mods(self) -> ButtonMods {
        ButtonMods::from_bits_truncate(self.0 & MODS_MASK)
    }

    /// Click count, 0..=2.
    #[must_use]
    pub const fn click_count(self) -> u32 {
        (self.0 & COUNT_MASK) >> COUNT_SHIFT
    }

    /// Event kind.
    #[must_use]
    pub const fn event_kind(self) -> EventKind {
        if self.0 & WHEEL != 0 {
            return EventKind::Wheeled;
        }
        match self.0 & KIND_MASK {
            DOWN => EventKind::Pressed,
            DRAG => EventKind::Dragged,
            UP => EventKind::Released,
            CLICK => EventKind::Clicked,
            _ => EventKind::Moved,
        }
    }

    /// Unpack into `(click_count, modifiers, kind)`.
    #[must_use]
    pub const fn decode(self) -> (u32, ButtonMods, EventKind) {
        (self.click_count(), self.button_mods(), self.event_kind())
    }

    /// Same count and mask, different event kind.
    #[must_use]
    pub const fn with_kind(self, kind: EventKind) -> Self {
        Self::of(self.click_count(), self.button_mods(), kind)
    }

    /// Human-readable descriptor such as `CTRL+SHIFT+LEFT+double+drag`.
    #[must_use]
    pub fn describe(self) -> String {
        if self == Self::NONE {
            return "NONE".to_owned();
        }
        let mods = self.button_mods();
        let kind = self.event_kind();
        let mut parts: Vec<&str> = Vec::with_capacity(6);
        if mods.contains(ButtonMods::CTRL) {
            parts.push("CTRL");
        }
        if mods.contains(ButtonMods::ALT) && mods.has_pointer_button() {
            parts.push("ALT");
        }
        if mods.contains(ButtonMods::SHIFT) {
            parts.push("SHIFT");
        }
        match self.button() {
            Button::Left => parts.push("LEFT"),
            Button::Middle => parts.push("MIDDLE"),
            Button::Right => parts.push("RIGHT"),
            Button::Wheel => parts.push("WHEEL"),
            Button::None => {}
        }
        if self.click_count() == MAX_CLICK_COUNT {
            parts.push("double");
        }
        match kind {
            EventKind::Pressed => parts.push("down"),
            EventKind::Dragged => parts.push("drag"),
            EventKind::Released => parts.push("up"),
            EventKind::Clicked => parts.push("click"),
            EventKind::Moved | EventKind::Wheeled => {}
        }
        parts.join("+")
    }

    /// Parse a descriptor by case-insensitive keyword match.
    ///
    /// Recognized keywords: `MIDDLE`, `RIGHT`, `WHEEL` (default `LEFT`);
    /// `DOWN`/`PRESS`, `DRAG`, `UP`/`RELEASE` (default click); `DOUBLE`
    /// (default single); `ALT`, `CTRL`, `SHIFT`. Any separator works, so
    /// `"double-click,left,dragged"` and `"LEFT+double+drag"` are the same.
    ///
    /// # Errors
    ///
    /// Returns [`InteractError::InvalidActionCode`] for an empty descriptor.
    pub fn parse(descriptor: &str) -> Result<Self, InteractError> {
        let desc = descriptor.trim().to_uppercase();
        if desc.is_empty() {
            return Err(InteractError::InvalidActionCode(
                "empty descriptor".to_owned(),
            ));
        }
        let mut mods = ButtonMods::empty();
        let is_wheel = desc.contains("WHEEL");
        if desc.contains("MIDDLE") {
            mods |= ButtonMods::MIDDLE;
        } else if desc.contains("RIGHT") {
            mods |= ButtonMods::RIGHT;
        } else if !is_wheel {
            mods |= ButtonMods::LEFT;
        }
        let kind = if is_wheel {
            EventKind::Wheeled
        } else if desc.contains("DOWN") || desc.contains("PRESS") {
            EventKind::Pressed
        } else if desc.contains("DRAG") {
            EventKind::Dragged
        } else if desc.contains("UP") || desc.contains("RELEASE") {
            EventKind::Released
        } else {
            EventKind::Clicked
        };
        let count = if desc.contains("DOUBLE") { 2 } else { 1 };
        if desc.contains("ALT") {
            mods |= ButtonMods::ALT;
        }
        if desc.contains("CTRL") {
            mods |= ButtonMods::CTRL;
        }
        if desc.contains("SHIFT") {
            mods |= ButtonMods::SHIFT;
        }
        Ok(Self::of(count, mods, kind))
    }

    /// Ordering key that groups codes by button, then kind, then count.
    pub(crate) fn sort_key(self) -> (u8, u32, u32, u32) {
        (
            self.button() as u8,
            self.0 & KIND_MASK,
            self.click_count(),
            self.button_mods().bits(),
        )
    }

    fn button(self) -> Button {
        let mods = self.button_mods();
        if self.0 & WHEEL != 0 {
            Button::Wheel
        } else if mods.contains(ButtonMods::LEFT) {
            Button::Left
        } else if mods.contains(ButtonMods::RIGHT) {
            Button::Right
        } else if mods.contains(ButtonMods::MIDDLE) {
            Button::Middle
        } else {
            Button::None
        }
    }
}

#[derive(Clone, Copy)]
enum Button {
    Left,
    Middle,
    Right,
    Wheel,
    None,
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl FromStr for ActionCode {
    type Err = InteractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [EventKind; 6] = [
        EventKind::Moved,
        EventKind::Pressed,
        EventKind::Dragged,
        EventKind::Released,
        EventKind::Clicked,
        EventKind::Wheeled,
    ];

    #[test]
    fn encode_decode_is_exact() {
        for count in 0..=MAX_CLICK_COUNT {
            for raw in 0..32 {
                let mods = ButtonMods::from_raw(raw);
                for kind in KINDS {
                    let code = ActionCode::of(count, mods, kind);
                    assert_eq!(code.decode(), (count, mods, kind));
                }
            }
        }
    }

    #[test]
    fn left_click_decodes_to_left() {
        let code = ActionCode::new(1, ButtonMods::LEFT, EventKind::Clicked)
            .unwrap();
        assert_eq!(code.button_mods(), ButtonMods::LEFT);
    }

    #[test]
    fn negative_count_is_rejected() {
        let err = ActionCode::new(-1, ButtonMods::LEFT, EventKind::Clicked);
        assert!(matches!(err, Err(InteractError::InvalidActionCode(_))));
    }

    #[test]
    fn triple_click_clamps_to_double() {
        let triple = ActionCode::of(3, ButtonMods::LEFT, EventKind::Clicked);
        let double = ActionCode::of(2, ButtonMods::LEFT, EventKind::Clicked);
        assert_eq!(triple, double);
    }

    #[test]
    fn parse_free_form_descriptor() {
        let code = ActionCode::parse("double-click,left,dragged").unwrap();
        assert_eq!(
            code,
            ActionCode::of(2, ButtonMods::LEFT, EventKind::Dragged)
        );
        let code: ActionCode = "ctrl+shift+right+down".parse().unwrap();
        assert_eq!(
            code,
            ActionCode::of(
                1,
                ButtonMods::CTRL | ButtonMods::SHIFT | ButtonMods::RIGHT,
                EventKind::Pressed
            )
        );
    }

    #[test]
    fn describe_then_parse_is_identity_for_bindable_codes() {
        let codes = [
            ActionCode::of(1, ButtonMods::LEFT, EventKind::Clicked),
            ActionCode::of(
                2,
                ButtonMods::ALT | ButtonMods::SHIFT | ButtonMods::LEFT,
                EventKind::Dragged,
            ),
            ActionCode::of(1, ButtonMods::MIDDLE, EventKind::Dragged),
            ActionCode::of(1, ButtonMods::SHIFT, EventKind::Wheeled),
            ActionCode::of(1, ButtonMods::RIGHT, EventKind::Pressed),
        ];
        for code in codes {
            assert_eq!(ActionCode::parse(&code.describe()).unwrap(), code);
        }
    }

    #[test]
    fn describe_format() {
        let code = ActionCode::of(
            2,
            ButtonMods::CTRL | ButtonMods::SHIFT | ButtonMods::LEFT,
            EventKind::Dragged,
        );
        assert_eq!(code.describe(), "CTRL+SHIFT+LEFT+double+drag");
        assert_eq!(ActionCode::NONE.to_string(), "NONE");
    }

    #[test]
    fn empty_descriptor_is_rejected() {
        assert!(ActionCode::parse("  ").is_err());
    }

    #[test]
    fn from_bits_validates_layout() {
        let code = ActionCode::of(1, ButtonMods::LEFT, EventKind::Clicked);
        assert_eq!(ActionCode::from_bits(code.bits()).unwrap(), code);
        assert!(ActionCode::from_bits(1 << 20).is_err());
        assert!(ActionCode::from_bits(DOWN | DRAG).is_err());
        assert!(ActionCode::from_bits(WHEEL | CLICK).is_err());
    }
}
