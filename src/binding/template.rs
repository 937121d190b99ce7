//! User script templates bound to mouse actions.
//!
//! A template is raw script text with a fixed set of placeholders that are
//! filled in when the binding fires. A leading `+:` marks the template as
//! pass-through: the script runs and the built-in action still runs after.

use glam::Vec3;

use crate::action::ActionCode;
use crate::input::EventKind;
use crate::viewer::PickedObject;

const PASS_THROUGH_MARKER: &str = "+:";

bitflags::bitflags! {
    /// Set of placeholders a template references.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Placeholders: u16 {
        /// `_ATOM`: nearest atom as an atom set.
        const ATOM = 1;
        /// `_POINT`: atom or clicked-object coordinate.
        const POINT = 1 << 1;
        /// `_BOND`: clicked bond as a bond set.
        const BOND = 1 << 2;
        /// `_OBJECT`: clicked object as a map.
        const OBJECT = 1 << 3;
        /// `_X`: pointer x.
        const X = 1 << 4;
        /// `_Y`: pointer y, bottom-up.
        const Y = 1 << 5;
        /// `_DELTAX`: drag dx.
        const DELTA_X = 1 << 6;
        /// `_DELTAY`: drag dy.
        const DELTA_Y = 1 << 7;
        /// `_TIME`: event time.
        const TIME = 1 << 8;
        /// `_MODE`: event kind name.
        const MODE = 1 << 9;
        /// `_ACTION`: packed action code.
        const ACTION = 1 << 10;
    }
}

/// Placeholder tokens, longest first so `_DELTAX` is never read as `_X`.
#[derive(Clone, Copy)]
enum Token {
    DeltaX,
    DeltaY,
    Action,
    Object,
    Point,
    Atom,
    Bond,
    Time,
    Mode,
    X,
    Y,
}

impl Token {
    const ALL: [Self; 11] = [
        Self::DeltaX,
        Self::DeltaY,
        Self::Action,
        Self::Object,
        Self::Point,
        Self::Atom,
        Self::Bond,
        Self::Time,
        Self::Mode,
        Self::X,
        Self::Y,
    ];

    const fn text(self) -> &'static str {
        match self {
            Self::DeltaX => "_DELTAX",
            Self::DeltaY => "_DELTAY",
            Self::Action => "_ACTION",
            Self::Object => "_OBJECT",
            Self::Point => "_POINT",
            Self::Atom => "_ATOM",
            Self::Bond => "_BOND",
            Self::Time => "_TIME",
            Self::Mode => "_MODE",
            Self::X => "_X",
            Self::Y => "_Y",
        }
    }

    const fn flag(self) -> Placeholders {
        match self {
            Self::DeltaX => Placeholders::DELTA_X,
            Self::DeltaY => Placeholders::DELTA_Y,
            Self::Action => Placeholders::ACTION,
            Self::Object => Placeholders::OBJECT,
            Self::Point => Placeholders::POINT,
            Self::Atom => Placeholders::ATOM,
            Self::Bond => Placeholders::BOND,
            Self::Time => Placeholders::TIME,
            Self::Mode => Placeholders::MODE,
            Self::X => Placeholders::X,
            Self::Y => Placeholders::Y,
        }
    }

    fn value(self, ctx: &TemplateContext<'_>) -> String {
        match self {
            Self::Atom => ctx
                .atom
                .map_or_else(|| "({})".to_owned(), |i| format!("({{{i}}})")),
            Self::Point => ctx.point.map_or_else(
                || "{}".to_owned(),
                |p| format!("{{{:?} {:?} {:?}}}", p.x, p.y, p.z),
            ),
            Self::Bond => ctx
                .bond
                .map_or_else(|| "[{}]".to_owned(), |i| format!("[{{{i}}}]")),
            Self::Object => ctx
                .object
                .and_then(|obj| serde_json::to_string(obj).ok())
                .unwrap_or_else(|| "{}".to_owned()),
            Self::X => ctx.x.to_string(),
            Self::Y => ctx.y.to_string(),
            Self::DeltaX => ctx.dx.to_string(),
            Self::DeltaY => ctx.dy.to_string(),
            Self::Time => ctx.time.to_string(),
            Self::Mode => ctx.kind.map_or("", EventKind::name).to_owned(),
            Self::Action => ctx.action.bits().to_string(),
        }
    }
}

/// Values substituted into a template when its binding fires.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext<'a> {
    /// The action code that fired.
    pub action: ActionCode,
    /// The event kind that fired.
    pub kind: Option<EventKind>,
    /// Pointer x in pixels.
    pub x: i32,
    /// Pointer y in pixels, already flipped to a bottom-up origin.
    pub y: i32,
    /// Drag dx.
    pub dx: i32,
    /// Drag dy.
    pub dy: i32,
    /// Event time in milliseconds.
    pub time: i64,
    /// Nearest atom, when looked up.
    pub atom: Option<usize>,
    /// Coordinate of the atom or clicked object.
    pub point: Option<Vec3>,
    /// Clicked bond, when looked up.
    pub bond: Option<usize>,
    /// Clicked object, when looked up.
    pub object: Option<&'a PickedObject>,
}

/// A user script bound to an action code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionScriptTemplate {
    source: String,
    pass_through: bool,
    uses: Placeholders,
}

impl ActionScriptTemplate {
    /// Parse raw binding text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let source = source.trim().to_owned();
        let pass_through = source.starts_with(PASS_THROUGH_MARKER);
        let body = if pass_through {
            &source[PASS_THROUGH_MARKER.len()..]
        } else {
            source.as_str()
        };
        let mut uses = Placeholders::empty();
        scan(body, |_, token| uses |= token.flag());
        Self {
            source,
            pass_through,
            uses,
        }
    }

    /// The text as bound, including any pass-through marker.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Script text without the pass-through marker.
    #[must_use]
    pub fn body(&self) -> &str {
        if self.pass_through {
            &self.source[PASS_THROUGH_MARKER.len()..]
        } else {
            &self.source
        }
    }

    /// Whether the built-in action still runs after this script.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.pass_through
    }

    /// Placeholders referenced by the body.
    #[must_use]
    pub fn placeholders(&self) -> Placeholders {
        self.uses
    }

    /// Whether the body references any of `flags`.
    #[must_use]
    pub fn uses(&self, flags: Placeholders) -> bool {
        self.uses.intersects(flags)
    }

    /// Substitute every placeholder in one left-to-right pass.
    ///
    /// Substituted text is never rescanned, so an object payload that
    /// happens to contain `_X` is left alone.
    #[must_use]
    pub fn fill(&self, ctx: &TemplateContext<'_>) -> String {
        let body = self.body();
        let mut out = String::with_capacity(body.len() + 16);
        let mut last = 0;
        scan(body, |at, token| {
            out.push_str(&body[last..at]);
            out.push_str(&token.value(ctx));
            last = at + token.text().len();
        });
        out.push_str(&body[last..]);
        out
    }
}

/// Calls `found(byte_offset, token)` for each placeholder in order.
fn scan(body: &str, mut found: impl FnMut(usize, Token)) {
    let mut at = 0;
    while let Some(offset) = body[at..].find('_') {
        let start = at + offset;
        let rest = &body[start..];
        match Token::ALL.iter().find(|t| rest.starts_with(t.text())) {
            Some(&token) => {
                found(start, token);
                at = start + token.text().len();
            }
            None => at = start + 1,
        }
    }
}
