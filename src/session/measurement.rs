//! Incremental multi-click measurements.
//!
//! A session collects picks one click at a time until it has as many as its
//! kind requires. Completing hands back a [`Measurement`]; the caller drops
//! the session.

use std::fmt;

use glam::Vec3;

use crate::viewer::ConnectMode;

/// One pick: an atom, or a point on some other object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasurePoint {
    /// An atom index.
    Atom(usize),
    /// A world coordinate.
    Point {
        /// Coordinate.
        position: Vec3,
        /// Model the point belongs to.
        model: Option<usize>,
    },
}

impl MeasurePoint {
    /// Atom index, for atom picks.
    #[must_use]
    pub const fn atom(&self) -> Option<usize> {
        match *self {
            Self::Atom(i) => Some(i),
            Self::Point { .. } => None,
        }
    }

    /// Same atom, or a point at distance zero.
    #[must_use]
    pub fn coincides(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Atom(a), Self::Atom(b)) => a == b,
            (Self::Point { position: a, .. }, Self::Point { position: b, .. }) => {
                a.distance(*b) == 0.0
            }
            _ => false,
        }
    }
}

impl fmt::Display for MeasurePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(i) => write!(f, "atom {i}"),
            Self::Point { position: p, .. } => {
                write!(f, "{{{} {} {}}}", p.x, p.y, p.z)
            }
        }
    }
}

/// What a session is collecting picks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureKind {
    /// Two-point distance.
    Distance,
    /// Three-point angle.
    Angle,
    /// Four-point dihedral.
    Torsion,
    /// Biopolymer sequence between the first and last of four picks.
    Sequence,
    /// Distance that stays displayed.
    Measure,
    /// Ad hoc measurement of two to four points, concluded by a double
    /// click.
    Free,
    /// Two atoms to connect.
    Connect(ConnectMode),
    /// Two-point axis for a spin or symmetry display.
    Axis,
    /// Model kit bond traced from a pressed atom.
    AssignNew,
}

impl MeasureKind {
    /// Number of picks that completes the session.
    #[must_use]
    pub const fn required(self) -> usize {
        match self {
            Self::Distance
            | Self::Measure
            | Self::Connect(_)
            | Self::Axis
            | Self::AssignNew => 2,
            Self::Angle => 3,
            Self::Torsion | Self::Sequence | Self::Free => 4,
        }
    }

    /// Lowercase name used in measurement reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Distance | Self::Measure => "distance",
            Self::Angle => "angle",
            Self::Torsion => "torsion",
            Self::Sequence => "sequence",
            Self::Free => "measure",
            Self::Connect(_) => "connect",
            Self::Axis => "axis",
            Self::AssignNew => "assign",
        }
    }
}

/// A completed measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// What was measured.
    pub kind: MeasureKind,
    /// The picks, in order.
    pub picks: Vec<MeasurePoint>,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.kind.name())?;
        for (i, pick) in self.picks.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{pick}")?;
        }
        f.write_str(")")
    }
}

/// Result of [`MeasurementSession::add_pick`].
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    /// Duplicate pick, or the session is full; nothing changed.
    Rejected,
    /// Still collecting; holds the pick count.
    Collecting(usize),
    /// The last pick completed the measurement.
    Complete(Measurement),
}

/// An in-progress measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSession {
    kind: MeasureKind,
    picks: Vec<MeasurePoint>,
    trace: Option<(i32, i32)>,
    preview: Option<MeasurePoint>,
}

impl MeasurementSession {
    /// Start a session with its first pick.
    #[must_use]
    pub fn enter(kind: MeasureKind, first: MeasurePoint) -> Self {
        Self {
            kind,
            picks: vec![first],
            trace: None,
            preview: None,
        }
    }

    /// What the session is collecting for.
    #[must_use]
    pub fn kind(&self) -> MeasureKind {
        self.kind
    }

    /// Picks so far.
    #[must_use]
    pub fn picks(&self) -> &[MeasurePoint] {
        &self.picks
    }

    /// Number of picks so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.picks.len()
    }

    /// Whether no picks remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// Picks needed to complete.
    #[must_use]
    pub fn required(&self) -> usize {
        self.kind.required()
    }

    /// Whether `atom` has been picked.
    #[must_use]
    pub fn has_atom(&self, atom: usize) -> bool {
        self.picks.iter().any(|p| p.atom() == Some(atom))
    }

    /// Position of the first pick matching `pick`.
    #[must_use]
    pub fn index_of(&self, pick: &MeasurePoint) -> Option<usize> {
        self.picks.iter().position(|p| p.coincides(pick))
    }

    /// Screen position of the rubber bond end during an assign-new drag.
    #[must_use]
    pub fn trace(&self) -> Option<(i32, i32)> {
        self.trace
    }

    /// Move the rubber bond end.
    pub fn set_trace(&mut self, x: i32, y: i32) {
        self.trace = Some((x, y));
    }

    /// Floating point that follows the pointer between clicks.
    #[must_use]
    pub fn preview(&self) -> Option<MeasurePoint> {
        self.preview
    }

    /// Update the floating point. Returns whether it changed.
    pub fn set_preview(&mut self, pick: Option<MeasurePoint>) -> bool {
        let changed = self.preview != pick;
        self.preview = pick;
        changed
    }

    /// Keep only the first `len` picks.
    pub fn truncate(&mut self, len: usize) {
        self.picks.truncate(len);
    }

    /// Add a pick.
    ///
    /// Re-picking an atom or point already in the session is rejected. While
    /// a rubber bond is traced, a full two-pick session first falls back to
    /// its anchor. `is_final` concludes an ad hoc measurement early.
    pub fn add_pick(&mut self, pick: MeasurePoint, is_final: bool) -> PickOutcome {
        if self.trace.is_some() && self.picks.len() == 2 {
            self.picks.truncate(1);
        }
        if self.index_of(&pick).is_some() {
            return self.concluded(is_final).unwrap_or(PickOutcome::Rejected);
        }
        if self.picks.len() >= self.required() {
            return PickOutcome::Rejected;
        }
        self.picks.push(pick);
        self.preview = None;
        if self.kind == MeasureKind::AssignNew {
            return PickOutcome::Collecting(self.picks.len());
        }
        if self.picks.len() == self.required() {
            return PickOutcome::Complete(self.measurement());
        }
        self.concluded(is_final)
            .unwrap_or(PickOutcome::Collecting(self.picks.len()))
    }

    /// The picks so far as a measurement, regardless of count.
    #[must_use]
    pub fn measurement(&self) -> Measurement {
        Measurement {
            kind: self.kind,
            picks: self.picks.clone(),
        }
    }

    fn concluded(&self, is_final: bool) -> Option<PickOutcome> {
        (is_final && self.kind == MeasureKind::Free && self.picks.len() >= 2)
            .then(|| PickOutcome::Complete(self.measurement()))
    }
}
