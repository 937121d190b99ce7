//! Everything the dispatcher can ask the viewer to do.
//!
//! Interpreted input ends up either as a direct [`Viewer`](super::Viewer)
//! call (cursor, selection, popups) or as a [`ViewerCommand`] passed to
//! [`Viewer::execute`](super::Viewer::execute).

use std::collections::BTreeSet;

use glam::Vec3;

use crate::input::{ButtonMods, Key};
use crate::session::{MeasurePoint, Measurement};

// ── Command payload types ────────────────────────────────────────────────

/// Pointer cursor shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Platform default arrow.
    #[default]
    Default,
    /// Pressed / pickable.
    Hand,
    /// Rotating or dragging.
    Move,
    /// Zooming.
    Zoom,
    /// Measuring.
    Crosshair,
    /// Busy. Motion never replaces it.
    Wait,
}

/// Which context menu to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    /// The main viewer menu.
    Main,
    /// Menu for the atom under the pointer.
    Atom,
    /// Menu for the bond under the pointer.
    Bond,
    /// Model kit menu.
    Modelkit,
}

/// How a pick combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOp {
    /// Select exactly the picked atoms.
    Replace,
    /// Flip picked atoms in or out of the selection.
    Toggle,
    /// Remove picked atoms.
    AndNot,
    /// Add picked atoms.
    Or,
    /// Toggle as a group: if any picked atom is unselected, add them all.
    ToggleExtended,
}

/// Structural scope used by select-by-pick modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectScope {
    /// The atom itself.
    Atom,
    /// Its residue.
    Group,
    /// Its chain.
    Chain,
    /// Its polymer.
    Polymer,
    /// Its secondary-structure element.
    Structure,
    /// Its covalently bonded molecule.
    Molecule,
    /// Its model.
    Model,
    /// Visible atoms of the same element.
    Element,
    /// Visible atoms on the same crystallographic site.
    Site,
}

impl SelectScope {
    /// Whether the scope only covers visible atoms.
    #[must_use]
    pub const fn visible_only(self) -> bool {
        matches!(self, Self::Element | Self::Site)
    }
}

/// Atoms a selection change applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomSelection {
    /// An explicit atom set.
    Atoms(BTreeSet<usize>),
    /// Everything within `scope` of `atom`, resolved by the viewer.
    Within {
        /// Structural scope.
        scope: SelectScope,
        /// Anchor atom.
        atom: usize,
    },
}

/// Screen-space rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl ScreenRect {
    /// Rectangle spanned by two corners, scaled by `factor`.
    #[must_use]
    pub fn from_corners(a: (i32, i32), b: (i32, i32), factor: i32) -> Self {
        Self {
            x: a.0.min(b.0) * factor,
            y: a.1.min(b.1) * factor,
            width: (a.0 - b.0).abs() * factor,
            height: (a.1 - b.1).abs() * factor,
        }
    }

    /// Whether `(x, y)` lies inside, edges included.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x <= self.x + self.width
            && y >= self.y
            && y <= self.y + self.height
    }
}

/// Stage of a draw-object or label drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// Button went down over the object.
    Begin,
    /// Pointer moved from the previous drag sample.
    Move {
        /// Previous x.
        from_x: i32,
        /// Previous y.
        from_y: i32,
    },
    /// Button went up.
    End,
}

/// What a two-atom connect pick does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectMode {
    /// Bond the atoms, or remove the bond if one exists.
    Toggle,
    /// Add a strut.
    Struts,
    /// Remove the bond.
    Delete,
}

/// State captured before an edit so it can be undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoKind {
    /// Coordinates of the atoms about to move, starting at this atom.
    Coordinates(usize),
    /// Formal charge of this atom.
    FormalCharge(usize),
    /// The whole model state.
    State,
}

// ── Commands ─────────────────────────────────────────────────────────────

/// A high-level viewer operation produced by input interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerCommand {
    // ── Camera ──────────────────────────────────────────────────────
    /// Rotate the view about the screen x and y axes.
    RotateXY {
        /// Degrees about the vertical axis (from horizontal drag).
        degrees_x: f32,
        /// Degrees about the horizontal axis (from vertical drag).
        degrees_y: f32,
    },
    /// Rotate the view about the screen z axis.
    RotateZ {
        /// Degrees.
        degrees: i32,
    },
    /// Translate the view.
    TranslateXY {
        /// Pixels right.
        dx: i32,
        /// Pixels down.
        dy: i32,
    },
    /// Zoom by a pixel drag distance.
    ZoomBy {
        /// Pixels; positive zooms in.
        pixels: i32,
    },
    /// Multiply the zoom.
    ZoomByFactor {
        /// Zoom multiplier.
        factor: f32,
    },
    /// Move the front clipping plane.
    Slab {
        /// Pixels.
        pixels: i32,
    },
    /// Move the back clipping plane.
    Depth {
        /// Pixels.
        pixels: i32,
    },
    /// Move both clipping planes together.
    SlabAndDepth {
        /// Pixels.
        pixels: i32,
    },
    /// Start a free spin from a swipe.
    SpinXY {
        /// Spin axis x component, in pixels.
        dx: i32,
        /// Spin axis y component, in pixels.
        dy: i32,
        /// Spin rate.
        rate: f32,
    },
    /// Stop a free spin.
    StopSpin,
    /// Stop any running animation or spin.
    StopMotion,
    /// Center and zoom on an atom.
    ZoomTo {
        /// Atom index.
        atom: usize,
    },
    /// Center and zoom on a point.
    ZoomToPoint {
        /// World coordinate.
        point: Vec3,
    },
    /// Reset the view.
    ResetView,
    /// Move the navigation focus to a screen position.
    NavTranslatePercent {
        /// Percent of width from center.
        x: f32,
        /// Percent of height from center.
        y: f32,
    },
    /// Navigation key went down.
    Navigate {
        /// The key.
        key: Key,
        /// Modifier keys held.
        modifiers: ButtonMods,
    },
    /// Navigation key went up.
    NavigateStop,

    // ── Editing ─────────────────────────────────────────────────────
    /// Move an atom (and its hydrogens) by screen pixels.
    MoveAtom {
        /// Dragged atom.
        atom: usize,
        /// Pixels right.
        dx: i32,
        /// Pixels down.
        dy: i32,
        /// Pixels toward the viewer; `None` leaves depth unconstrained.
        dz: Option<i32>,
        /// Atoms that move along with it, if more than the atom itself.
        atoms: Option<BTreeSet<usize>>,
    },
    /// Snapshot the selection before moving it.
    BeginMoveSelected,
    /// Finish a move of the selection.
    CommitMoveSelected,
    /// Move the selection by screen pixels.
    MoveSelected {
        /// Pixels right.
        dx: i32,
        /// Pixels down.
        dy: i32,
        /// Pixels toward the viewer; `None` leaves depth unconstrained.
        dz: Option<i32>,
    },
    /// Rotate atoms about their center.
    RotateSelected {
        /// Degrees about the vertical axis.
        degrees_x: f32,
        /// Degrees about the horizontal axis.
        degrees_y: f32,
        /// Atoms to rotate; `None` means the current selection.
        atoms: Option<BTreeSet<usize>>,
    },
    /// Rotate the branch beyond the model kit's rotation bond.
    RotateBranch {
        /// Pixels right.
        dx: i32,
        /// Pixels down.
        dy: i32,
        /// Pointer x.
        x: i32,
        /// Pointer y.
        y: i32,
    },
    /// Record an undo step.
    RecordUndo(UndoKind),
    /// Energy-minimize around a dragged atom.
    Minimize {
        /// Dragged atom.
        atom: usize,
        /// Minimize its whole molecule silently.
        molecule: bool,
    },
    /// Delete an atom.
    DeleteAtom {
        /// Atom index.
        atom: usize,
    },
    /// Delete a bond.
    DeleteBond {
        /// Bond index.
        bond: usize,
    },
    /// Invert the stereocenter at an atom.
    InvertStereo {
        /// Atom index.
        atom: usize,
    },
    /// Connect, strut or disconnect two picked atoms.
    Connect {
        /// The two picks.
        picks: Vec<MeasurePoint>,
        /// What to do with them.
        mode: ConnectMode,
    },
    /// Model kit: bond two atoms traced with a drag.
    AssignConnect {
        /// The two picks.
        picks: Vec<MeasurePoint>,
    },
    /// Model kit: set an atom's element, or add a new atom bonded to it.
    AssignAtom {
        /// Anchor atom.
        atom: usize,
        /// Element symbol or model kit atom type.
        element: String,
        /// Screen position of a new atom; `None` changes the anchor itself.
        position: Option<(i32, i32)>,
        /// Label the atom with its formal charge afterwards.
        charge_label: bool,
    },
    /// Model kit: set a bond's order.
    AssignBond {
        /// Bond index.
        bond: usize,
        /// Model kit bond type.
        bond_type: String,
    },
    /// Model kit: pick the bond that branch rotation pivots on.
    SetRotateBond {
        /// Bond index.
        bond: usize,
    },
    /// Model kit: drop the rotation bond.
    ClearRotateBond,

    // ── Labels, measurements, status ────────────────────────────────
    /// Toggle an atom's label.
    ToggleLabel {
        /// Atom index.
        atom: usize,
    },
    /// Ask the user for label text.
    PromptLabel {
        /// Atom index.
        atom: usize,
    },
    /// Report a pick to the host.
    AtomPicked {
        /// Atom index, if a single atom was picked.
        atom: Option<usize>,
        /// Status text.
        message: Option<String>,
    },
    /// A measurement completed. Ad hoc measurements toggle on and off.
    Measure {
        /// The picks and their kind.
        measurement: Measurement,
        /// Keep it displayed rather than only reporting it.
        persist: bool,
    },
    /// Report the biopolymer sequence between two atoms.
    MeasureSequence {
        /// First atom.
        from: usize,
        /// Last atom.
        to: usize,
    },
    /// Spin about an axis through two picks.
    Spin {
        /// Axis end points.
        picks: Vec<MeasurePoint>,
        /// Degrees per second.
        rate: i32,
    },
    /// Stop an axis spin.
    SpinOff,
    /// Show the symmetry relationship between two picks.
    ShowSymmetry {
        /// The two picks.
        picks: Vec<MeasurePoint>,
    },
    /// Prompt shown while collecting picks.
    ScriptStatus(String),
    /// Highlight an atom under a resting pointer.
    HoverOn {
        /// Atom index.
        atom: usize,
        /// Hover its label rather than the atom.
        is_label: bool,
    },
    /// Repaint.
    Refresh {
        /// Why, for the host's logs.
        reason: &'static str,
    },
    /// Clear the selection.
    SelectNone,
    /// Turn on selection halos.
    ShowSelectionHalos,
}
