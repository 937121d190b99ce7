//! Canonical high-level actions a mouse gesture can be bound to.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::error::InteractError;

/// A canonical, built-in action.
///
/// The stable names (see [`ActionId::name`]) are what scripts and saved
/// state refer to, so they must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionId {
    // ── Model kit ──
    /// Assign a new atom or bond.
    AssignNew,
    // ── Camera ──
    /// Center on the clicked atom.
    Center,
    /// Click on the logo area.
    ClickFrank,
    // ── Editing ──
    /// Connect two atoms.
    ConnectAtoms,
    /// Delete an atom.
    DeleteAtom,
    /// Delete a bond.
    DeleteBond,
    // ── Clipping ──
    /// Adjust the back clipping plane.
    Depth,
    // ── Dragging ──
    /// Move an atom.
    DragAtom,
    /// Move a whole draw object.
    DragDrawObject,
    /// Move one point of a draw object.
    DragDrawPoint,
    /// Move a label.
    DragLabel,
    /// Move an atom and minimize.
    DragMinimize,
    /// Move a molecule and minimize.
    DragMinimizeMolecule,
    /// Move the selected atoms.
    DragSelected,
    /// Drag atoms along Z.
    DragZ,
    /// Simulate multi-touch with the mouse.
    MultiTouchSimulation,
    /// Translate the navigation focus.
    NavTranslate,
    // ── Picking ──
    /// Pick an atom.
    PickAtom,
    /// Pick an isosurface point.
    PickIsosurface,
    /// Pick a label.
    PickLabel,
    /// Add an atom to a measurement.
    PickMeasure,
    /// Navigate to a point or atom.
    PickNavigate,
    /// Pick a draw point.
    PickPoint,
    /// Open the context menu.
    PopupMenu,
    /// Reset the view.
    Reset,
    // ── Rotation ──
    /// Rotate the model.
    Rotate,
    /// Rotate a branch around a bond.
    RotateBranch,
    /// Rotate the selected atoms.
    RotateSelected,
    /// Rotate about Z.
    RotateZ,
    /// Rotate about Z (horizontal) or zoom (vertical).
    RotateZorZoom,
    // ── Selection ──
    /// Select.
    Select,
    /// Select and drag.
    SelectAndDrag,
    /// Remove from the selection.
    SelectAndNot,
    /// Clear the selection.
    SelectNone,
    /// Add to the selection.
    SelectOr,
    /// Toggle the selection.
    SelectToggle,
    /// Toggle-or-add extended selection.
    SelectToggleExtended,
    /// Start or conclude a measurement.
    SetMeasure,
    /// Adjust the front clipping plane.
    Slab,
    /// Move both clipping planes.
    SlabAndDepth,
    /// Zoom along the right edge.
    SlideZoom,
    // ── Draw objects ──
    /// Spin a draw axis counter-clockwise.
    SpinDrawObjectCcw,
    /// Spin a draw axis clockwise.
    SpinDrawObjectCw,
    /// Stop any motion.
    StopMotion,
    /// Spin on a fast release.
    Swipe,
    /// Translate the model.
    Translate,
    /// Zoom with the wheel.
    WheelZoom,
}

/// Number of canonical actions.
pub const ACTION_COUNT: usize = 47;

impl ActionId {
    /// Every action, in stable id order.
    pub const ALL: [Self; ACTION_COUNT] = [
        Self::AssignNew,
        Self::Center,
        Self::ClickFrank,
        Self::ConnectAtoms,
        Self::DeleteAtom,
        Self::DeleteBond,
        Self::Depth,
        Self::DragAtom,
        Self::DragDrawObject,
        Self::DragDrawPoint,
        Self::DragLabel,
        Self::DragMinimize,
        Self::DragMinimizeMolecule,
        Self::DragSelected,
        Self::DragZ,
        Self::MultiTouchSimulation,
        Self::NavTranslate,
        Self::PickAtom,
        Self::PickIsosurface,
        Self::PickLabel,
        Self::PickMeasure,
        Self::PickNavigate,
        Self::PickPoint,
        Self::PopupMenu,
        Self::Reset,
        Self::Rotate,
        Self::RotateBranch,
        Self::RotateSelected,
        Self::RotateZ,
        Self::RotateZorZoom,
        Self::Select,
        Self::SelectAndDrag,
        Self::SelectAndNot,
        Self::SelectNone,
        Self::SelectOr,
        Self::SelectToggle,
        Self::SelectToggleExtended,
        Self::SetMeasure,
        Self::Slab,
        Self::SlabAndDepth,
        Self::SlideZoom,
        Self::SpinDrawObjectCcw,
        Self::SpinDrawObjectCw,
        Self::StopMotion,
        Self::Swipe,
        Self::Translate,
        Self::WheelZoom,
    ];

    /// Stable script-facing name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AssignNew => "_assignNew",
            Self::Center => "_center",
            Self::ClickFrank => "_clickFrank",
            Self::ConnectAtoms => "_pickConnect",
            Self::DeleteAtom => "_deleteAtom",
            Self::DeleteBond => "_deleteBond",
            Self::Depth => "_depth",
            Self::DragAtom => "_dragAtom",
            Self::DragDrawObject => "_dragDrawObject",
            Self::DragDrawPoint => "_dragDrawPoint",
            Self::DragLabel => "_dragLabel",
            Self::DragMinimize => "_dragMinimize",
            Self::DragMinimizeMolecule => "_dragMinimizeMolecule",
            Self::DragSelected => "_dragSelected",
            Self::DragZ => "_dragZ",
            Self::MultiTouchSimulation => "_multiTouchSimulation",
            Self::NavTranslate => "_navTranslate",
            Self::PickAtom => "_pickAtom",
            Self::PickIsosurface => "_pickIsosurface",
            Self::PickLabel => "_pickLabel",
            Self::PickMeasure => "_pickMeasure",
            Self::PickNavigate => "_pickNavigate",
            Self::PickPoint => "_pickPoint",
            Self::PopupMenu => "_popupMenu",
            Self::Reset => "_reset",
            Self::Rotate => "_rotate",
            Self::RotateBranch => "_rotateBranch",
            Self::RotateSelected => "_rotateSelected",
            Self::RotateZ => "_rotateZ",
            Self::RotateZorZoom => "_rotateZorZoom",
            Self::Select => "_select",
            Self::SelectAndDrag => "_selectAndDrag",
            Self::SelectAndNot => "_selectAndNot",
            Self::SelectNone => "_selectNone",
            Self::SelectOr => "_selectOr",
            Self::SelectToggle => "_selectToggle",
            Self::SelectToggleExtended => "_selectToggleOr",
            Self::SetMeasure => "_setMeasure",
            Self::Slab => "_slab",
            Self::SlabAndDepth => "_slabAndDepth",
            Self::SlideZoom => "_slideZoom",
            Self::SpinDrawObjectCcw => "_spinDrawObjectCCW",
            Self::SpinDrawObjectCw => "_spinDrawObjectCW",
            Self::StopMotion => "_stopMotion",
            Self::Swipe => "_swipe",
            Self::Translate => "_translate",
            Self::WheelZoom => "_wheelZoom",
        }
    }

    /// One-line help text.
    #[must_use]
    pub const fn info(self) -> &'static str {
        match self {
            Self::AssignNew => {
                "assign/new atom or bond (requires picking assignAtom_XX or assignBond_n)"
            }
            Self::Center => "center",
            Self::ClickFrank => "pop up recent context menu (click on the frank)",
            Self::ConnectAtoms => "connect atoms (requires picking connect)",
            Self::DeleteAtom => "delete atom (requires picking deleteAtom)",
            Self::DeleteBond => "delete bond (requires picking deleteBond)",
            Self::Depth => "adjust depth (back plane; requires slab on)",
            Self::DragAtom => "move an atom (requires picking dragAtom)",
            Self::DragDrawObject => {
                "move a whole draw object (requires picking draw)"
            }
            Self::DragDrawPoint => {
                "move specific draw point (requires picking draw)"
            }
            Self::DragLabel => "move label (requires picking label)",
            Self::DragMinimize => {
                "move atom and minimize molecule (requires picking dragMinimize)"
            }
            Self::DragMinimizeMolecule => {
                "move and minimize molecule (requires picking dragMinimizeMolecule)"
            }
            Self::DragSelected => "move selected atoms (requires dragSelected)",
            Self::DragZ => "drag atoms in Z direction (requires dragSelected)",
            Self::MultiTouchSimulation => "simulate multi-touch using the mouse",
            Self::NavTranslate => {
                "translate navigation focus point (requires navigation mode)"
            }
            Self::PickAtom => "pick an atom",
            Self::PickIsosurface => "pick an isosurface point",
            Self::PickLabel => {
                "pick a label to toggle it hidden/displayed (requires picking label)"
            }
            Self::PickMeasure => {
                "pick an atom to include it in a measurement (after starting a measurement or after picking distance/angle/torsion)"
            }
            Self::PickNavigate => {
                "pick a point or atom to navigate to (requires navigation mode)"
            }
            Self::PickPoint => "pick a draw point (for measurements)",
            Self::PopupMenu => "pop up the full context menu",
            Self::Reset => "reset (when clicked off the model)",
            Self::Rotate => "rotate",
            Self::RotateBranch => {
                "rotate branch around bond (requires picking rotateBond)"
            }
            Self::RotateSelected => {
                "rotate selected atoms (requires dragSelected)"
            }
            Self::RotateZ => "rotate Z",
            Self::RotateZorZoom => {
                "rotate Z (horizontal motion of mouse) or zoom (vertical motion of mouse)"
            }
            Self::Select => "select an atom (requires pickingStyle extendedSelect)",
            Self::SelectAndDrag => "select and drag atoms (requires dragSelected)",
            Self::SelectAndNot => {
                "unselect this group of atoms (requires pickingStyle drag/extendedSelect)"
            }
            Self::SelectNone => "select none (requires pickingStyle extendedSelect)",
            Self::SelectOr => {
                "add this group of atoms to the set of selected atoms (requires pickingStyle drag/extendedSelect)"
            }
            Self::SelectToggle => {
                "toggle selection (requires pickingStyle drag/extendedSelect/selectOrToggle)"
            }
            Self::SelectToggleExtended => {
                "if all are selected, unselect all, otherwise add this group of atoms to the set of selected atoms (requires pickingStyle drag)"
            }
            Self::SetMeasure => "pick an atom to initiate or conclude a measurement",
            Self::Slab => "adjust slab (front plane; requires slab on)",
            Self::SlabAndDepth => {
                "move slab/depth window (both planes; requires slab on)"
            }
            Self::SlideZoom => "zoom (along right edge of window)",
            Self::SpinDrawObjectCcw => {
                "spin axis draw object counter-clockwise (requires picking draw)"
            }
            Self::SpinDrawObjectCw => {
                "spin axis draw object clockwise (requires picking draw)"
            }
            Self::StopMotion => "stop motion",
            Self::Swipe => {
                "spin model (swipe and release button and stop motion simultaneously)"
            }
            Self::Translate => "translate",
            Self::WheelZoom => "zoom",
        }
    }

    /// Case-insensitive lookup by stable name, with or without the leading
    /// underscore.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        static REGISTRY: OnceLock<FxHashMap<String, ActionId>> = OnceLock::new();
        let registry = REGISTRY.get_or_init(|| {
            let mut map = FxHashMap::default();
            for id in Self::ALL {
                let key = id.name().to_lowercase();
                drop(map.insert(key[1..].to_owned(), id));
                drop(map.insert(key, id));
            }
            map
        });
        registry.get(&name.trim().to_lowercase()).copied()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActionId {
    type Err = InteractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| InteractError::UnknownAction(s.to_owned()))
    }
}
