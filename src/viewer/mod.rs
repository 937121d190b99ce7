//! The port the dispatcher drives.
//!
//! [`Viewer`] is the narrow capability interface between input
//! interpretation and everything it does not own: the rendered scene, the
//! molecular model, the scripting engine and the host window. Queries are
//! answered synchronously. Effects are fire-and-forget; a failing script is
//! the viewer's to report.

mod command;
#[cfg(test)]
pub(crate) mod testing;

use std::collections::BTreeSet;

pub use command::{
    AtomSelection, ConnectMode, Cursor, DragPhase, PopupKind, ScreenRect,
    SelectScope, SelectionOp, UndoKind, ViewerCommand,
};
use glam::Vec3;
use serde::Serialize;

use crate::action::ActionCode;
use crate::input::{EventKind, MouseState};
use crate::session::{MeasurePoint, MeasurementSession};

/// What kind of non-atom object sits under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PickedKind {
    /// Anything else the viewer reports.
    #[default]
    Other,
    /// A bond.
    Bond,
    /// A point on an isosurface.
    Isosurface,
    /// A draw object vertex.
    Draw,
    /// An atom label.
    Label,
}

/// A clickable non-atom object, as reported by
/// [`Viewer::check_object_clicked`].
///
/// Serializes to the map substituted for `_OBJECT` in user scripts.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PickedObject {
    /// Object kind.
    #[serde(rename = "type")]
    pub kind: PickedKind,
    /// Object name, for named objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Bond or vertex index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Owning atom, for labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom: Option<usize>,
    /// World coordinate of the clicked point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<Vec3>,
    /// Model the object belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<usize>,
}

impl PickedObject {
    /// The clicked point as a measurement pick, if it has one.
    #[must_use]
    pub fn measure_point(&self) -> Option<MeasurePoint> {
        self.point.map(|position| MeasurePoint::Point {
            position,
            model: self.model,
        })
    }
}

/// Display and mode flags read at the start of each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewerFlags {
    /// Navigation (fly-through) mode is on.
    pub navigation_mode: bool,
    /// Slab and depth clipping respond to drags.
    pub slab_enabled: bool,
    /// The model kit is open.
    pub modelkit_mode: bool,
    /// A free spin is running.
    pub spin_on: bool,
    /// Navigation motion is running.
    pub nav_on: bool,
    /// The scene is animating.
    pub in_motion: bool,
    /// The frame buffer is twice the window size.
    pub antialiased: bool,
    /// Side-by-side stereo with half-width input coordinates.
    pub stereo_doubled: bool,
    /// Full-width side-by-side stereo.
    pub stereo_full: bool,
}

/// Model kit settings relevant to picking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelkitInfo {
    /// Element or fragment assigned by atom picks. `Xx` drops the bond.
    pub atom_type: String,
    /// Bond order assigned by bond picks.
    pub bond_type: String,
    /// Atom picks assign formal charge instead of element.
    pub assign_charge: bool,
}

impl Default for ModelkitInfo {
    fn default() -> Self {
        Self {
            atom_type: "C".to_owned(),
            bond_type: "p".to_owned(),
            assign_charge: false,
        }
    }
}

/// Capabilities the dispatcher needs from the viewer.
pub trait Viewer {
    // ── Queries ─────────────────────────────────────────────────────

    /// Window size in pixels.
    fn screen_size(&self) -> (i32, i32);

    /// Current display and mode flags.
    fn flags(&self) -> ViewerFlags;

    /// Nearest visible atom to a screen position.
    fn find_nearest_atom_index(&self, x: i32, y: i32) -> Option<usize>;

    /// Nearest atom that may be moved, optionally counting deleted atoms.
    fn find_nearest_movable_atom_index(
        &self,
        x: i32,
        y: i32,
        allow_deleted: bool,
    ) -> Option<usize>;

    /// Whether the atom lies in the pickable subset.
    fn is_in_selection_subset(&self, _atom: usize) -> bool {
        true
    }

    /// World coordinate of an atom.
    fn atom_position(&self, atom: usize) -> Option<Vec3>;

    /// A non-atom object under the pointer, if any.
    fn check_object_clicked(
        &mut self,
        _x: i32,
        _y: i32,
        _code: ActionCode,
    ) -> Option<PickedObject> {
        None
    }

    /// Offer a drag to draw objects and labels. Returns `true` if one took it.
    fn check_object_dragged(
        &mut self,
        _phase: DragPhase,
        _x: i32,
        _y: i32,
        _code: ActionCode,
    ) -> bool {
        false
    }

    /// Offer a hover to non-atom objects. Returns `true` if one took it.
    fn check_object_hovered(&mut self, _x: i32, _y: i32) -> bool {
        false
    }

    /// Atoms whose screen projection falls inside `rect`.
    fn find_atoms_in_rectangle(&self, rect: ScreenRect) -> BTreeSet<usize>;

    /// The molecule containing `atom`, optionally restricted to ligands.
    fn molecule_atoms(&self, atom: usize, ligand_only: bool) -> BTreeSet<usize>;

    /// Lowest-indexed selected atom.
    fn first_selected_atom(&self) -> Option<usize>;

    /// Whether the atom belongs to the last loaded model.
    fn is_atom_in_last_model(&self, atom: usize) -> bool;

    /// Whether `(x, y)` hits the frank (logo) or the model kit button,
    /// and which menu that opens.
    fn frank_hit(&self, _x: i32, _y: i32) -> Option<PopupKind> {
        None
    }

    /// Bond the model kit currently rotates branches about.
    fn rotate_bond_index(&self) -> Option<usize> {
        None
    }

    /// Model kit settings.
    fn modelkit(&self) -> ModelkitInfo {
        ModelkitInfo::default()
    }

    /// Atomic number of an atom.
    fn atom_element_number(&self, atom: usize) -> u32;

    /// Current cursor.
    fn cursor(&self) -> Cursor;

    // ── Effects ─────────────────────────────────────────────────────

    /// Run a user script without echo.
    fn run_script_quiet(&mut self, script: &str);

    /// Change the selection.
    fn mutate_selection(&mut self, atoms: &AtomSelection, op: SelectionOp);

    /// Show (or with `None`, clear) the measurement being picked.
    fn show_pending_measurement(&mut self, session: Option<&MeasurementSession>);

    /// Change the cursor.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Mark the scene as moving, for level-of-detail rendering.
    fn set_in_motion(&mut self, in_motion: bool);

    /// Drop any hover highlight.
    fn hover_off(&mut self) {}

    /// Host veto hook for pointer actions. Return a (possibly rewritten)
    /// code to proceed or `None` to cancel.
    fn notify_mouse_clicked(
        &mut self,
        _x: i32,
        _y: i32,
        code: ActionCode,
        _kind: EventKind,
    ) -> Option<ActionCode> {
        Some(code)
    }

    /// Open a context menu.
    fn open_popup_menu(&mut self, x: i32, y: i32, kind: PopupKind);

    /// Record a gesture description.
    fn log_gesture(&mut self, description: &str) {
        log::info!("{description}");
    }

    /// Let the model kit handle an assign-new drag itself. Returns `true` if
    /// it did.
    fn handle_modelkit_drag(
        &mut self,
        _pressed: &MouseState,
        _dragged: &MouseState,
        _picks: &[MeasurePoint],
    ) -> bool {
        false
    }

    /// Whether a scripting function with this name exists.
    fn is_user_function(&self, _name: &str) -> bool {
        false
    }

    /// Call a scripting function.
    fn call_user_function(
        &mut self,
        _name: &str,
        _params: &[serde_json::Value],
    ) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Carry out a command.
    fn execute(&mut self, command: ViewerCommand);
}
