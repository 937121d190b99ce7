//! In-memory [`Viewer`] that records what it is asked to do.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;

use super::{
    AtomSelection, Cursor, DragPhase, ModelkitInfo, PickedObject, PopupKind,
    ScreenRect, SelectionOp, Viewer, ViewerCommand, ViewerFlags,
};
use crate::action::ActionCode;
use crate::input::EventKind;
use crate::session::MeasurementSession;

/// A fake scene: atoms are points on screen, each with a world position.
#[derive(Debug, Default)]
pub(crate) struct RecordingViewer {
    pub size: (i32, i32),
    pub flags: ViewerFlags,
    /// Screen position of each atom.
    pub atoms: BTreeMap<usize, (i32, i32)>,
    /// Molecule membership.
    pub molecules: Vec<BTreeSet<usize>>,
    pub selected: BTreeSet<usize>,
    pub objects: Vec<((i32, i32), PickedObject)>,
    pub elements: BTreeMap<usize, u32>,
    pub modelkit: ModelkitInfo,
    pub user_functions: BTreeMap<String, serde_json::Value>,
    /// Veto every pointer action.
    pub veto: bool,
    pub cursor: Cursor,
    pub in_motion: bool,

    pub commands: Vec<ViewerCommand>,
    pub scripts: Vec<String>,
    pub selections: Vec<(AtomSelection, SelectionOp)>,
    pub popups: Vec<(i32, i32, PopupKind)>,
    pub pending: Vec<Option<usize>>,
    pub gestures: Vec<String>,
    pub hover_offs: usize,
    pub calls: Vec<(String, Vec<serde_json::Value>)>,
}

/// Pixels within which an atom counts as under the pointer.
const PICK_RADIUS: i32 = 4;

impl RecordingViewer {
    pub fn new() -> Self {
        Self {
            size: (500, 500),
            ..Self::default()
        }
    }

    pub fn with_atoms(atoms: &[(usize, (i32, i32))]) -> Self {
        let mut viewer = Self::new();
        viewer.atoms = atoms.iter().copied().collect();
        viewer
    }

    /// Commands minus repaint and motion noise.
    pub fn significant(&self) -> Vec<&ViewerCommand> {
        self.commands
            .iter()
            .filter(|c| {
                !matches!(
                    c,
                    ViewerCommand::Refresh { .. } | ViewerCommand::StopSpin
                )
            })
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.scripts.clear();
        self.selections.clear();
        self.popups.clear();
        self.pending.clear();
    }

    fn atom_at(&self, x: i32, y: i32) -> Option<usize> {
        self.atoms
            .iter()
            .filter(|(_, &(ax, ay))| {
                (ax - x).abs() <= PICK_RADIUS && (ay - y).abs() <= PICK_RADIUS
            })
            .min_by_key(|(_, &(ax, ay))| (ax - x).abs() + (ay - y).abs())
            .map(|(&i, _)| i)
    }
}

impl Viewer for RecordingViewer {
    fn screen_size(&self) -> (i32, i32) {
        self.size
    }

    fn flags(&self) -> ViewerFlags {
        ViewerFlags {
            in_motion: self.in_motion,
            ..self.flags
        }
    }

    fn find_nearest_atom_index(&self, x: i32, y: i32) -> Option<usize> {
        self.atom_at(x, y)
    }

    fn find_nearest_movable_atom_index(
        &self,
        x: i32,
        y: i32,
        _allow_deleted: bool,
    ) -> Option<usize> {
        self.atom_at(x, y)
    }

    fn atom_position(&self, atom: usize) -> Option<Vec3> {
        self.atoms
            .get(&atom)
            .map(|&(x, y)| Vec3::new(x as f32, y as f32, 0.0))
    }

    fn check_object_clicked(
        &mut self,
        x: i32,
        y: i32,
        _code: ActionCode,
    ) -> Option<PickedObject> {
        self.objects
            .iter()
            .find(|((ox, oy), _)| (ox - x).abs() <= PICK_RADIUS && (oy - y).abs() <= PICK_RADIUS)
            .map(|(_, obj)| obj.clone())
    }

    fn check_object_dragged(
        &mut self,
        _phase: DragPhase,
        _x: i32,
        _y: i32,
        _code: ActionCode,
    ) -> bool {
        false
    }

    fn find_atoms_in_rectangle(&self, rect: ScreenRect) -> BTreeSet<usize> {
        self.atoms
            .iter()
            .filter(|(_, &(x, y))| rect.contains(x, y))
            .map(|(&i, _)| i)
            .collect()
    }

    fn molecule_atoms(&self, atom: usize, _ligand_only: bool) -> BTreeSet<usize> {
        self.molecules
            .iter()
            .find(|m| m.contains(&atom))
            .cloned()
            .unwrap_or_else(|| BTreeSet::from([atom]))
    }

    fn first_selected_atom(&self) -> Option<usize> {
        self.selected.first().copied()
    }

    fn is_atom_in_last_model(&self, atom: usize) -> bool {
        self.atoms.contains_key(&atom)
    }

    fn modelkit(&self) -> ModelkitInfo {
        self.modelkit.clone()
    }

    fn atom_element_number(&self, atom: usize) -> u32 {
        self.elements.get(&atom).copied().unwrap_or(6)
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn run_script_quiet(&mut self, script: &str) {
        self.scripts.push(script.to_owned());
    }

    fn mutate_selection(&mut self, atoms: &AtomSelection, op: SelectionOp) {
        if let (AtomSelection::Atoms(set), SelectionOp::Replace) = (atoms, op) {
            self.selected = set.clone();
        }
        self.selections.push((atoms.clone(), op));
    }

    fn show_pending_measurement(&mut self, session: Option<&MeasurementSession>) {
        self.pending.push(session.map(MeasurementSession::len));
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_in_motion(&mut self, in_motion: bool) {
        self.in_motion = in_motion;
    }

    fn hover_off(&mut self) {
        self.hover_offs += 1;
    }

    fn notify_mouse_clicked(
        &mut self,
        _x: i32,
        _y: i32,
        code: ActionCode,
        _kind: EventKind,
    ) -> Option<ActionCode> {
        (!self.veto).then_some(code)
    }

    fn open_popup_menu(&mut self, x: i32, y: i32, kind: PopupKind) {
        self.popups.push((x, y, kind));
    }

    fn log_gesture(&mut self, description: &str) {
        self.gestures.push(description.to_owned());
    }

    fn is_user_function(&self, name: &str) -> bool {
        self.user_functions.contains_key(name)
    }

    fn call_user_function(
        &mut self,
        name: &str,
        params: &[serde_json::Value],
    ) -> serde_json::Value {
        self.calls.push((name.to_owned(), params.to_vec()));
        self.user_functions
            .get(name)
            .cloned()
            .unwrap_or(serde_json::Value::Null)
    }

    fn execute(&mut self, command: ViewerCommand) {
        self.commands.push(command);
    }
}
