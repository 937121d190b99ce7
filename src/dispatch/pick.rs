//! What a click on an atom, bond or point does in each picking mode.

use super::ActionDispatcher;
use crate::action::ActionId;
use crate::picking::{BondPickingMode, PickingMode, PickingStyle};
use crate::session::{MeasureKind, MeasurePoint, MeasurementSession, PickOutcome};
use crate::viewer::{
    AtomSelection, ConnectMode, SelectScope, SelectionOp, UndoKind, Viewer, ViewerCommand,
};

impl<V: Viewer> ActionDispatcher<V> {
    /// Nearest pickable atom, unless a point was already hit or draw mode
    /// owns the click.
    pub(super) fn find_nearest_atom(
        &self,
        x: i32,
        y: i32,
        has_point: bool,
        is_clicked: bool,
    ) -> Option<usize> {
        if self.mode.draw || has_point {
            return None;
        }
        let checks_subset = is_clicked || self.measurement.is_none();
        self.viewer
            .find_nearest_atom_index(x, y)
            .filter(|&atom| !checks_subset || self.viewer.is_in_selection_subset(atom))
    }

    /// Act on a clicked bond. Returns `false` when the bond mode leaves the
    /// click to atom handling.
    pub(super) fn bond_picked(&mut self, bond: usize) -> bool {
        let mode = self.picking.bond_mode();
        let trigger = match mode {
            BondPickingMode::RotateBond | BondPickingMode::AssignBond => ActionId::AssignNew,
            _ => ActionId::DeleteBond,
        };
        if !self.bound(self.codes.click, trigger) {
            return false;
        }
        match mode {
            BondPickingMode::AssignBond => {
                let bond_type = self.viewer.modelkit().bond_type;
                self.viewer.execute(ViewerCommand::RecordUndo(UndoKind::State));
                self.viewer
                    .execute(ViewerCommand::AssignBond { bond, bond_type });
                true
            }
            BondPickingMode::RotateBond => {
                self.viewer.execute(ViewerCommand::SetRotateBond { bond });
                true
            }
            BondPickingMode::DeleteBond => {
                self.viewer.execute(ViewerCommand::DeleteBond { bond });
                true
            }
            BondPickingMode::Off | BondPickingMode::IdentifyBond => false,
        }
    }

    /// Toggle an atom's label, or prompt for new text on a double press.
    pub(super) fn pick_label(&mut self, atom: usize) {
        if self.pressed_count == 2 {
            self.viewer.execute(ViewerCommand::PromptLabel { atom });
            return;
        }
        self.viewer.execute(ViewerCommand::ToggleLabel { atom });
        self.viewer.execute(ViewerCommand::AtomPicked {
            atom: Some(atom),
            message: None,
        });
    }

    /// Route an atom or point pick through the current atom picking mode.
    pub(super) fn atom_or_point_picked(&mut self, atom: Option<usize>, point: Option<MeasurePoint>) {
        let click = self.codes.click;
        let mode = self.picking.atom_mode();
        let pick = atom.map(MeasurePoint::Atom).or(point);
        let is_axis_mode = matches!(mode, PickingMode::Spin | PickingMode::Symmetry);
        if pick.is_none() {
            self.reset_measurement();
            if self.bound(click, ActionId::SelectNone) {
                self.viewer.execute(ViewerCommand::SelectNone);
                return;
            }
            if !is_axis_mode {
                return;
            }
        }

        if let (Some(kind), Some(pick)) = (mode.measure_kind(), pick) {
            if kind != MeasureKind::Axis {
                self.measure_mode_picked(mode, kind, pick);
                return;
            }
        }

        let pending = self
            .measurement
            .as_ref()
            .is_some_and(|m| m.kind() == MeasureKind::Free);
        let mode = if pending && mode != PickingMode::Identify {
            PickingMode::Identify
        } else {
            mode
        };
        match mode {
            PickingMode::Center => {
                if self.bound(click, ActionId::PickAtom) {
                    match (atom, point) {
                        (Some(atom), _) => self.viewer.execute(ViewerCommand::ZoomTo { atom }),
                        (None, Some(MeasurePoint::Point { position, .. })) => self
                            .viewer
                            .execute(ViewerCommand::ZoomToPoint { point: position }),
                        _ => {}
                    }
                }
                return;
            }
            PickingMode::Spin | PickingMode::Symmetry => {
                self.two_atom_action(mode == PickingMode::Spin, pick);
            }
            _ => {}
        }
        let Some(atom) = atom else {
            return;
        };

        match mode {
            PickingMode::Identify => {
                if self.bound(click, ActionId::Center) {
                    self.viewer.execute(ViewerCommand::ZoomTo { atom });
                }
                self.atom_picked(atom, None);
            }
            PickingMode::Label => {
                if self.bound(click, ActionId::PickLabel) {
                    self.pick_label(atom);
                }
            }
            PickingMode::InvertStereo => {
                if self.bound(click, ActionId::AssignNew) {
                    self.viewer.execute(ViewerCommand::InvertStereo { atom });
                }
            }
            PickingMode::DeleteAtom => {
                if self.bound(click, ActionId::DeleteAtom) {
                    self.viewer.execute(ViewerCommand::DeleteAtom { atom });
                    self.atom_picked(atom, Some(format!("deleted: ({{{atom}}})")));
                }
            }
            _ => {
                if let Some(scope) = mode.select_scope() {
                    self.select_within(scope, atom);
                }
            }
        }
    }

    fn atom_picked(&mut self, atom: usize, message: Option<String>) {
        self.viewer.execute(ViewerCommand::AtomPicked {
            atom: Some(atom),
            message,
        });
    }

    /// Measure and connect modes: collect picks and act once enough are in.
    fn measure_mode_picked(&mut self, mode: PickingMode, kind: MeasureKind, pick: MeasurePoint) {
        let trigger = match kind {
            MeasureKind::Connect(ConnectMode::Delete) => ActionId::DeleteBond,
            MeasureKind::Connect(_) => ActionId::ConnectAtoms,
            _ => ActionId::PickMeasure,
        };
        if !self.bound(self.codes.click, trigger) {
            return;
        }
        let PickOutcome::Complete(measurement) = self.queue_pick(kind, pick) else {
            return;
        };
        match kind {
            MeasureKind::Connect(mode) => self.viewer.execute(ViewerCommand::Connect {
                picks: measurement.picks,
                mode,
            }),
            MeasureKind::Sequence => {
                let first = measurement.picks.first().and_then(MeasurePoint::atom);
                let last = measurement.picks.last().and_then(MeasurePoint::atom);
                if let (Some(from), Some(to)) = (first, last) {
                    self.viewer
                        .execute(ViewerCommand::MeasureSequence { from, to });
                }
            }
            _ => {
                let persist = mode == PickingMode::Measure
                    || self.picking.measurement_style() == PickingStyle::MeasureOn;
                self.viewer.execute(ViewerCommand::Measure {
                    measurement,
                    persist,
                });
            }
        }
        self.reset_measurement();
    }

    /// Add `pick` to the shown session, starting a fresh one when the kind
    /// differs.
    fn queue_pick(&mut self, kind: MeasureKind, pick: MeasurePoint) -> PickOutcome {
        let continues = self
            .measurement
            .as_ref()
            .is_some_and(|m| m.kind() == kind && m.len() < m.required());
        if !continues {
            self.reset_measurement();
            self.measurement = Some(MeasurementSession::enter(kind, pick));
            self.show_pending();
            return PickOutcome::Collecting(1);
        }
        let outcome = self
            .measurement
            .as_mut()
            .map_or(PickOutcome::Rejected, |m| m.add_pick(pick, false));
        self.show_pending();
        outcome
    }

    /// Spin and symmetry: queue two points defining an axis.
    fn two_atom_action(&mut self, is_spin: bool, pick: Option<MeasurePoint>) {
        let flags = self.viewer.flags();
        if flags.spin_on || flags.nav_on || self.measurement.is_some() {
            self.reset_measurement();
            if flags.spin_on {
                self.viewer.execute(ViewerCommand::SpinOff);
            }
            return;
        }
        if self.axis.as_ref().is_some_and(|a| a.len() >= 2) {
            self.axis = None;
        }
        if let (Some(axis), Some(pick)) = (&self.axis, pick) {
            if axis.len() == 1 && axis.picks().first().is_some_and(|p| p.coincides(&pick)) {
                return;
            }
        }
        if let Some(pick) = pick {
            match &mut self.axis {
                Some(axis) => {
                    let _ = axis.add_pick(pick, false);
                }
                None => self.axis = Some(MeasurementSession::enter(MeasureKind::Axis, pick)),
            }
        }
        let queued = self.axis.as_ref().map_or(0, MeasurementSession::len);
        if queued < 2 {
            let status = match (is_spin, queued) {
                (true, 1) => "pick one more atom in order to spin the model around an axis",
                (true, _) => "pick two atoms in order to spin the model around an axis",
                (false, 1) => "pick one more atom in order to display the symmetry relationship",
                (false, _) => {
                    "pick two atoms in order to display the symmetry relationship between them"
                }
            };
            self.viewer
                .execute(ViewerCommand::ScriptStatus(status.to_owned()));
            return;
        }
        let picks = self
            .axis
            .as_ref()
            .map(|a| a.picks().to_vec())
            .unwrap_or_default();
        self.viewer.execute(if is_spin {
            ViewerCommand::Spin {
                picks,
                rate: self.options.picking.spin_rate,
            }
        } else {
            ViewerCommand::ShowSymmetry { picks }
        });
    }

    /// Select-by modes: apply the click's selection operator to the scope
    /// around `atom`.
    fn select_within(&mut self, scope: SelectScope, atom: usize) {
        if self.measurement.is_some() {
            return;
        }
        let click = self.codes.click;
        let op = if self.picking.rubber_band_enabled() || self.bound(click, ActionId::SelectToggle)
        {
            Some(SelectionOp::Toggle)
        } else if self.bound(click, ActionId::SelectAndNot) {
            Some(SelectionOp::AndNot)
        } else if self.bound(click, ActionId::SelectOr) {
            Some(SelectionOp::Or)
        } else if self.bound(click, ActionId::SelectToggleExtended) {
            Some(SelectionOp::ToggleExtended)
        } else if self.bound(click, ActionId::Select) {
            Some(SelectionOp::Replace)
        } else {
            None
        };
        if let Some(op) = op {
            self.viewer
                .mutate_selection(&AtomSelection::Within { scope, atom }, op);
        }
        self.atom_picked(atom, None);
        self.refresh("selections set");
    }
}
