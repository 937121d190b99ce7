//! Press, drag, release, click, move and wheel handling.

use serde_json::Value;

use super::ActionDispatcher;
use crate::action::{ActionCode, ActionId};
use crate::input::{ButtonMods, EventKind};
use crate::picking::PickingMode;
use crate::session::{
    DragBehavior, DragMotion, DragSession, MeasureKind, MeasurePoint, MeasurementSession,
    PickOutcome,
};
use crate::viewer::{
    AtomSelection, Cursor, DragPhase, PickedKind, PickedObject, PopupKind, ScreenRect, SelectionOp,
    UndoKind, Viewer, ViewerCommand,
};

/// Pixels of slop allowed between presses of a multi-press.
const PRESS_RANGE: i32 = 20;

/// Actions that make a drag draw a rubber band instead.
const RUBBER_BAND_ACTIONS: [ActionId; 3] = [
    ActionId::SelectToggle,
    ActionId::SelectOr,
    ActionId::SelectAndNot,
];

impl<V: Viewer> ActionDispatcher<V> {
    // ── Move ──

    pub(super) fn on_move(&mut self, time: i64, x: i32, y: i32, modifiers: ButtonMods) {
        self.set_current(time, x, y, modifiers, true);
        self.mouse.moved.set_current(&self.mouse.current, 0);
        if self
            .measurement
            .as_ref()
            .is_some_and(|m| m.kind() != MeasureKind::AssignNew)
        {
            let preview = self
                .viewer
                .find_nearest_atom_index(x, y)
                .filter(|&atom| !self.measurement.as_ref().is_some_and(|m| m.has_atom(atom)))
                .map(MeasurePoint::Atom);
            if let Some(session) = &mut self.measurement {
                if session.set_preview(preview) {
                    self.viewer.show_pending_measurement(Some(&*session));
                }
            }
            self.refresh("measurementPending");
        } else if self.in_zoom_area(x) {
            let code = ActionCode::of(1, ButtonMods::LEFT, EventKind::Dragged);
            let _ = self.check_motion_rotate_zoom(code, 0, 0, false);
        } else if self.viewer.cursor() == Cursor::Zoom {
            self.viewer.set_cursor(Cursor::Default);
        }
    }

    // ── Press ──

    pub(super) fn on_press(&mut self, time: i64, x: i32, y: i32, modifiers: ButtonMods) {
        let repeat = self.pressed_count > 0
            && self.mouse.pressed.check(
                PRESS_RANGE,
                x,
                y,
                modifiers,
                time,
                self.options.mouse.double_click_ms,
            );
        self.pressed_count = if repeat { self.pressed_count + 1 } else { 1 };
        if self.pressed_count == 1 {
            self.set_current(time, x, y, modifiers, false);
        }
        self.set_mouse_actions(self.pressed_count, modifiers, false);
        self.viewer.set_cursor(Cursor::Hand);
        self.mouse.pressed.set_current(&self.mouse.current, 1);
        self.mouse.dragged.set_current(&self.mouse.current, 1);
        self.gesture.begin(self.codes.drag, time);
        self.check_pressed_action(x, y, time);
    }

    fn check_pressed_action(&mut self, x: i32, y: i32, time: i64) {
        let modifiers = self.codes.press.button_mods();
        if !modifiers.is_empty() {
            let Some(code) =
                self.viewer
                    .notify_mouse_clicked(x, y, self.codes.press, EventKind::Pressed)
            else {
                return;
            };
            self.set_mouse_actions(self.pressed_count, code.button_mods(), false);
        }
        let press = self.codes.press;
        let drag = self.codes.drag;
        self.set_mouse_mode();

        if self.is_draw_or_label_drag(drag) {
            let _ = self.viewer.check_object_dragged(DragPhase::Begin, x, y, drag);
            return;
        }
        if self.check_user_action(press, x, y, 0, 0, time) {
            return;
        }

        let mode = self.picking.atom_mode();
        if let Some(behavior) = DragBehavior::for_mode(mode) {
            let starts = if behavior == DragBehavior::AssignNew {
                self.bound(self.codes.click, ActionId::AssignNew)
            } else {
                self.bound_any(drag, behavior.press_actions())
            };
            if starts {
                if let Some(atom) = self.viewer.find_nearest_movable_atom_index(x, y, true) {
                    self.drag = Some(DragSession::begin(&self.viewer, atom, behavior));
                    if behavior == DragBehavior::AssignNew
                        && self.viewer.is_atom_in_last_model(atom)
                    {
                        self.reset_measurement();
                        self.measurement = Some(MeasurementSession::enter(
                            MeasureKind::AssignNew,
                            MeasurePoint::Atom(atom),
                        ));
                        self.show_pending();
                    }
                }
                return;
            }
        }

        if self.bound(press, ActionId::PopupMenu) {
            let kind = self.popup_kind(x, y);
            if self.invoke_user_action(ActionId::PopupMenu, &[Value::from(x), Value::from(y)]) {
                self.viewer.open_popup_menu(x, y, kind);
            }
            return;
        }

        if self.mode.drag_selected {
            let single_drag = ActionCode::of(1, modifiers, EventKind::Dragged);
            self.have_selection = !self.bound(single_drag, ActionId::DragSelected)
                || self
                    .viewer
                    .find_nearest_movable_atom_index(x, y, true)
                    .is_some();
            if (self.have_selection && self.bound(drag, ActionId::DragSelected))
                || self.bound(drag, ActionId::DragZ)
            {
                self.viewer.execute(ViewerCommand::BeginMoveSelected);
            }
            return;
        }
        let _ = self.check_motion_rotate_zoom(drag, 0, 0, true);
    }

    fn popup_kind(&mut self, x: i32, y: i32) -> PopupKind {
        if !self.viewer.flags().modelkit_mode {
            return PopupKind::Main;
        }
        let object = self.viewer.check_object_clicked(x, y, self.codes.click);
        if object.is_some_and(|o| o.kind == PickedKind::Bond) {
            PopupKind::Bond
        } else if self.viewer.find_nearest_atom_index(x, y).is_some() {
            PopupKind::Atom
        } else {
            PopupKind::Modelkit
        }
    }

    fn is_draw_or_label_drag(&self, drag: ActionCode) -> bool {
        (self.mode.draw
            && self.bound_any(drag, &[ActionId::DragDrawObject, ActionId::DragDrawPoint]))
            || (self.mode.label && self.bound(drag, ActionId::DragLabel))
    }

    // ── Drag ──

    pub(super) fn on_drag(&mut self, time: i64, x: i32, y: i32, modifiers: ButtonMods) {
        self.set_mouse_mode();
        self.set_mouse_actions(self.pressed_count.max(1), modifiers, false);
        let dx = x - self.mouse.dragged.x;
        let dy = y - self.mouse.dragged.y;
        self.set_current(time, x, y, modifiers, false);
        self.mouse.dragged.set_current(&self.mouse.current, -1);
        let _ = self.gesture.add(self.codes.drag, x, y, time);
        self.check_drag_wheel_action(self.codes.drag, x, y, dx, dy, time);
    }

    pub(super) fn on_wheel(&mut self, time: i64, rotation: i32, modifiers: ButtonMods) {
        let (x, y) = (self.mouse.current.x, self.mouse.current.y);
        self.set_current(time, x, y, modifiers, false);
        let code = ActionCode::of(1, modifiers, EventKind::Wheeled);
        self.check_drag_wheel_action(code, x, y, 0, rotation, time);
    }

    /// Interpret one drag sample or wheel step. The first matching
    /// interpretation wins.
    fn check_drag_wheel_action(
        &mut self,
        code: ActionCode,
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        time: i64,
    ) {
        let mut code = code;
        if !code.button_mods().is_empty() {
            let Some(rewritten) = self
                .viewer
                .notify_mouse_clicked(x, y, code, code.event_kind())
            else {
                return;
            };
            code = rewritten;
        }

        if self.picking.rubber_band_enabled()
            && self.bound_any(code.with_kind(EventKind::Clicked), &RUBBER_BAND_ACTIONS)
        {
            let factor = if self.viewer.flags().antialiased { 2 } else { 1 };
            let pressed = &self.mouse.pressed;
            self.rubber_band = Some(ScreenRect::from_corners(
                (pressed.x, pressed.y),
                (x, y),
                factor,
            ));
            self.refresh("rubberBand selection");
            return;
        }

        if self.check_user_action(code, x, y, dx, dy, time) {
            return;
        }

        if self.viewer.rotate_bond_index().is_some() {
            if self.bound(code, ActionId::RotateBranch) {
                self.viewer
                    .execute(ViewerCommand::RotateBranch { dx, dy, x, y });
                return;
            }
            if !self.bound(code, ActionId::Rotate) {
                self.viewer.execute(ViewerCommand::ClearRotateBond);
            }
        }

        let atom_drag = !self.mode.label
            && self
                .drag
                .as_ref()
                .is_some_and(|d| d.behavior() != DragBehavior::AssignNew);
        if atom_drag {
            self.set_motion(Cursor::Move, true);
            let degrees = (self.degrees(dx, true), self.degrees(dy, false));
            let motion = DragMotion {
                table: self.picking.bindings().active(),
                code,
                dx,
                dy,
                degrees,
                first_sample: self.gesture.point_count() == 1,
                allow_rotate_selected: self.options.picking.allow_rotate_selected,
            };
            if let Some(drag) = &self.drag {
                drag.apply_motion(&mut self.viewer, &motion);
            }
            return;
        }

        if self.picking.atom_mode() == PickingMode::AssignAtom
            && self.bound(self.codes.click, ActionId::AssignNew)
            && self.measurement.is_some()
        {
            self.trace_new_bond(x, y);
            return;
        }

        if self.bound(code, ActionId::Translate) {
            self.viewer.execute(ViewerCommand::TranslateXY { dx, dy });
            return;
        }

        if self.mode.drag_selected
            && self.have_selection
            && self.bound_any(code, &[ActionId::DragSelected, ActionId::RotateSelected])
        {
            let Some(first) = self.viewer.first_selected_atom() else {
                return;
            };
            self.viewer.execute(if self.gesture.point_count() == 1 {
                ViewerCommand::RecordUndo(UndoKind::Coordinates(first))
            } else {
                ViewerCommand::CommitMoveSelected
            });
            self.drag_selected(code, dx, dy);
            return;
        }

        if self.is_draw_or_label_drag(code) {
            self.set_motion(Cursor::Move, true);
            let phase = DragPhase::Move {
                from_x: x - dx,
                from_y: y - dy,
            };
            if self.viewer.check_object_dragged(phase, x, y, code) {
                return;
            }
        }

        if self.check_motion_rotate_zoom(code, dx, dy, true) {
            self.zoom_drag(code, dy);
            return;
        }

        if self.bound(code, ActionId::Rotate) {
            let degrees_x = self.degrees(dx, true);
            let degrees_y = self.degrees(dy, false);
            self.viewer.execute(ViewerCommand::RotateXY {
                degrees_x,
                degrees_y,
            });
            return;
        }

        if self.bound(code, ActionId::RotateZorZoom) {
            self.rotate_z_or_zoom(dx, dy);
            return;
        }

        if self.viewer.flags().slab_enabled {
            let clip = if self.bound(code, ActionId::Depth) {
                Some(ViewerCommand::Depth { pixels: dy })
            } else if self.bound(code, ActionId::Slab) {
                Some(ViewerCommand::Slab { pixels: dy })
            } else if self.bound(code, ActionId::SlabAndDepth) {
                Some(ViewerCommand::SlabAndDepth { pixels: dy })
            } else {
                None
            };
            if let Some(clip) = clip {
                self.viewer.execute(clip);
                return;
            }
        }

        if self.bound(code, ActionId::WheelZoom) {
            self.zoom_by_factor(dy);
            return;
        }

        if self.bound(code, ActionId::RotateZ) {
            self.set_motion(Cursor::Move, true);
            self.viewer.execute(ViewerCommand::RotateZ { degrees: -dx });
        }
    }

    /// Model kit: stretch the new bond to the atom under the pointer.
    fn trace_new_bond(&mut self, x: i32, y: i32) {
        let handled = match &self.measurement {
            Some(session) => self.viewer.handle_modelkit_drag(
                &self.mouse.pressed,
                &self.mouse.dragged,
                session.picks(),
            ),
            None => false,
        };
        let target = if handled {
            None
        } else {
            self.viewer.find_nearest_movable_atom_index(x, y, false)
        };
        if let Some(session) = &mut self.measurement {
            if !handled {
                session.truncate(1);
                if let Some(atom) = target {
                    let _ = session.add_pick(MeasurePoint::Atom(atom), true);
                }
            }
            session.set_trace(x, y);
        }
        self.refresh("assignNew");
    }

    // ── Release ──

    pub(super) fn on_release(&mut self, time: i64, x: i32, y: i32, modifiers: ButtonMods) {
        self.set_mouse_mode();
        self.set_current(time, x, y, modifiers, false);
        self.viewer.execute(ViewerCommand::StopSpin);
        let drag_release = !self.mouse.pressed.check(
            self.options.mouse.xy_range,
            x,
            y,
            modifiers,
            time,
            i64::MAX,
        );
        self.set_mouse_actions(self.pressed_count.max(1), modifiers, true);
        self.viewer.set_in_motion(false);
        self.viewer.set_cursor(Cursor::Default);
        let _ = self.gesture.add(self.codes.drag, x, y, time);
        if drag_release {
            self.viewer.execute(ViewerCommand::ClearRotateBond);
        }

        let drag = self.drag.take();
        if self.picking.atom_mode() == PickingMode::AssignAtom
            && self.bound(self.codes.click, ActionId::AssignNew)
        {
            if let (Some(drag), true) = (drag, self.measurement.is_some()) {
                self.assign_new(drag.atom(), x, y);
                self.exit_measurement(None);
            }
            return;
        }
        if let Some(drag) = drag {
            drag.release(&mut self.viewer);
        }

        if let Some(rect) = self.rubber_band.take() {
            if rect.width > 0 || rect.height > 0 {
                let atoms = self.viewer.find_atoms_in_rectangle(rect);
                let click = self.codes.click;
                let op = if self.bound(click, ActionId::SelectOr) {
                    SelectionOp::Or
                } else if self.bound(click, ActionId::SelectAndNot) {
                    SelectionOp::AndNot
                } else {
                    SelectionOp::Toggle
                };
                self.viewer.execute(ViewerCommand::ShowSelectionHalos);
                self.viewer.mutate_selection(&AtomSelection::Atoms(atoms), op);
                self.refresh("mouseReleased");
            }
        }

        let release = self.codes.press;
        let drag_code = self.codes.drag;
        if drag_release {
            let _ = self
                .viewer
                .notify_mouse_clicked(x, y, release, EventKind::Released);
        }
        if self.is_draw_or_label_drag(drag_code) {
            let _ = self
                .viewer
                .check_object_dragged(DragPhase::End, x, y, drag_code);
            return;
        }
        if self.have_selection
            && self.mode.drag_selected
            && self.bound(drag_code, ActionId::DragSelected)
        {
            self.viewer.execute(ViewerCommand::CommitMoveSelected);
        }
        if drag_release && self.check_user_action(release, x, y, 0, 0, time) {
            return;
        }
        if self.options.gesture.allow_gestures && self.bound(drag_code, ActionId::Swipe) {
            self.swipe();
        }
    }

    /// Throw the model into a spin if the pointer was still moving on
    /// release.
    fn swipe(&mut self) {
        let gesture = &self.options.gesture;
        let rate = self.gesture.exit_rate(
            gesture.min_delay_ms,
            gesture.multi_touch,
            self.viewer.screen_size(),
        );
        if rate > 0.0 {
            let (dx, dy) = self.gesture.displacement(4, 2);
            let rate = rate * 30.0 * self.options.gesture.swipe_factor;
            self.viewer.execute(ViewerCommand::SpinXY { dx, dy, rate });
        }
        if self.options.gesture.log_gestures {
            let description = self.gesture.to_string();
            self.viewer.log_gesture(&description);
        }
    }

    /// Model kit: commit the bond or atom traced from `atom`.
    fn assign_new(&mut self, atom: usize, x: i32, y: i32) {
        let kit = self.viewer.modelkit();
        let picks = self
            .measurement
            .as_ref()
            .map(|m| m.picks().to_vec())
            .unwrap_or_default();
        if picks.len() == 2 {
            self.viewer.execute(ViewerCommand::RecordUndo(UndoKind::State));
            self.viewer.execute(ViewerCommand::AssignConnect { picks });
            return;
        }
        if kit.atom_type == "Xx" {
            self.exit_measurement(Some("bond dropped"));
            return;
        }
        let pressed = self.mouse.pressed;
        let dragged = self.mouse.dragged;
        if pressed.in_range(self.options.mouse.xy_range, dragged.x, dragged.y) {
            self.viewer.execute(ViewerCommand::RecordUndo(if kit.assign_charge {
                UndoKind::FormalCharge(atom)
            } else {
                UndoKind::State
            }));
            self.viewer.execute(ViewerCommand::AssignAtom {
                atom,
                element: kit.atom_type,
                position: None,
                charge_label: kit.assign_charge,
            });
        } else if !kit.assign_charge {
            self.viewer.execute(ViewerCommand::RecordUndo(UndoKind::State));
            let command = if self.viewer.atom_element_number(atom) == 1 {
                ViewerCommand::AssignAtom {
                    atom,
                    element: "X".to_owned(),
                    position: None,
                    charge_label: false,
                }
            } else {
                ViewerCommand::AssignAtom {
                    atom,
                    element: kit.atom_type,
                    position: Some((x, y)),
                    charge_label: false,
                }
            };
            self.viewer.execute(command);
        }
    }

    // ── Click ──

    pub(super) fn on_click(
        &mut self,
        time: i64,
        x: i32,
        y: i32,
        count: u32,
        modifiers: ButtonMods,
    ) {
        self.set_mouse_mode();
        let repeat = self.clicked_count > 0
            && self.mouse.clicked.check(
                self.options.mouse.xy_range,
                x,
                y,
                modifiers,
                time,
                self.options.mouse.double_click_ms,
            );
        self.clicked_count = if count > 1 {
            count
        } else if repeat {
            self.clicked_count + 1
        } else {
            1
        };
        if self.clicked_count == 1 {
            self.set_current(time, x, y, modifiers, false);
        }
        self.set_mouse_actions(self.clicked_count, modifiers, false);
        self.mouse
            .clicked
            .set_current(&self.mouse.current, self.clicked_count as i32);

        let single_press = ActionCode::of(1, modifiers, EventKind::Pressed);
        if self.picking.atom_mode() != PickingMode::SelectAtom
            && self.bound(single_press, ActionId::SelectAndDrag)
        {
            return;
        }
        let Some(code) =
            self.viewer
                .notify_mouse_clicked(x, y, self.codes.click, EventKind::Clicked)
        else {
            return;
        };
        self.set_mouse_actions(self.clicked_count, code.button_mods(), false);
        self.check_click_action(x, y, time);
    }

    fn check_click_action(&mut self, x: i32, y: i32, time: i64) {
        let click = self.codes.click;
        if self.check_user_action(click, x, y, 0, 0, time) {
            return;
        }
        if self.clicked_count == 1 && self.bound(click, ActionId::ClickFrank) {
            if let Some(kind) = self.viewer.frank_hit(x, y) {
                self.viewer.open_popup_menu(x, y, kind);
                return;
            }
        }

        let object = if self.mode.draw {
            None
        } else {
            self.viewer.check_object_clicked(x, y, click)
        };
        if let Some(label_atom) = object
            .as_ref()
            .filter(|o| o.kind == PickedKind::Label && self.mode.label)
            .and_then(|o| o.atom)
        {
            self.pick_label(label_atom);
            return;
        }
        let kind = object.as_ref().map(|o| o.kind);
        if kind == Some(PickedKind::Isosurface) {
            return;
        }
        let point = object.as_ref().and_then(PickedObject::measure_point);
        let atom = self.find_nearest_atom(x, y, point.is_some(), true);

        if self.bound(click, ActionId::StopMotion) {
            self.viewer.execute(ViewerCommand::StopMotion);
        }

        if self.viewer.flags().navigation_mode
            && self.picking.atom_mode() == PickingMode::Navigate
            && self.bound(click, ActionId::PickNavigate)
        {
            let (width, height) = self.viewer.screen_size();
            self.viewer.execute(ViewerCommand::NavTranslatePercent {
                x: x as f32 * 100.0 / width.max(1) as f32 - 50.0,
                y: y as f32 * 100.0 / height.max(1) as f32 - 50.0,
            });
            return;
        }

        if kind == Some(PickedKind::Bond) {
            if let Some(bond) = object.as_ref().and_then(|o| o.index) {
                if self.bond_picked(bond) {
                    return;
                }
            }
        } else {
            if self
                .measurement
                .as_ref()
                .is_some_and(|m| m.kind() == MeasureKind::Free)
                && self.bound(click, ActionId::PickMeasure)
            {
                self.add_to_free_measurement(atom, point, false);
                return;
            }
            if self.bound(click, ActionId::SetMeasure) {
                if self
                    .measurement
                    .as_ref()
                    .is_some_and(|m| m.kind() == MeasureKind::Free)
                {
                    self.add_to_free_measurement(atom, point, true);
                } else if !self.mode.draw
                    && !self.mode.label
                    && !self.mode.drag_selected
                    && self.mode.measures_enabled
                {
                    if let Some(first) = atom.map(MeasurePoint::Atom).or(point) {
                        self.reset_measurement();
                        self.measurement =
                            Some(MeasurementSession::enter(MeasureKind::Free, first));
                        self.show_pending();
                    }
                }
                self.atom_or_point_picked(atom, point);
                return;
            }
        }

        if self.bound_any(
            click,
            &[
                ActionId::PickAtom,
                ActionId::PickPoint,
                ActionId::Select,
                ActionId::SelectToggle,
                ActionId::SelectAndNot,
                ActionId::SelectOr,
                ActionId::SelectToggleExtended,
                ActionId::SelectNone,
            ],
        ) {
            let params = [
                Value::from(x),
                Value::from(y),
                atom.map_or(Value::Null, Value::from),
            ];
            if kind != Some(PickedKind::Bond)
                && self.invoke_user_action(ActionId::PickAtom, &params)
            {
                self.atom_or_point_picked(atom, point);
            }
            return;
        }

        if let Some(atom) = atom.filter(|_| self.bound(click, ActionId::Center)) {
            self.viewer.execute(ViewerCommand::ZoomTo { atom });
            return;
        }
        if atom.is_none() && self.bound(click, ActionId::Reset) {
            self.viewer.execute(ViewerCommand::ResetView);
        }
    }

    /// Add a pick to the ad hoc measurement, finishing it when complete or,
    /// for a final pick, when it has at least two points.
    fn add_to_free_measurement(
        &mut self,
        atom: Option<usize>,
        point: Option<MeasurePoint>,
        is_final: bool,
    ) {
        let Some(pick) = atom.map(MeasurePoint::Atom).or(point) else {
            return;
        };
        let outcome = self
            .measurement
            .as_mut()
            .map(|session| session.add_pick(pick, is_final));
        self.show_pending();
        let finished = match outcome {
            Some(PickOutcome::Complete(measurement)) => Some(measurement),
            _ if is_final => self
                .measurement
                .as_ref()
                .filter(|m| (2..=4).contains(&m.len()))
                .map(MeasurementSession::measurement),
            _ => None,
        };
        if let Some(measurement) = finished {
            self.viewer.execute(ViewerCommand::Measure {
                measurement,
                persist: true,
            });
            self.exit_measurement(None);
        } else if is_final {
            self.exit_measurement(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use crate::options::InteractOptions;
    use crate::session::Measurement;
    use crate::viewer::testing::RecordingViewer;

    const LEFT: ButtonMods = ButtonMods::LEFT;

    fn dispatcher(atoms: &[(usize, (i32, i32))]) -> ActionDispatcher<RecordingViewer> {
        ActionDispatcher::new(RecordingViewer::with_atoms(atoms), InteractOptions::default())
    }

    fn click(d: &mut ActionDispatcher<RecordingViewer>, time: i64, x: i32, y: i32) {
        d.handle_event(InputEvent::Clicked {
            time,
            x,
            y,
            count: 1,
            modifiers: LEFT,
        });
    }

    /// Press at the first point, drag through the rest and release on the
    /// last, one sample every `step` milliseconds.
    fn stroke(
        d: &mut ActionDispatcher<RecordingViewer>,
        time: i64,
        step: i64,
        path: &[(i32, i32)],
    ) {
        let Some((&(x, y), rest)) = path.split_first() else {
            return;
        };
        d.handle_event(InputEvent::Pressed {
            time,
            x,
            y,
            count: 1,
            modifiers: LEFT,
        });
        let mut t = time;
        for &(x, y) in rest {
            t += step;
            d.handle_event(InputEvent::Dragged {
                time: t,
                x,
                y,
                modifiers: LEFT,
            });
        }
        let (x, y) = rest.last().copied().unwrap_or((x, y));
        d.handle_event(InputEvent::Released {
            time: t + step,
            x,
            y,
            modifiers: LEFT,
        });
    }

    fn measures(d: &ActionDispatcher<RecordingViewer>) -> Vec<&ViewerCommand> {
        d.viewer()
            .commands
            .iter()
            .filter(|c| matches!(c, ViewerCommand::Measure { .. }))
            .collect()
    }

    #[test]
    fn rotating_between_picks_keeps_measurement() {
        let mut d = dispatcher(&[(5, (50, 50)), (9, (200, 80))]);
        d.set_picking_mode(PickingMode::MeasureDistance);
        click(&mut d, 1_000, 50, 50);
        stroke(&mut d, 2_000, 20, &[(300, 300), (320, 300)]);
        assert!(d
            .viewer()
            .commands
            .iter()
            .any(|c| matches!(c, ViewerCommand::RotateXY { .. })));
        assert_eq!(d.measurement().map(MeasurementSession::len), Some(1));

        click(&mut d, 3_000, 200, 80);
        assert_eq!(
            measures(&d),
            [&ViewerCommand::Measure {
                measurement: Measurement {
                    kind: MeasureKind::Distance,
                    picks: vec![MeasurePoint::Atom(5), MeasurePoint::Atom(9)],
                },
                persist: false,
            }]
        );
    }

    #[test]
    fn fast_release_spins_with_scaled_rate() {
        let mut options = InteractOptions::default();
        options.gesture.allow_gestures = true;
        options.gesture.swipe_factor = 2.0;
        let mut d = ActionDispatcher::new(RecordingViewer::new(), options);
        stroke(
            &mut d,
            1_000,
            10,
            &[(100, 100), (110, 100), (120, 100), (130, 100), (140, 100), (150, 100)],
        );

        let exit_rate = d.gesture().exit_rate(10, false, (500, 500));
        assert!(exit_rate > 0.0 && exit_rate < 1.0, "{exit_rate}");
        let (dx, dy) = d.gesture().displacement(4, 2);
        assert!(dx > 0);
        let spin = d
            .viewer()
            .commands
            .iter()
            .find_map(|c| match c {
                ViewerCommand::SpinXY { dx, dy, rate } => Some((*dx, *dy, *rate)),
                _ => None,
            })
            .unwrap();
        assert_eq!((spin.0, spin.1), (dx, dy));
        assert!((spin.2 - exit_rate * 30.0 * 2.0).abs() < 1e-4, "{}", spin.2);
    }

    #[test]
    fn swipe_needs_gestures_enabled() {
        let mut d = dispatcher(&[]);
        stroke(
            &mut d,
            1_000,
            10,
            &[(100, 100), (110, 100), (120, 100), (130, 100), (140, 100)],
        );
        assert!(!d
            .viewer()
            .commands
            .iter()
            .any(|c| matches!(c, ViewerCommand::SpinXY { .. })));
    }

    #[test]
    fn pointer_exit_cancels_pending_measurement() {
        let mut d = dispatcher(&[(5, (50, 50))]);
        d.set_picking_mode(PickingMode::MeasureAngle);
        click(&mut d, 1_000, 50, 50);
        assert!(d.measurement().is_some());
        d.handle_event(InputEvent::Exited {
            time: 1_500,
            x: 0,
            y: 0,
        });
        assert!(d.measurement().is_none());
        assert_eq!(d.viewer().pending.last(), Some(&None));
        assert_eq!(d.viewer().cursor, Cursor::Default);
        assert!(measures(&d).is_empty());
    }

    #[test]
    fn double_click_concludes_two_point_measurement() {
        let mut d = dispatcher(&[(5, (50, 50)), (9, (200, 80))]);
        click(&mut d, 1_000, 50, 50);
        click(&mut d, 1_100, 50, 50);
        assert_eq!(
            d.measurement().map(MeasurementSession::kind),
            Some(MeasureKind::Free)
        );

        click(&mut d, 3_000, 200, 80);
        assert_eq!(d.measurement().map(MeasurementSession::len), Some(2));
        assert!(measures(&d).is_empty());

        click(&mut d, 3_100, 200, 80);
        assert_eq!(d.click_count(), 2);
        assert_eq!(
            measures(&d),
            [&ViewerCommand::Measure {
                measurement: Measurement {
                    kind: MeasureKind::Free,
                    picks: vec![MeasurePoint::Atom(5), MeasurePoint::Atom(9)],
                },
                persist: true,
            }]
        );
        assert!(d.measurement().is_none());
    }
}
