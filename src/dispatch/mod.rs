//! The input interpreter.
//!
//! [`ActionDispatcher`] owns every piece of interaction state (pointer
//! snapshots, gesture samples, picking axes, measurement and drag
//! sessions) and turns each [`InputEvent`] into calls on its [`Viewer`].
//! All handlers run to completion on the caller's thread. The only
//! concurrent piece is the optional hover watcher, which talks to the
//! dispatcher through [`ActionDispatcher::poll_hover`].
//!
//! The implementation is split by concern:
//! - `pointer`: press, drag, release, click, move and wheel handling
//! - `pick`: what a click on an atom, bond or point does
//! - `camera`: rotation, zoom and cursor helpers
//! - `keys`: modifier chords and navigation keys
//! - `user`: user script bindings and user action hooks

mod camera;
mod keys;
mod pick;
mod pointer;
mod user;

use std::fmt;

use web_time::Duration;

use crate::action::{ActionCode, ActionId};
use crate::binding::BindingTable;
use crate::error::InteractError;
use crate::input::{
    ButtonMods, EventKind, GestureTracker, HoverWatcher, InputEvent, MouseHistory,
    MouseSnapshot,
};
use crate::options::InteractOptions;
use crate::picking::{PickingController, PickingMode, PickingStyle};
use crate::session::{DragSession, MeasurementSession};
use crate::viewer::{Cursor, ScreenRect, Viewer, ViewerCommand};

/// Action codes derived from the current button state, one per event kind
/// the state can still produce.
#[derive(Debug, Clone, Copy, Default)]
struct MouseCodes {
    press: ActionCode,
    drag: ActionCode,
    click: ActionCode,
}

/// Flags derived from the picking mode at the start of each pointer event.
#[derive(Debug, Clone, Copy)]
struct MouseMode {
    draw: bool,
    label: bool,
    drag_selected: bool,
    measures_enabled: bool,
}

impl Default for MouseMode {
    fn default() -> Self {
        Self {
            draw: false,
            label: false,
            drag_selected: false,
            measures_enabled: true,
        }
    }
}

/// Interprets raw input against bindings and picking state, driving `V`.
pub struct ActionDispatcher<V: Viewer> {
    viewer: V,
    options: InteractOptions,
    picking: PickingController,
    mouse: MouseHistory,
    gesture: GestureTracker,

    /// Measurement being picked and shown as pending.
    measurement: Option<MeasurementSession>,
    /// Two-point axis queued by spin or symmetry picking.
    axis: Option<MeasurementSession>,
    drag: Option<DragSession>,
    rubber_band: Option<ScreenRect>,

    codes: MouseCodes,
    mode: MouseMode,
    pressed_count: u32,
    clicked_count: u32,
    have_selection: bool,
    zoom_trigger: bool,
    alt_released: bool,
    key_processing: bool,

    hover: Option<HoverWatcher>,
    seq: u64,
}

impl<V: Viewer> fmt::Debug for ActionDispatcher<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("atom_mode", &self.picking.atom_mode())
            .field("bond_mode", &self.picking.bond_mode())
            .field("style", &self.picking.style())
            .field("measurement", &self.measurement)
            .field("drag", &self.drag)
            .field("pressed_count", &self.pressed_count)
            .field("clicked_count", &self.clicked_count)
            .field("hover_running", &self.hover_watcher_running())
            .finish_non_exhaustive()
    }
}

impl<V: Viewer> ActionDispatcher<V> {
    /// Create a dispatcher in identify mode with the default bindings.
    ///
    /// The hover watcher is not started; call
    /// [`start_hover_watcher`](Self::start_hover_watcher) once the host
    /// delivers events.
    pub fn new(viewer: V, options: InteractOptions) -> Self {
        let gesture = GestureTracker::new(options.gesture.capacity);
        Self {
            viewer,
            options,
            picking: PickingController::new(),
            mouse: MouseHistory::default(),
            gesture,
            measurement: None,
            axis: None,
            drag: None,
            rubber_band: None,
            codes: MouseCodes::default(),
            mode: MouseMode::default(),
            pressed_count: 0,
            clicked_count: 0,
            have_selection: false,
            zoom_trigger: false,
            alt_released: true,
            key_processing: false,
            hover: None,
            seq: 0,
        }
    }

    // ── Accessors ──

    /// The driven viewer.
    #[must_use]
    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// The driven viewer, mutably.
    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &InteractOptions {
        &self.options
    }

    /// Replace the options. The gesture buffer is rebuilt if its capacity
    /// changed.
    pub fn set_options(&mut self, options: InteractOptions) {
        if options.gesture.capacity != self.gesture.capacity() {
            self.gesture = GestureTracker::new(options.gesture.capacity);
        }
        if !options.hover.enabled {
            self.stop_hover_watcher();
        }
        self.options = options;
    }

    /// Picking state.
    #[must_use]
    pub fn picking(&self) -> &PickingController {
        &self.picking
    }

    /// Measurement currently being picked.
    #[must_use]
    pub fn measurement(&self) -> Option<&MeasurementSession> {
        self.measurement.as_ref()
    }

    /// Pointer snapshots.
    #[must_use]
    pub fn mouse(&self) -> &MouseHistory {
        &self.mouse
    }

    /// Drag gesture samples.
    #[must_use]
    pub fn gesture(&self) -> &GestureTracker {
        &self.gesture
    }

    /// Index of the atom being dragged, or -1.
    #[must_use]
    pub fn dragged_index(&self) -> i32 {
        self.drag.as_ref().map_or(-1, |d| d.atom() as i32)
    }

    /// Click count of the last click sequence.
    #[must_use]
    pub fn click_count(&self) -> u32 {
        self.clicked_count
    }

    /// Rubber band rectangle while one is being dragged.
    #[must_use]
    pub fn rubber_band(&self) -> Option<ScreenRect> {
        self.rubber_band
    }

    // ── Event entry point ──

    /// Interpret one input event.
    ///
    /// Unbound input is silently ignored.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Moved {
                time,
                x,
                y,
                modifiers,
            } => {
                let x = self.normalize_x(x);
                self.on_move(time, x, y, modifiers);
            }
            InputEvent::Pressed {
                time,
                x,
                y,
                modifiers,
                ..
            } => {
                let x = self.normalize_x(x);
                self.on_press(time, x, y, modifiers);
            }
            InputEvent::Dragged {
                time,
                x,
                y,
                modifiers,
            } => {
                let x = self.normalize_x(x);
                self.on_drag(time, x, y, modifiers);
            }
            InputEvent::Released {
                time,
                x,
                y,
                modifiers,
            } => {
                let x = self.normalize_x(x);
                self.on_release(time, x, y, modifiers);
            }
            InputEvent::Clicked {
                time,
                x,
                y,
                count,
                modifiers,
            } => {
                let x = self.normalize_x(x);
                self.on_click(time, x, y, count, modifiers);
            }
            InputEvent::Wheeled {
                time,
                rotation,
                modifiers,
            } => self.on_wheel(time, rotation, modifiers),
            InputEvent::Entered { time, x, y } => {
                let x = self.normalize_x(x);
                self.set_current(time, x, y, ButtonMods::empty(), false);
                self.start_hover_watcher();
            }
            InputEvent::Exited { time, x, y } => {
                let x = self.normalize_x(x);
                self.set_current(time, x, y, ButtonMods::empty(), false);
                self.exit_measurement(Some("mouseExit"));
                self.stop_hover_watcher();
            }
            InputEvent::KeyDown { key, modifiers } => self.on_key_down(key, modifiers),
            InputEvent::KeyUp { key } => self.on_key_up(key),
        }
    }

    // ── Host ports ──

    /// Current atom picking mode.
    #[must_use]
    pub fn current_picking_mode(&self) -> PickingMode {
        self.picking.atom_mode()
    }

    /// Current picking style.
    #[must_use]
    pub fn current_picking_style(&self) -> PickingStyle {
        self.picking.style()
    }

    /// Change the picking mode, discarding a pending measurement when the
    /// atom mode changes.
    pub fn set_picking_mode(&mut self, mode: PickingMode) {
        if self.picking.set_picking_mode(mode) {
            self.reset_measurement();
        }
        if mode == PickingMode::Reset {
            self.rubber_band = None;
        }
    }

    /// Change the picking style, swapping the binding table.
    pub fn set_picking_style(&mut self, style: PickingStyle) {
        if self.picking.set_picking_style(style) {
            self.reset_measurement();
        }
    }

    /// Bind a descriptor to an action name or user script.
    ///
    /// # Errors
    ///
    /// Returns [`InteractError::InvalidActionCode`] if the descriptor does
    /// not parse.
    pub fn bind(&mut self, descriptor: &str, name: &str) -> Result<(), InteractError> {
        self.picking.bindings_mut().bind(descriptor, name)
    }

    /// Remove bindings. With neither argument every table returns to its
    /// preset.
    ///
    /// # Errors
    ///
    /// Returns [`InteractError::InvalidActionCode`] if the descriptor does
    /// not parse.
    pub fn unbind(
        &mut self,
        descriptor: Option<&str>,
        name: Option<&str>,
    ) -> Result<(), InteractError> {
        self.picking.bindings_mut().unbind(descriptor, name)?;
        if descriptor.is_none() && name.is_none() {
            let style = self.picking.selection_style();
            let _ = self.picking.set_picking_style(style);
        }
        Ok(())
    }

    /// Help text for the active bindings.
    #[must_use]
    pub fn binding_description(&self, filter: Option<&str>) -> String {
        self.table().describe(filter)
    }

    /// `bind` commands recreating the active table.
    #[must_use]
    pub fn bindings_state_script(&self) -> String {
        self.table().state_script()
    }

    /// Script fragment restoring the picking state.
    #[must_use]
    pub fn picking_state_script(&self) -> String {
        let modelkit_mode = self.viewer.flags().modelkit_mode;
        self.picking
            .picking_state_script(modelkit_mode, &self.viewer.modelkit())
    }

    /// Forget click counts, the gesture and any pending measurement.
    pub fn clear_mouse_info(&mut self) {
        self.pressed_count = 0;
        self.clicked_count = 0;
        self.gesture.begin(ActionCode::NONE, 0);
        self.exit_measurement(None);
    }

    /// Return to identify mode and the root selection style, and stop the
    /// hover watcher.
    pub fn clear(&mut self) {
        self.stop_hover_watcher();
        if self.picking.clear() {
            self.reset_measurement();
        }
        self.alt_released = true;
    }

    // ── Hover ──

    /// Start the hover watcher. No-op when running or disabled.
    pub fn start_hover_watcher(&mut self) {
        if !self.options.hover.enabled || self.hover.as_ref().is_some_and(HoverWatcher::is_running)
        {
            return;
        }
        let mut state = self.mouse.current;
        state.time = -1;
        let initial = MouseSnapshot {
            seq: self.seq,
            state,
            is_move: false,
        };
        let delay = Duration::from_millis(self.options.hover.delay_ms);
        match HoverWatcher::spawn(delay, initial) {
            Ok(watcher) => self.hover = Some(watcher),
            Err(e) => log::debug!("hover watcher unavailable: {e}"),
        }
    }

    /// Stop the hover watcher. No-op when not running.
    pub fn stop_hover_watcher(&mut self) {
        if let Some(mut watcher) = self.hover.take() {
            watcher.stop();
        }
    }

    /// Whether the hover watcher is running.
    #[must_use]
    pub fn hover_watcher_running(&self) -> bool {
        self.hover.as_ref().is_some_and(HoverWatcher::is_running)
    }

    /// Apply the newest hover request from the watcher, if any. Call from
    /// the event thread, e.g. once per frame.
    pub fn poll_hover(&mut self) {
        let Some(request) = self.hover.as_ref().and_then(HoverWatcher::try_recv) else {
            return;
        };
        if request.seq == self.seq {
            self.check_hover();
        }
    }

    /// React to the pointer resting at the current position.
    fn check_hover(&mut self) {
        if self.zoom_trigger {
            self.zoom_trigger = false;
            if self.viewer.cursor() == Cursor::Zoom {
                self.viewer.set_cursor(Cursor::Default);
            }
            self.viewer.set_in_motion(false);
            return;
        }
        let flags = self.viewer.flags();
        let (x, y) = (self.mouse.current.x, self.mouse.current.y);
        if flags.in_motion || flags.spin_on || flags.nav_on || self.viewer.check_object_hovered(x, y) {
            return;
        }
        let Some(atom) = self.viewer.find_nearest_atom_index(x, y) else {
            return;
        };
        let label_drag = ActionCode::of(
            1,
            self.mouse.moved.modifiers | ButtonMods::LEFT,
            EventKind::Dragged,
        );
        let is_label = self.picking.atom_mode() == PickingMode::Label
            && self.bound(label_drag, ActionId::DragLabel);
        self.viewer.execute(ViewerCommand::HoverOn { atom, is_label });
    }

    // ── Shared helpers ──

    fn table(&self) -> &BindingTable {
        self.picking.bindings().active()
    }

    fn bound(&self, code: ActionCode, id: ActionId) -> bool {
        self.table().is_bound(code, id)
    }

    fn bound_any(&self, code: ActionCode, ids: &[ActionId]) -> bool {
        self.table().is_bound_any(code, ids)
    }

    fn normalize_x(&self, x: i32) -> i32 {
        if self.viewer.flags().stereo_doubled {
            x << 1
        } else {
            x
        }
    }

    /// Record the latest pointer state and publish it to the hover watcher.
    fn set_current(&mut self, time: i64, x: i32, y: i32, modifiers: ButtonMods, is_move: bool) {
        self.viewer.hover_off();
        self.mouse.current.set(time, x, y, modifiers);
        self.publish(is_move);
    }

    fn publish(&mut self, is_move: bool) {
        self.seq += 1;
        let snapshot = MouseSnapshot {
            seq: self.seq,
            state: self.mouse.current,
            is_move,
        };
        if let Some(watcher) = &mut self.hover {
            watcher.publish(snapshot);
        }
    }

    fn set_mouse_actions(&mut self, count: u32, modifiers: ButtonMods, is_release: bool) {
        let press_kind = if is_release {
            EventKind::Released
        } else {
            EventKind::Pressed
        };
        self.codes = MouseCodes {
            press: ActionCode::of(count, modifiers, press_kind),
            drag: ActionCode::of(count, modifiers, EventKind::Dragged),
            click: ActionCode::of(count, modifiers, EventKind::Clicked),
        };
    }

    fn set_mouse_mode(&mut self) {
        let drag_selected = self.options.picking.drag_selected;
        let mut mode = MouseMode {
            draw: false,
            label: false,
            drag_selected,
            measures_enabled: !drag_selected,
        };
        // Drag-selected, draw, label and select-atom modes cannot carry a
        // pending measurement.
        let mut exits = drag_selected;
        if !drag_selected {
            match self.picking.atom_mode() {
                PickingMode::AssignAtom => {
                    mode.measures_enabled = !self.viewer.modelkit().assign_charge;
                }
                PickingMode::Draw => {
                    mode.draw = true;
                    mode.measures_enabled = false;
                    exits = true;
                }
                PickingMode::Label => {
                    mode.label = true;
                    mode.measures_enabled = false;
                    exits = true;
                }
                PickingMode::SelectAtom => {
                    mode.measures_enabled = false;
                    exits = true;
                }
                PickingMode::MeasureDistance
                | PickingMode::MeasureAngle
                | PickingMode::MeasureTorsion
                | PickingMode::MeasureSequence => mode.measures_enabled = false,
                _ => {}
            }
        }
        self.mode = mode;
        if exits {
            self.exit_measurement(None);
        }
    }

    fn refresh(&mut self, reason: &'static str) {
        self.viewer.execute(ViewerCommand::Refresh { reason });
    }

    fn show_pending(&mut self) {
        self.viewer.show_pending_measurement(self.measurement.as_ref());
    }

    /// Drop the pending measurement.
    fn exit_measurement(&mut self, reason: Option<&str>) {
        if self.measurement.take().is_none() {
            return;
        }
        if let Some(reason) = reason {
            log::debug!("measurement cancelled: {reason}");
        }
        self.viewer.show_pending_measurement(None);
        self.viewer.set_cursor(Cursor::Default);
    }

    /// Drop the pending measurement and any queued axis.
    fn reset_measurement(&mut self) {
        self.exit_measurement(None);
        self.axis = None;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::input::Key;
    use crate::session::{MeasureKind, MeasurePoint, Measurement};
    use crate::viewer::testing::RecordingViewer;
    use crate::viewer::{
        AtomSelection, ConnectMode, ModelkitInfo, PopupKind, SelectScope, SelectionOp,
        UndoKind,
    };

    const LEFT: ButtonMods = ButtonMods::LEFT;

    fn dispatcher(atoms: &[(usize, (i32, i32))]) -> ActionDispatcher<RecordingViewer> {
        ActionDispatcher::new(RecordingViewer::with_atoms(atoms), InteractOptions::default())
    }

    fn click(d: &mut ActionDispatcher<RecordingViewer>, time: i64, x: i32, y: i32) {
        click_with(d, time, x, y, LEFT);
    }

    fn click_with(
        d: &mut ActionDispatcher<RecordingViewer>,
        time: i64,
        x: i32,
        y: i32,
        modifiers: ButtonMods,
    ) {
        d.handle_event(InputEvent::Clicked {
            time,
            x,
            y,
            count: 1,
            modifiers,
        });
    }

    fn press(d: &mut ActionDispatcher<RecordingViewer>, time: i64, x: i32, y: i32) {
        d.handle_event(InputEvent::Pressed {
            time,
            x,
            y,
            count: 1,
            modifiers: LEFT,
        });
    }

    fn drag_to(d: &mut ActionDispatcher<RecordingViewer>, time: i64, x: i32, y: i32) {
        d.handle_event(InputEvent::Dragged {
            time,
            x,
            y,
            modifiers: LEFT,
        });
    }

    fn release(d: &mut ActionDispatcher<RecordingViewer>, time: i64, x: i32, y: i32) {
        d.handle_event(InputEvent::Released {
            time,
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

    // ── Scenarios ──

    #[test]
    fn double_click_bound_to_center_zooms_to_atom() {
        let mut d = dispatcher(&[(7, (100, 100))]);
        d.bind("double-click,left", "center").unwrap();
        click(&mut d, 1_000, 100, 100);
        assert!(!d.viewer().commands.contains(&ViewerCommand::ZoomTo { atom: 7 }));
        click(&mut d, 1_100, 100, 100);
        assert_eq!(d.click_count(), 2);
        assert!(d.viewer().commands.contains(&ViewerCommand::ZoomTo { atom: 7 }));
    }

    #[test]
    fn distance_measurement_from_two_picks() {
        let mut d = dispatcher(&[(5, (50, 50)), (9, (200, 80))]);
        d.set_picking_mode(PickingMode::MeasureDistance);
        click(&mut d, 1_000, 50, 50);
        assert_eq!(d.measurement().map(MeasurementSession::len), Some(1));
        assert!(measures(&d).is_empty());

        click(&mut d, 3_000, 200, 80);
        let expected = Measurement {
            kind: MeasureKind::Distance,
            picks: vec![MeasurePoint::Atom(5), MeasurePoint::Atom(9)],
        };
        assert_eq!(
            measures(&d),
            [&ViewerCommand::Measure {
                measurement: expected.clone(),
                persist: false
            }]
        );
        assert_eq!(expected.to_string(), "distance (atom 5, atom 9)");
        assert!(d.measurement().is_none());
        assert_eq!(d.viewer().pending.last(), Some(&None));
    }

    #[test]
    fn drag_atom_moves_without_depth_and_clears_sentinel() {
        let mut d = dispatcher(&[(3, (10, 10))]);
        d.set_picking_mode(PickingMode::DragAtom);
        press(&mut d, 1_000, 10, 10);
        assert_eq!(d.dragged_index(), 3);
        drag_to(&mut d, 1_020, 15, 13);
        assert!(d.viewer().commands.contains(&ViewerCommand::MoveAtom {
            atom: 3,
            dx: 5,
            dy: 3,
            dz: None,
            atoms: None,
        }));
        assert!(d
            .viewer()
            .commands
            .contains(&ViewerCommand::RecordUndo(UndoKind::Coordinates(3))));
        release(&mut d, 1_040, 15, 13);
        assert_eq!(d.dragged_index(), -1);
        assert!(!d.viewer().in_motion);
    }

    // ── Properties ──

    #[test]
    fn every_drag_mode_resets_sentinel_on_release() {
        for mode in [
            PickingMode::DragAtom,
            PickingMode::DragSelected,
            PickingMode::DragMolecule,
            PickingMode::DragLigand,
            PickingMode::DragMinimize,
            PickingMode::DragMinimizeMolecule,
            PickingMode::AssignAtom,
        ] {
            let mut d = dispatcher(&[(1, (30, 30))]);
            d.set_picking_mode(mode);
            press(&mut d, 1_000, 30, 30);
            drag_to(&mut d, 1_020, 40, 30);
            release(&mut d, 1_040, 40, 30);
            assert_eq!(d.dragged_index(), -1, "{mode}");
        }
    }

    #[test]
    fn minimize_drag_requests_minimization() {
        let mut d = dispatcher(&[(1, (30, 30))]);
        d.set_picking_mode(PickingMode::DragMinimize);
        press(&mut d, 1_000, 30, 30);
        drag_to(&mut d, 1_020, 35, 30);
        release(&mut d, 1_040, 35, 30);
        assert!(d.viewer().commands.contains(&ViewerCommand::Minimize {
            atom: 1,
            molecule: false
        }));
    }

    #[test]
    fn click_counting_respects_time_and_range() {
        let mut d = dispatcher(&[]);
        click(&mut d, 1_000, 100, 100);
        click(&mut d, 1_500, 104, 98);
        assert_eq!(d.click_count(), 2);
        click(&mut d, 3_000, 104, 98);
        assert_eq!(d.click_count(), 1);
        click(&mut d, 3_100, 130, 98);
        assert_eq!(d.click_count(), 1);
    }

    #[test]
    fn mode_change_discards_collecting_measurement() {
        let mut d = dispatcher(&[(5, (50, 50))]);
        d.set_picking_mode(PickingMode::MeasureAngle);
        click(&mut d, 1_000, 50, 50);
        assert!(d.measurement().is_some());
        d.set_picking_mode(PickingMode::AssignBond);
        assert!(d.measurement().is_some());
        assert_eq!(d.current_picking_mode(), PickingMode::MeasureAngle);
        d.set_picking_mode(PickingMode::MeasureTorsion);
        assert!(d.measurement().is_none());
    }

    #[test]
    fn charge_assignment_disables_click_measurements() {
        for (assign_charge, measures) in [(false, true), (true, false)] {
            let mut d = dispatcher(&[(1, (30, 30))]);
            d.viewer_mut().modelkit = ModelkitInfo {
                assign_charge,
                ..ModelkitInfo::default()
            };
            d.set_picking_mode(PickingMode::AssignAtom);
            click(&mut d, 1_000, 30, 30);
            click(&mut d, 1_100, 30, 30);
            assert_eq!(d.click_count(), 2);
            assert_eq!(
                d.measurement().map(MeasurementSession::kind) == Some(MeasureKind::Free),
                measures,
                "assign_charge={assign_charge}"
            );
        }
    }

    #[test]
    fn drag_selected_drops_pending_measurement() {
        let mut d = dispatcher(&[(5, (50, 50))]);
        click(&mut d, 1_000, 50, 50);
        click(&mut d, 1_100, 50, 50);
        assert_eq!(
            d.measurement().map(MeasurementSession::kind),
            Some(MeasureKind::Free)
        );
        press(&mut d, 2_000, 300, 300);
        release(&mut d, 2_020, 300, 300);
        assert!(d.measurement().is_some());

        let mut options = d.options().clone();
        options.picking.drag_selected = true;
        d.set_options(options);
        press(&mut d, 3_000, 300, 300);
        assert!(d.measurement().is_none());
        assert_eq!(d.viewer().pending.last(), Some(&None));
    }

    #[test]
    fn escape_and_mouse_exit_cancel_measurement() {
        let mut d = dispatcher(&[(5, (50, 50))]);
        d.set_picking_mode(PickingMode::MeasureDistance);
        click(&mut d, 1_000, 50, 50);
        d.handle_event(InputEvent::KeyDown {
            key: Key::Escape,
            modifiers: ButtonMods::empty(),
        });
        assert!(d.measurement().is_none());

        click(&mut d, 3_000, 50, 50);
        assert!(d.measurement().is_some());
        d.handle_event(InputEvent::Exited {
            time: 3_100,
            x: 0,
            y: 0,
        });
        assert!(d.measurement().is_none());
    }

    #[test]
    fn veto_leaves_sessions_untouched() {
        let mut d = dispatcher(&[(5, (50, 50)), (9, (200, 80))]);
        d.set_picking_mode(PickingMode::MeasureDistance);
        click(&mut d, 1_000, 50, 50);
        d.viewer_mut().veto = true;
        click(&mut d, 3_000, 200, 80);
        assert_eq!(d.measurement().map(MeasurementSession::len), Some(1));
        assert!(measures(&d).is_empty());
    }

    #[test]
    fn unbound_input_is_ignored() {
        let mut d = dispatcher(&[]);
        click_with(&mut d, 1_000, 10, 10, ButtonMods::RIGHT | ButtonMods::SHIFT);
        assert!(d.viewer().significant().is_empty());
        assert!(d.viewer().scripts.is_empty());
    }

    // ── Camera ──

    #[test]
    fn left_drag_rotates_by_degrees() {
        let mut d = dispatcher(&[]);
        press(&mut d, 1_000, 100, 100);
        drag_to(&mut d, 1_020, 110, 100);
        assert!(d.viewer().commands.contains(&ViewerCommand::RotateXY {
            degrees_x: 10.0 / 500.0 * 180.0,
            degrees_y: 0.0
        }));
    }

    #[test]
    fn wheel_zooms_by_factor() {
        let mut d = dispatcher(&[]);
        d.handle_event(InputEvent::Wheeled {
            time: 1_000,
            rotation: 2,
            modifiers: ButtonMods::empty(),
        });
        let factor = 1.15_f32.powi(2);
        assert!(d
            .viewer()
            .commands
            .contains(&ViewerCommand::ZoomByFactor { factor }));
        assert_eq!(d.viewer().cursor, Cursor::Zoom);
        d.stop_hover_watcher();
    }

    #[test]
    fn swipe_spins_when_gestures_allowed() {
        let mut options = InteractOptions::default();
        options.gesture.allow_gestures = true;
        let mut d = ActionDispatcher::new(RecordingViewer::new(), options);
        press(&mut d, 1_000, 100, 100);
        for (i, t) in [1_005, 1_010, 1_015, 1_020].into_iter().enumerate() {
            drag_to(&mut d, t, 100 + 20 * (i as i32 + 1), 100);
        }
        release(&mut d, 1_024, 190, 100);
        assert!(d
            .viewer()
            .commands
            .iter()
            .any(|c| matches!(c, ViewerCommand::SpinXY { rate, .. } if *rate > 0.0)));
    }

    #[test]
    fn slow_release_does_not_spin() {
        let mut options = InteractOptions::default();
        options.gesture.allow_gestures = true;
        let mut d = ActionDispatcher::new(RecordingViewer::new(), options);
        press(&mut d, 1_000, 100, 100);
        drag_to(&mut d, 1_005, 120, 100);
        drag_to(&mut d, 1_010, 140, 100);
        release(&mut d, 2_000, 140, 100);
        assert!(!d
            .viewer()
            .commands
            .iter()
            .any(|c| matches!(c, ViewerCommand::SpinXY { .. })));
    }

    // ── Picking ──

    #[test]
    fn select_modes_apply_scope() {
        let mut d = dispatcher(&[(4, (60, 60))]);
        d.set_picking_mode(PickingMode::SelectChain);
        click(&mut d, 1_000, 60, 60);
        assert_eq!(
            d.viewer().selections,
            [(
                AtomSelection::Within {
                    scope: SelectScope::Chain,
                    atom: 4
                },
                SelectionOp::ToggleExtended
            )]
        );
    }

    #[test]
    fn rasmol_style_replaces_then_toggles() {
        let mut d = dispatcher(&[(4, (60, 60))]);
        d.set_picking_mode(PickingMode::SelectAtom);
        d.set_picking_style(PickingStyle::SelectOrToggle);
        click(&mut d, 1_000, 60, 60);
        click_with(&mut d, 3_000, 60, 60, LEFT | ButtonMods::SHIFT);
        let ops: Vec<_> = d.viewer().selections.iter().map(|(_, op)| *op).collect();
        assert_eq!(ops, [SelectionOp::Replace, SelectionOp::Toggle]);
    }

    #[test]
    fn off_structure_click_resets_measurement() {
        let mut d = dispatcher(&[(5, (50, 50))]);
        d.set_picking_mode(PickingMode::MeasureDistance);
        click(&mut d, 1_000, 50, 50);
        click(&mut d, 3_000, 300, 300);
        assert!(d.measurement().is_none());
    }

    #[test]
    fn connect_mode_connects_two_atoms() {
        let mut d = dispatcher(&[(1, (20, 20)), (2, (80, 20))]);
        d.set_picking_mode(PickingMode::Struts);
        click(&mut d, 1_000, 20, 20);
        click(&mut d, 3_000, 80, 20);
        assert!(d.viewer().commands.contains(&ViewerCommand::Connect {
            picks: vec![MeasurePoint::Atom(1), MeasurePoint::Atom(2)],
            mode: ConnectMode::Struts,
        }));
    }

    #[test]
    fn spin_mode_queues_axis_and_ignores_repeat() {
        let mut d = dispatcher(&[(1, (20, 20)), (2, (80, 20))]);
        d.set_picking_mode(PickingMode::Spin);
        click(&mut d, 1_000, 20, 20);
        click(&mut d, 3_000, 20, 20);
        assert!(!d
            .viewer()
            .commands
            .iter()
            .any(|c| matches!(c, ViewerCommand::Spin { .. })));
        click(&mut d, 5_000, 80, 20);
        assert!(d.viewer().commands.contains(&ViewerCommand::Spin {
            picks: vec![MeasurePoint::Atom(1), MeasurePoint::Atom(2)],
            rate: 10,
        }));
    }

    #[test]
    fn identify_reports_atom() {
        let mut d = dispatcher(&[(8, (40, 40))]);
        click(&mut d, 1_000, 40, 40);
        assert!(d.viewer().commands.contains(&ViewerCommand::AtomPicked {
            atom: Some(8),
            message: None
        }));
    }

    #[test]
    fn right_press_opens_popup() {
        let mut d = dispatcher(&[]);
        d.handle_event(InputEvent::Pressed {
            time: 1_000,
            x: 33,
            y: 44,
            count: 1,
            modifiers: ButtonMods::RIGHT,
        });
        assert_eq!(d.viewer().popups, [(33, 44, PopupKind::Main)]);
    }

    #[test]
    fn rubber_band_selects_atoms_in_rectangle() {
        let mut d = dispatcher(&[(1, (20, 20)), (2, (40, 40)), (3, (200, 200))]);
        d.set_picking_style(PickingStyle::Drag);
        let shift_left = LEFT | ButtonMods::SHIFT;
        d.handle_event(InputEvent::Pressed {
            time: 1_000,
            x: 10,
            y: 10,
            count: 1,
            modifiers: shift_left,
        });
        d.handle_event(InputEvent::Dragged {
            time: 1_050,
            x: 50,
            y: 50,
            modifiers: shift_left,
        });
        assert!(d.rubber_band().is_some());
        d.handle_event(InputEvent::Released {
            time: 1_100,
            x: 50,
            y: 50,
            modifiers: shift_left,
        });
        assert_eq!(
            d.viewer().selections.last(),
            Some(&(
                AtomSelection::Atoms(BTreeSet::from([1, 2])),
                SelectionOp::Toggle
            ))
        );
        assert!(d.rubber_band().is_none());
        assert!(d.picking().rubber_band_enabled());
    }

    #[test]
    fn assign_atom_release_in_place_assigns_element() {
        let mut d = dispatcher(&[(1, (30, 30))]);
        d.viewer_mut().modelkit = ModelkitInfo {
            atom_type: "N".to_owned(),
            ..ModelkitInfo::default()
        };
        d.set_picking_mode(PickingMode::AssignAtom);
        press(&mut d, 1_000, 30, 30);
        assert!(d.measurement().is_some());
        release(&mut d, 1_050, 30, 30);
        assert!(d.viewer().commands.contains(&ViewerCommand::AssignAtom {
            atom: 1,
            element: "N".to_owned(),
            position: None,
            charge_label: false,
        }));
        assert!(d.measurement().is_none());
        assert_eq!(d.dragged_index(), -1);
    }

    #[test]
    fn assign_atom_drag_to_atom_connects() {
        let mut d = dispatcher(&[(1, (30, 30)), (2, (90, 30))]);
        d.set_picking_mode(PickingMode::AssignAtom);
        press(&mut d, 1_000, 30, 30);
        drag_to(&mut d, 1_020, 60, 30);
        drag_to(&mut d, 1_040, 90, 30);
        release(&mut d, 1_060, 90, 30);
        assert!(d.viewer().commands.contains(&ViewerCommand::AssignConnect {
            picks: vec![MeasurePoint::Atom(1), MeasurePoint::Atom(2)],
        }));
    }

    // ── Keys ──

    #[test]
    fn modifier_keys_chord_onto_moved_state() {
        let mut d = dispatcher(&[]);
        d.handle_event(InputEvent::KeyDown {
            key: Key::Shift,
            modifiers: ButtonMods::SHIFT,
        });
        d.handle_event(InputEvent::KeyDown {
            key: Key::Control,
            modifiers: ButtonMods::SHIFT | ButtonMods::CTRL,
        });
        assert_eq!(d.mouse().moved.modifiers, ButtonMods::SHIFT | ButtonMods::CTRL);
        assert_eq!(d.mouse().dragged.modifiers, ButtonMods::SHIFT);
        d.handle_event(InputEvent::KeyUp { key: Key::Shift });
        assert_eq!(d.mouse().moved.modifiers, ButtonMods::CTRL);
    }

    #[test]
    fn navigation_keys_forward_only_in_navigation_mode() {
        let mut d = dispatcher(&[]);
        let up = InputEvent::KeyDown {
            key: Key::Up,
            modifiers: ButtonMods::empty(),
        };
        d.handle_event(up);
        assert!(d.viewer().significant().is_empty());
        d.viewer_mut().flags.navigation_mode = true;
        d.handle_event(up);
        d.handle_event(InputEvent::KeyUp { key: Key::Up });
        assert_eq!(
            d.viewer().significant(),
            [
                &ViewerCommand::Navigate {
                    key: Key::Up,
                    modifiers: ButtonMods::empty()
                },
                &ViewerCommand::NavigateStop
            ]
        );
    }

    // ── User bindings ──

    #[test]
    fn user_script_suppresses_builtin() {
        let mut d = dispatcher(&[(8, (40, 40))]);
        d.bind("LEFT+click", "print _ATOM at _X,_Y").unwrap();
        click(&mut d, 1_000, 40, 40);
        assert_eq!(d.viewer().scripts, ["print ({8}) at 40,460"]);
        assert!(!d
            .viewer()
            .commands
            .iter()
            .any(|c| matches!(c, ViewerCommand::AtomPicked { .. })));
    }

    #[test]
    fn pass_through_scripts_run_in_order_then_builtin() {
        let mut d = dispatcher(&[(8, (40, 40))]);
        d.bind("LEFT+click", "+:first").unwrap();
        d.bind("LEFT+click", "second").unwrap();
        click(&mut d, 1_000, 40, 40);
        assert_eq!(d.viewer().scripts, ["first", "second"]);
        assert!(d
            .viewer()
            .commands
            .iter()
            .any(|c| matches!(c, ViewerCommand::AtomPicked { .. })));
    }

    #[test]
    fn user_action_hook_can_veto() {
        let mut d = dispatcher(&[(8, (40, 40))]);
        assert!(!d.is_user_action_defined(ActionId::PickAtom));
        assert!(d.invoke_user_action(ActionId::PickAtom, &[]));

        let _ = d
            .viewer_mut()
            .user_functions
            .insert("_pickatom".to_owned(), serde_json::Value::Bool(false));
        assert!(d.is_user_action_defined(ActionId::PickAtom));
        click(&mut d, 1_000, 40, 40);
        assert!(!d
            .viewer()
            .commands
            .iter()
            .any(|c| matches!(c, ViewerCommand::AtomPicked { .. })));
        assert_eq!(d.viewer().calls[0].0, "_pickatom");
    }

    #[test]
    fn unbind_all_restores_presets() {
        let mut d = dispatcher(&[]);
        let code = ActionCode::parse("ctrl+right+double+click").unwrap();
        d.bind("ctrl+right+double+click", "_center").unwrap();
        assert!(d.table().is_bound(code, ActionId::Center));
        d.unbind(None, None).unwrap();
        assert!(!d.table().is_bound(code, ActionId::Center));
        assert!(d.binding_description(Some("wheel")).contains("_wheelZoom"));
    }

    #[test]
    fn picking_state_script_reflects_modes() {
        let mut d = dispatcher(&[]);
        d.set_picking_mode(PickingMode::SelectGroup);
        assert_eq!(
            d.picking_state_script(),
            ";set modelkitMode false;set picking group;"
        );
    }

    #[test]
    fn hover_watcher_is_idempotent() {
        let mut d = dispatcher(&[]);
        d.stop_hover_watcher();
        d.start_hover_watcher();
        d.start_hover_watcher();
        assert!(d.hover_watcher_running());
        d.stop_hover_watcher();
        d.stop_hover_watcher();
        assert!(!d.hover_watcher_running());
    }

    #[test]
    fn resting_pointer_highlights_nearest_atom() {
        let mut d = dispatcher(&[(2, (70, 70))]);
        d.handle_event(InputEvent::Moved {
            time: 1_000,
            x: 70,
            y: 70,
            modifiers: ButtonMods::empty(),
        });
        d.check_hover();
        assert!(d.viewer().commands.contains(&ViewerCommand::HoverOn {
            atom: 2,
            is_label: false
        }));
    }
}
