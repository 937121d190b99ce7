//! Rotation, zoom and cursor helpers shared by the pointer handlers.

use super::ActionDispatcher;
use crate::action::{ActionCode, ActionId};
use crate::viewer::{Cursor, Viewer, ViewerCommand};

/// Drags never convert more than this many pixels to 180 degrees.
const MAX_DEGREE_SPAN: i32 = 500;

impl<V: Viewer> ActionDispatcher<V> {
    /// Convert a pixel delta to rotation degrees.
    pub(super) fn degrees(&self, delta: i32, is_x: bool) -> f32 {
        let (width, height) = self.viewer.screen_size();
        let span = (if is_x { width } else { height }).clamp(1, MAX_DEGREE_SPAN);
        delta as f32 / span as f32 * 180.0 * self.options.mouse.drag_factor
    }

    /// Set the cursor unless the viewer is busy, optionally marking motion.
    pub(super) fn set_motion(&mut self, cursor: Cursor, in_motion: bool) {
        if self.viewer.cursor() != Cursor::Wait {
            self.viewer.set_cursor(cursor);
        }
        if in_motion {
            self.viewer.set_in_motion(true);
        }
    }

    /// The rightmost two percent of the window zooms on vertical drags.
    pub(super) fn in_zoom_area(&self, x: i32) -> bool {
        let (width, _) = self.viewer.screen_size();
        let width = if self.viewer.flags().stereo_full {
            width * 2
        } else {
            width
        };
        x > width * 98 / 100
    }

    fn is_slide_zoom(&self, code: ActionCode) -> bool {
        self.bound(code, ActionId::SlideZoom) && self.in_zoom_area(self.mouse.pressed.x)
    }

    /// Update the cursor for a rotate or zoom gesture. Returns `true` if
    /// the motion should zoom.
    pub(super) fn check_motion_rotate_zoom(
        &mut self,
        code: ActionCode,
        dx: i32,
        dy: i32,
        is_drag: bool,
    ) -> bool {
        let slide = self.is_slide_zoom(code);
        let rotate = self.bound(code, ActionId::Rotate);
        let rotate_z_or_zoom = self.bound(code, ActionId::RotateZorZoom);
        if !slide && !rotate && !rotate_z_or_zoom {
            return false;
        }
        let is_zoom = rotate_z_or_zoom && (dx == 0 || dy.abs() > 5 * dx.abs());
        let cursor = if is_zoom
            || self.in_zoom_area(self.mouse.moved.x)
            || self.bound(code, ActionId::WheelZoom)
        {
            Cursor::Zoom
        } else if rotate || rotate_z_or_zoom {
            Cursor::Move
        } else if self.bound(code, ActionId::Center) {
            Cursor::Hand
        } else {
            Cursor::Default
        };
        self.set_motion(cursor, is_drag);
        is_zoom || slide
    }

    /// Zoom was requested on the drag or wheel code.
    pub(super) fn zoom_drag(&mut self, code: ActionCode, dy: i32) {
        let slab_depth = self.viewer.flags().slab_enabled && self.is_slide_zoom(code);
        self.viewer.execute(if slab_depth {
            ViewerCommand::SlabAndDepth { pixels: dy }
        } else {
            ViewerCommand::ZoomBy { pixels: dy }
        });
    }

    /// Shift-drag: vertical zooms, horizontal rolls about z.
    pub(super) fn rotate_z_or_zoom(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy.abs() > 1 {
            self.set_motion(Cursor::Zoom, true);
            let pixels = dy + if dy > 0 { -1 } else { 1 };
            self.viewer.execute(ViewerCommand::ZoomBy { pixels });
        } else if dy == 0 && dx.abs() > 1 {
            self.set_motion(Cursor::Move, true);
            let degrees = -dx + if dx > 0 { 1 } else { -1 };
            self.viewer.execute(ViewerCommand::RotateZ { degrees });
        }
    }

    /// Zoom by `wheel_factor` raised to `steps`, then wait for the pointer
    /// to come to rest before leaving motion mode.
    pub(super) fn zoom_by_factor(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        self.set_motion(Cursor::Zoom, true);
        let factor = self.options.mouse.wheel_factor.powi(steps);
        self.viewer.execute(ViewerCommand::ZoomByFactor { factor });
        self.mouse.moved.set_current(&self.mouse.current, 0);
        self.viewer.set_in_motion(true);
        self.zoom_trigger = true;
        self.start_hover_watcher();
        self.publish(true);
    }

    /// Translate or rotate the selection by one drag sample.
    pub(super) fn drag_selected(&mut self, code: ActionCode, dx: i32, dy: i32) {
        self.set_motion(Cursor::Move, true);
        let command = if self.bound(code, ActionId::RotateSelected)
            && self.options.picking.allow_rotate_selected
        {
            ViewerCommand::RotateSelected {
                degrees_x: self.degrees(dx, true),
                degrees_y: self.degrees(dy, false),
                atoms: None,
            }
        } else {
            ViewerCommand::MoveSelected {
                dx,
                dy,
                dz: self.bound(code, ActionId::DragZ).then_some(-dy),
            }
        };
        self.viewer.execute(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ButtonMods, EventKind};
    use crate::options::InteractOptions;
    use crate::viewer::testing::RecordingViewer;

    fn dispatcher() -> ActionDispatcher<RecordingViewer> {
        ActionDispatcher::new(RecordingViewer::new(), InteractOptions::default())
    }

    #[test]
    fn degree_span_caps_at_five_hundred() {
        let mut d = dispatcher();
        assert!((d.degrees(250, true) - 90.0).abs() < 1e-4);
        d.viewer_mut().size = (1000, 200);
        assert!((d.degrees(250, true) - 90.0).abs() < 1e-4);
        assert!((d.degrees(100, false) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_area_is_right_edge() {
        let mut d = dispatcher();
        assert!(d.in_zoom_area(491));
        assert!(!d.in_zoom_area(490));
        d.viewer_mut().flags.stereo_full = true;
        assert!(!d.in_zoom_area(491));
    }

    #[test]
    fn vertical_shift_drag_is_zoom() {
        let mut d = dispatcher();
        let shift_drag =
            ActionCode::of(1, ButtonMods::LEFT | ButtonMods::SHIFT, EventKind::Dragged);
        assert!(d.check_motion_rotate_zoom(shift_drag, 0, 8, true));
        assert_eq!(d.viewer().cursor, Cursor::Zoom);
        assert!(!d.check_motion_rotate_zoom(shift_drag, 10, 8, true));
        assert_eq!(d.viewer().cursor, Cursor::Move);
    }

    #[test]
    fn busy_cursor_is_kept() {
        let mut d = dispatcher();
        d.viewer_mut().cursor = Cursor::Wait;
        d.set_motion(Cursor::Move, true);
        assert_eq!(d.viewer().cursor, Cursor::Wait);
        assert!(d.viewer().in_motion);
    }

    #[test]
    fn rotate_z_or_zoom_steps_toward_zero() {
        let mut d = dispatcher();
        d.rotate_z_or_zoom(0, 5);
        d.rotate_z_or_zoom(-4, 0);
        d.rotate_z_or_zoom(1, 1);
        assert_eq!(
            d.viewer().commands,
            [
                ViewerCommand::ZoomBy { pixels: 4 },
                ViewerCommand::RotateZ { degrees: 3 }
            ]
        );
    }
}
