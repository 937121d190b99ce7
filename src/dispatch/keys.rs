//! Modifier chords and navigation keys.

use super::ActionDispatcher;
use crate::action::ActionCode;
use crate::input::{ButtonMods, EventKind, Key};
use crate::viewer::{Cursor, Viewer, ViewerCommand};

impl<V: Viewer> ActionDispatcher<V> {
    pub(super) fn on_key_down(&mut self, key: Key, modifiers: ButtonMods) {
        if self.key_processing {
            return;
        }
        self.viewer.hover_off();
        self.key_processing = true;
        self.set_mouse_mode();
        match key {
            Key::Alt => {
                if self.mode.drag_selected && self.alt_released {
                    self.viewer.execute(ViewerCommand::BeginMoveSelected);
                }
                self.alt_released = false;
                self.mouse.moved.modifiers |= ButtonMods::ALT;
            }
            Key::Shift => {
                self.mouse.dragged.modifiers |= ButtonMods::SHIFT;
                self.mouse.moved.modifiers |= ButtonMods::SHIFT;
            }
            Key::Control => self.mouse.moved.modifiers |= ButtonMods::CTRL,
            Key::Escape => self.exit_measurement(Some("escape")),
            _ => {}
        }

        // Preview the cursor the held chord would drag with.
        let code = ActionCode::of(
            1,
            ButtonMods::LEFT | self.mouse.moved.modifiers,
            EventKind::Dragged,
        );
        if !self.mode.label && !self.table().is_user_action(code) {
            let _ = self.check_motion_rotate_zoom(code, 0, 0, false);
        }
        if self.viewer.flags().navigation_mode && key.is_navigation() {
            self.viewer
                .execute(ViewerCommand::Navigate { key, modifiers });
        }
        self.key_processing = false;
    }

    pub(super) fn on_key_up(&mut self, key: Key) {
        match key {
            Key::Alt => {
                self.mouse.moved.modifiers &= !ButtonMods::ALT;
                if self.mode.drag_selected {
                    self.viewer.execute(ViewerCommand::CommitMoveSelected);
                }
                self.alt_released = true;
            }
            Key::Shift => self.mouse.moved.modifiers &= !ButtonMods::SHIFT,
            Key::Control => self.mouse.moved.modifiers &= !ButtonMods::CTRL,
            _ => {}
        }
        if self.mouse.moved.modifiers.is_empty() {
            self.viewer.set_cursor(Cursor::Default);
        }
        if self.viewer.flags().navigation_mode && key.is_arrow() {
            self.viewer.execute(ViewerCommand::NavigateStop);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use crate::options::InteractOptions;
    use crate::viewer::testing::RecordingViewer;

    fn key_down(d: &mut ActionDispatcher<RecordingViewer>, key: Key, modifiers: ButtonMods) {
        d.handle_event(InputEvent::KeyDown { key, modifiers });
    }

    #[test]
    fn alt_brackets_move_selected_in_drag_selected_mode() {
        let mut options = InteractOptions::default();
        options.picking.drag_selected = true;
        let mut d = ActionDispatcher::new(RecordingViewer::new(), options);
        key_down(&mut d, Key::Alt, ButtonMods::ALT);
        key_down(&mut d, Key::Alt, ButtonMods::ALT);
        d.handle_event(InputEvent::KeyUp { key: Key::Alt });
        assert_eq!(
            d.viewer().commands,
            [
                ViewerCommand::BeginMoveSelected,
                ViewerCommand::CommitMoveSelected
            ]
        );
    }

    #[test]
    fn shift_previews_zoom_cursor() {
        let mut d = ActionDispatcher::new(RecordingViewer::new(), InteractOptions::default());
        key_down(&mut d, Key::Shift, ButtonMods::SHIFT);
        assert_eq!(d.viewer().cursor, Cursor::Zoom);
        assert!(!d.viewer().in_motion);
        d.handle_event(InputEvent::KeyUp { key: Key::Shift });
        assert_eq!(d.viewer().cursor, Cursor::Default);
    }

    #[test]
    fn space_navigates_but_only_arrows_stop() {
        let mut d = ActionDispatcher::new(RecordingViewer::new(), InteractOptions::default());
        d.viewer_mut().flags.navigation_mode = true;
        key_down(&mut d, Key::Space, ButtonMods::empty());
        d.handle_event(InputEvent::KeyUp { key: Key::Space });
        assert_eq!(
            d.viewer().commands,
            [ViewerCommand::Navigate {
                key: Key::Space,
                modifiers: ButtonMods::empty()
            }]
        );
    }
}
