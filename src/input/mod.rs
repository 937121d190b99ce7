//! Input vocabulary and pointer state: event types, button masks, the
//! named pointer snapshots, the drag-gesture ring buffer and the hover
//! watcher thread.

/// Platform-agnostic input events.
pub mod event;
/// Drag sample ring buffer and release-velocity estimates.
pub mod gesture;
/// Background hover detection.
pub mod hover;
/// Pointer snapshots and multi-click checks.
pub mod mouse;

pub use event::{ButtonMods, EventKind, InputEvent, Key};
pub use gesture::{GestureSample, GestureTracker};
pub use hover::{HoverRequest, HoverWatcher};
pub use mouse::{MouseHistory, MouseSnapshot, MouseState};
