//! Action vocabulary: packed mouse-action codes and the canonical actions
//! they can be bound to.

/// Packed (count, buttons, kind) codes and their descriptors.
pub mod code;
/// Canonical action ids and their stable names.
pub mod id;

pub use code::ActionCode;
pub use id::ActionId;
