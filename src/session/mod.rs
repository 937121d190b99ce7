//! Multi-event interaction sessions.

pub mod drag;
pub mod measurement;

pub use drag::{DragBehavior, DragMotion, DragSession};
pub use measurement::{
    MeasureKind, MeasurePoint, Measurement, MeasurementSession, PickOutcome,
};
