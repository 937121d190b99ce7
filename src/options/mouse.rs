use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Mouse", inline)]
#[serde(default)]
/// Pointer sensitivity and click timing.
pub struct MouseOptions {
    /// Rotation degrees multiplier for drags.
    #[schemars(title = "Drag Factor", range(min = 0.1, max = 5.0), extend("step" = 0.05))]
    pub drag_factor: f32,
    /// Zoom factor applied per wheel notch.
    #[schemars(title = "Wheel Factor", range(min = 1.0, max = 2.0), extend("step" = 0.01))]
    pub wheel_factor: f32,
    /// Pixel tolerance for multi-click and release-in-place checks.
    #[schemars(title = "Click Range", range(min = 0, max = 50))]
    pub xy_range: i32,
    /// Maximum gap between clicks of a double click, in milliseconds.
    #[schemars(title = "Double Click (ms)", range(min = 100, max = 2000))]
    pub double_click_ms: i64,
}

impl Default for MouseOptions {
    fn default() -> Self {
        Self {
            drag_factor: 1.0,
            wheel_factor: 1.15,
            xy_range: 10,
            double_click_ms: 700,
        }
    }
}
