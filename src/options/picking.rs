use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Picking", inline)]
#[serde(default)]
/// Picking capabilities.
pub struct PickingOptions {
    /// Alt-drag moves the current selection.
    #[schemars(title = "Drag Selected")]
    pub drag_selected: bool,
    /// Dragging a selection may rotate it instead of translating.
    #[schemars(title = "Allow Rotate Selected")]
    pub allow_rotate_selected: bool,
    /// Spin rate used by the two-atom spin pick, in degrees per second.
    #[schemars(title = "Spin Rate", range(min = 1, max = 100))]
    pub spin_rate: i32,
}

impl Default for PickingOptions {
    fn default() -> Self {
        Self {
            drag_selected: false,
            allow_rotate_selected: false,
            spin_rate: 10,
        }
    }
}
