use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Gestures", inline)]
#[serde(default)]
/// Swipe-to-spin behavior.
pub struct GestureOptions {
    /// Turn fast drag releases into spins.
    #[schemars(title = "Allow Gestures")]
    pub allow_gestures: bool,
    /// Log every swipe at info level.
    #[schemars(title = "Log Gestures")]
    pub log_gestures: bool,
    /// Spin rate multiplier for swipes.
    #[schemars(title = "Swipe Factor", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub swipe_factor: f32,
    /// Number of drag samples kept for velocity estimates.
    #[schemars(skip)]
    pub capacity: usize,
    /// Largest gap between the last two samples that still counts as a
    /// throw, in milliseconds. Multi-touch input allows eight times this.
    #[schemars(title = "Minimum Delay (ms)", range(min = 1, max = 100))]
    pub min_delay_ms: i64,
    /// Input comes from a multi-touch device.
    #[schemars(skip)]
    pub multi_touch: bool,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            allow_gestures: false,
            log_gestures: false,
            swipe_factor: 1.0,
            capacity: crate::input::gesture::DEFAULT_CAPACITY,
            min_delay_ms: 10,
            multi_touch: false,
        }
    }
}
