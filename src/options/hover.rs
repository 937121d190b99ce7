use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Hover", inline)]
#[serde(default)]
/// Hover highlighting.
pub struct HoverOptions {
    /// Run the hover watcher thread.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Rest time before a hover fires, in milliseconds.
    #[schemars(title = "Delay (ms)", range(min = 50, max = 5000))]
    pub delay_ms: u64,
}

impl Default for HoverOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 500,
        }
    }
}
