//! Interaction settings with TOML preset support.
//!
//! Every tunable the dispatcher consults (drag and wheel sensitivity, click
//! timing, swipe gestures, picking capabilities, hover delay) lives here.
//! Options serialize to and from TOML; partial files fill the rest from
//! defaults.

mod gesture;
mod hover;
mod mouse;
mod picking;

use std::path::Path;

pub use gesture::GestureOptions;
pub use hover::HoverOptions;
pub use mouse::MouseOptions;
pub use picking::PickingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::InteractError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[mouse]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct InteractOptions {
    /// Pointer sensitivity and click timing.
    pub mouse: MouseOptions,
    /// Swipe-to-spin behavior.
    pub gesture: GestureOptions,
    /// Picking capabilities.
    pub picking: PickingOptions,
    /// Hover highlighting.
    pub hover: HoverOptions,
}

impl InteractOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(InteractOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`InteractError::Io`] if the file can't be read,
    /// [`InteractError::OptionsParse`] if it isn't valid TOML.
    pub fn load(path: &Path) -> Result<Self, InteractError> {
        let content =
            std::fs::read_to_string(path).map_err(InteractError::Io)?;
        toml::from_str(&content)
            .map_err(|e| InteractError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`InteractError::OptionsParse`] if serialization fails,
    /// [`InteractError::Io`] if the file can't be written.
    pub fn save(&self, path: &Path) -> Result<(), InteractError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| InteractError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(InteractError::Io)?;
        }
        std::fs::write(path, content).map_err(InteractError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = InteractOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: InteractOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[mouse]
wheel_factor = 1.5
";
        let opts: InteractOptions = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.mouse.wheel_factor, 1.5);
        // Everything else should be default
        assert_eq!(opts.mouse.double_click_ms, 700);
        assert_eq!(opts.mouse.xy_range, 10);
        assert_eq!(opts.gesture.min_delay_ms, 10);
        assert!(opts.hover.enabled);
    }

    #[test]
    fn load_reports_bad_toml() {
        let dir = std::env::temp_dir().join("viso-interact-options-test");
        let path = dir.join("broken.toml");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[mouse\nwheel_factor = ").unwrap();
        assert!(matches!(
            InteractOptions::load(&path),
            Err(InteractError::OptionsParse(_))
        ));
        assert!(matches!(
            InteractOptions::load(&dir.join("missing.toml")),
            Err(InteractError::Io(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join("viso-interact-options-save");
        let path = dir.join("nested").join("opts.toml");
        let mut opts = InteractOptions::default();
        opts.gesture.allow_gestures = true;
        opts.picking.spin_rate = 25;
        opts.save(&path).unwrap();
        assert_eq!(InteractOptions::load(&path).unwrap(), opts);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(InteractOptions::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        for section in ["mouse", "gesture", "picking", "hover"] {
            assert!(props.contains_key(section), "missing {section}");
        }

        // Skipped fields should be absent
        let gesture = &props["gesture"]["properties"];
        assert!(gesture.get("swipe_factor").is_some());
        assert!(gesture.get("capacity").is_none());
        assert!(gesture.get("multi_touch").is_none());
    }
}
