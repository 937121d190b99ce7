//! User scripts bound to action codes, and user functions that can veto
//! built-in actions.

use serde_json::Value;

use super::ActionDispatcher;
use crate::action::{ActionCode, ActionId};
use crate::binding::{ActionScriptTemplate, Placeholders, TemplateContext};
use crate::viewer::{PickedKind, Viewer};

impl<V: Viewer> ActionDispatcher<V> {
    /// Run the user scripts bound to `code`. Returns `true` when they replace
    /// the built-in action, i.e. none of them was marked pass-through.
    pub(super) fn check_user_action(
        &mut self,
        code: ActionCode,
        x: i32,
        y: i32,
        dx: i32,
        dy: i32,
        time: i64,
    ) -> bool {
        if !self.table().is_user_action(code) {
            return false;
        }
        let templates: Vec<ActionScriptTemplate> =
            self.table().user_scripts(code).cloned().collect();
        let uses = templates
            .iter()
            .fold(Placeholders::empty(), |acc, t| acc | t.placeholders());

        let atom = if uses.intersects(Placeholders::ATOM | Placeholders::POINT) {
            self.find_nearest_atom(x, y, false, true)
        } else {
            None
        };
        let object = if !self.mode.draw
            && uses.intersects(Placeholders::POINT | Placeholders::OBJECT | Placeholders::BOND)
        {
            self.viewer.check_object_clicked(x, y, code)
        } else {
            None
        };
        let point = atom
            .and_then(|a| self.viewer.atom_position(a))
            .or_else(|| object.as_ref().and_then(|o| o.point));
        let bond = object
            .as_ref()
            .filter(|o| o.kind == PickedKind::Bond)
            .and_then(|o| o.index);

        let (_, height) = self.viewer.screen_size();
        let ctx = TemplateContext {
            action: code,
            kind: Some(code.event_kind()),
            x,
            y: height - y,
            dx,
            dy,
            time,
            atom,
            point,
            bond,
            object: object.as_ref(),
        };
        let mut pass_through = false;
        for template in &templates {
            pass_through |= template.is_pass_through();
            let script = template.fill(&ctx);
            log::debug!("user action {}: {script}", code.describe());
            self.viewer.run_script_quiet(&script);
        }
        !pass_through
    }

    /// Whether the scripting layer defines a hook for `id`.
    #[must_use]
    pub fn is_user_action_defined(&self, id: ActionId) -> bool {
        self.viewer.is_user_function(&id.name().to_lowercase())
    }

    /// Call the user hook for `id`, if any. Returns `false` only when the
    /// hook exists and returned `false`, vetoing the built-in action.
    pub fn invoke_user_action(&mut self, id: ActionId, params: &[Value]) -> bool {
        let name = id.name().to_lowercase();
        if !self.viewer.is_user_function(&name) {
            return true;
        }
        let result = self.viewer.call_user_function(&name, params);
        log::debug!("user function {name} returned {result}");
        !matches!(result, Value::Bool(false))
    }
}
