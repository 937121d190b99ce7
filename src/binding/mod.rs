//! Binding tables: which mouse actions trigger which canonical actions or
//! user scripts.
//!
//! Four preset variants exist ([`BindingKind`]). They are built once, on
//! first use, and swapped as a unit when the picking style changes. Only
//! the default variant is customized by [`BindingSet::bind`] and
//! [`BindingSet::unbind`].

mod presets;
/// User script templates and placeholder substitution.
pub mod template;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use rustc_hash::FxHashMap;
pub use template::{ActionScriptTemplate, Placeholders, TemplateContext};

use crate::action::{ActionCode, ActionId};
use crate::error::InteractError;

/// Preset binding-table variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Toggle selection (the default).
    Default,
    /// RasMol-style select-or-toggle.
    Rasmol,
    /// PFAAT-style extended select.
    Pfaat,
    /// Drag-to-select overlay.
    Drag,
}

impl BindingKind {
    /// Stable name, matching the picking style that selects it.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "toggle",
            Self::Rasmol => "selectOrToggle",
            Self::Pfaat => "extendedSelect",
            Self::Drag => "drag",
        }
    }
}

/// What a binding entry fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    /// A canonical action.
    Action(ActionId),
    /// A user script.
    Script(ActionScriptTemplate),
}

/// One binding variant.
///
/// Canonical bindings are a set of `(code, action)` pairs. User script
/// bindings keep their registration order, which is the order they run in
/// when several share a code.
#[derive(Debug, Clone)]
pub struct BindingTable {
    kind: BindingKind,
    actions: BTreeSet<(ActionCode, ActionId)>,
    scripts: Vec<(ActionCode, ActionScriptTemplate)>,
    script_counts: FxHashMap<ActionCode, usize>,
}

impl BindingTable {
    /// Build the preset table for `kind`.
    #[must_use]
    pub fn new(kind: BindingKind) -> Self {
        let mut table = Self {
            kind,
            actions: BTreeSet::new(),
            scripts: Vec::new(),
            script_counts: FxHashMap::default(),
        };
        presets::install(&mut table);
        table
    }

    /// Which preset this table started from.
    #[must_use]
    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    /// Bind `code` to a canonical action. Binding twice is a no-op.
    pub fn bind_action(&mut self, code: ActionCode, id: ActionId) {
        if self.actions.insert((code, id)) {
            log::debug!("binding {code} -> {id}");
        }
    }

    /// Bind `code` to a user script. Rebinding the same script text on the
    /// same code keeps its original position.
    pub fn bind_script(&mut self, code: ActionCode, template: ActionScriptTemplate) {
        let existing = self
            .scripts
            .iter_mut()
            .find(|(c, t)| *c == code && t.source() == template.source());
        if let Some((_, slot)) = existing {
            *slot = template;
            return;
        }
        log::debug!("binding {code} -> script {:?}", template.source());
        self.scripts.push((code, template));
        *self.script_counts.entry(code).or_insert(0) += 1;
    }

    /// Remove a canonical binding, on one code or on every code.
    pub fn unbind_action(&mut self, code: Option<ActionCode>, id: ActionId) {
        let before = self.actions.len();
        self.actions
            .retain(|&(c, i)| i != id || code.is_some_and(|code| code != c));
        log::debug!("unbound {id}: {} entries removed", before - self.actions.len());
    }

    /// Remove a user script, on one code or on every code.
    pub fn unbind_script(&mut self, code: Option<ActionCode>, source: &str) {
        let source = source.trim();
        self.remove_scripts(|c, t| {
            t.source() == source && code.is_none_or(|code| code == c)
        });
    }

    /// Remove everything bound to `code`.
    pub fn unbind_code(&mut self, code: ActionCode) {
        self.actions.retain(|&(c, _)| c != code);
        self.remove_scripts(|c, _| c == code);
        log::debug!("unbound everything on {code}");
    }

    fn remove_scripts(
        &mut self,
        doomed: impl Fn(ActionCode, &ActionScriptTemplate) -> bool,
    ) {
        let counts = &mut self.script_counts;
        self.scripts.retain(|(c, t)| {
            if !doomed(*c, t) {
                return true;
            }
            if let Some(n) = counts.get_mut(c) {
                *n -= 1;
                if *n == 0 {
                    drop(counts.remove(c));
                }
            }
            false
        });
    }

    /// Whether `code` fires `id`.
    #[must_use]
    pub fn is_bound(&self, code: ActionCode, id: ActionId) -> bool {
        self.actions.contains(&(code, id))
    }

    /// Whether `code` fires any of `ids`.
    #[must_use]
    pub fn is_bound_any(&self, code: ActionCode, ids: &[ActionId]) -> bool {
        ids.iter().any(|&id| self.is_bound(code, id))
    }

    /// Whether `code` has at least one user script attached.
    #[must_use]
    pub fn is_user_action(&self, code: ActionCode) -> bool {
        self.script_counts.contains_key(&code)
    }

    /// User scripts on `code`, in registration order.
    pub fn user_scripts(
        &self,
        code: ActionCode,
    ) -> impl Iterator<Item = &ActionScriptTemplate> + '_ {
        self.scripts
            .iter()
            .filter(move |(c, _)| *c == code)
            .map(|(_, t)| t)
    }

    /// Codes that fire `id`, ordered by button, kind and count.
    #[must_use]
    pub fn codes_for(&self, id: ActionId) -> Vec<ActionCode> {
        let mut codes: Vec<_> = self
            .actions
            .iter()
            .filter(|&&(_, i)| i == id)
            .map(|&(c, _)| c)
            .collect();
        codes.sort_by_key(|c| c.sort_key());
        codes
    }

    /// Every entry, keyed by code. Canonical actions come first in id order,
    /// then scripts in registration order.
    #[must_use]
    pub fn bindings(&self) -> BTreeMap<ActionCode, Vec<BindingTarget>> {
        let mut map: BTreeMap<ActionCode, Vec<BindingTarget>> = BTreeMap::new();
        for &(code, id) in &self.actions {
            map.entry(code).or_default().push(BindingTarget::Action(id));
        }
        for (code, template) in &self.scripts {
            map.entry(*code)
                .or_default()
                .push(BindingTarget::Script(template.clone()));
        }
        map
    }

    /// Help text: one row per bound action, then user scripts.
    ///
    /// `filter` is a case-insensitive substring match against the action
    /// name, its help text and its descriptors.
    #[must_use]
    pub fn describe(&self, filter: Option<&str>) -> String {
        let filter = filter.map(str::to_lowercase).filter(|f| !f.is_empty());
        let matches = |row: &str| {
            filter
                .as_deref()
                .is_none_or(|f| row.to_lowercase().contains(f))
        };
        let mut out = String::new();
        for id in ActionId::ALL {
            let codes = self.codes_for(id);
            if codes.is_empty() {
                continue;
            }
            let names: Vec<String> =
                codes.into_iter().map(ActionCode::describe).collect();
            let names = names.join(", ");
            if !matches(&format!("{};{};{names}", id.name(), id.info())) {
                continue;
            }
            let _ = writeln!(out, "{:<22}\t{names}\t{}", id.name(), id.info());
        }
        for (code, template) in &self.scripts {
            let descriptor = code.describe();
            if !matches(&format!("user;{descriptor};{}", template.source())) {
                continue;
            }
            let _ = writeln!(out, "{:<22}\t{descriptor}\t{}", "user", template.source());
        }
        out
    }

    /// `bind` commands that recreate this table.
    #[must_use]
    pub fn state_script(&self) -> String {
        let mut out = String::new();
        for (code, targets) in self.bindings() {
            for target in targets {
                let name = match &target {
                    BindingTarget::Action(id) => id.name().to_owned(),
                    BindingTarget::Script(t) => t.source().replace('"', "\\\""),
                };
                let _ = writeln!(out, "bind \"{code}\" \"{name}\";");
            }
        }
        out
    }
}

/// The four variants plus which one is active.
#[derive(Debug, Clone)]
pub struct BindingSet {
    default: BindingTable,
    rasmol: Option<BindingTable>,
    pfaat: Option<BindingTable>,
    drag: Option<BindingTable>,
    active: BindingKind,
    predrag: BindingKind,
}

impl Default for BindingSet {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingSet {
    /// Default variant active, others built on first use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default: BindingTable::new(BindingKind::Default),
            rasmol: None,
            pfaat: None,
            drag: None,
            active: BindingKind::Default,
            predrag: BindingKind::Default,
        }
    }

    /// The table events resolve against.
    #[must_use]
    pub fn active(&self) -> &BindingTable {
        self.get(self.active).unwrap_or(&self.default)
    }

    /// Which variant is active.
    #[must_use]
    pub fn active_kind(&self) -> BindingKind {
        self.active
    }

    /// The last non-drag variant that was active.
    #[must_use]
    pub fn predrag_kind(&self) -> BindingKind {
        self.predrag
    }

    /// A built variant, if it has been used.
    #[must_use]
    pub fn get(&self, kind: BindingKind) -> Option<&BindingTable> {
        match kind {
            BindingKind::Default => Some(&self.default),
            BindingKind::Rasmol => self.rasmol.as_ref(),
            BindingKind::Pfaat => self.pfaat.as_ref(),
            BindingKind::Drag => self.drag.as_ref(),
        }
    }

    /// Swap in `kind`, building it on first use.
    pub fn activate(&mut self, kind: BindingKind) {
        let slot = match kind {
            BindingKind::Default => None,
            BindingKind::Rasmol => Some(&mut self.rasmol),
            BindingKind::Pfaat => Some(&mut self.pfaat),
            BindingKind::Drag => Some(&mut self.drag),
        };
        if let Some(slot) = slot {
            let _ = slot.get_or_insert_with(|| BindingTable::new(kind));
        }
        if self.active != kind {
            log::debug!("binding table {} -> {}", self.active.name(), kind.name());
        }
        self.active = kind;
        if kind != BindingKind::Drag {
            self.predrag = kind;
        }
    }

    /// Return to the variant active before the drag overlay.
    pub fn restore_predrag(&mut self) {
        self.activate(self.predrag);
    }

    /// Bind a descriptor to a canonical action name or a user script.
    ///
    /// # Errors
    ///
    /// Returns [`InteractError::InvalidActionCode`] if `descriptor` does not
    /// parse.
    pub fn bind(&mut self, descriptor: &str, name: &str) -> Result<(), InteractError> {
        let code = ActionCode::parse(descriptor)?;
        match ActionId::from_name(name) {
            Some(id) => self.default.bind_action(code, id),
            None => self.default.bind_script(code, ActionScriptTemplate::new(name)),
        }
        Ok(())
    }

    /// Remove bindings from the default variant.
    ///
    /// With neither argument the default variant is rebuilt from its preset,
    /// cached variants are dropped, and the default variant is activated.
    ///
    /// # Errors
    ///
    /// Returns [`InteractError::InvalidActionCode`] if `descriptor` does not
    /// parse.
    pub fn unbind(
        &mut self,
        descriptor: Option<&str>,
        name: Option<&str>,
    ) -> Result<(), InteractError> {
        let code = descriptor.map(ActionCode::parse).transpose()?;
        match (code, name) {
            (None, None) => {
                *self = Self::new();
                log::debug!("bindings reset to defaults");
            }
            (Some(code), None) => self.default.unbind_code(code),
            (code, Some(name)) => match ActionId::from_name(name) {
                Some(id) => self.default.unbind_action(code, id),
                None => self.default.unbind_script(code, name),
            },
        }
        Ok(())
    }
}
