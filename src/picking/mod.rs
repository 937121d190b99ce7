//! Picking state: the atom and bond picking axes, the selection and
//! measurement styles, and the binding table they select.

mod mode;

pub use mode::{BondPickingMode, PickingMode, PickingStyle};

use crate::binding::{BindingKind, BindingSet};
use crate::viewer::ModelkitInfo;

/// The orthogonal picking axes plus the binding set they drive.
#[derive(Debug, Clone)]
pub struct PickingController {
    atom_mode: PickingMode,
    bond_mode: BondPickingMode,
    bond_picking: bool,
    style: PickingStyle,
    selection_style: PickingStyle,
    root_selection_style: PickingStyle,
    measurement_style: PickingStyle,
    rubber_band_enabled: bool,
    bindings: BindingSet,
}

impl Default for PickingController {
    fn default() -> Self {
        Self::new()
    }
}

impl PickingController {
    /// Identify mode, toggle style, default bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            atom_mode: PickingMode::Identify,
            bond_mode: BondPickingMode::Off,
            bond_picking: false,
            style: PickingStyle::Toggle,
            selection_style: PickingStyle::Toggle,
            root_selection_style: PickingStyle::Toggle,
            measurement_style: PickingStyle::MeasureOff,
            rubber_band_enabled: false,
            bindings: BindingSet::new(),
        }
    }

    // ── Getters ──

    /// What an atom click does.
    #[must_use]
    pub fn atom_mode(&self) -> PickingMode {
        self.atom_mode
    }

    /// What a bond click does.
    #[must_use]
    pub fn bond_mode(&self) -> BondPickingMode {
        self.bond_mode
    }

    /// Whether bond clicks are interpreted as bond picks.
    #[must_use]
    pub fn bond_picking(&self) -> bool {
        self.bond_picking
    }

    /// The style last set.
    #[must_use]
    pub fn style(&self) -> PickingStyle {
        self.style
    }

    /// Current selection style.
    #[must_use]
    pub fn selection_style(&self) -> PickingStyle {
        self.selection_style
    }

    /// Current measurement style.
    #[must_use]
    pub fn measurement_style(&self) -> PickingStyle {
        self.measurement_style
    }

    /// Whether a select drag draws a rubber band.
    #[must_use]
    pub fn rubber_band_enabled(&self) -> bool {
        self.rubber_band_enabled
    }

    /// The binding set.
    #[must_use]
    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    /// The binding set, for bind and unbind.
    pub fn bindings_mut(&mut self) -> &mut BindingSet {
        &mut self.bindings
    }

    // ── Transitions ──

    /// Set a picking mode. Returns `true` if a pending measurement must be
    /// discarded.
    pub fn set_picking_mode(&mut self, mode: PickingMode) -> bool {
        let mut is_new = false;
        match mode {
            PickingMode::Reset => {
                self.bond_mode = BondPickingMode::IdentifyBond;
                let _ = self.set_picking_style(PickingStyle::Toggle);
                self.bond_picking = false;
                self.atom_mode = PickingMode::Identify;
                log::debug!("picking reset");
                return true;
            }
            PickingMode::IdentifyBond | PickingMode::RotateBond | PickingMode::AssignBond => {
                self.bond_mode = match mode {
                    PickingMode::IdentifyBond => BondPickingMode::IdentifyBond,
                    PickingMode::RotateBond => BondPickingMode::RotateBond,
                    _ => BondPickingMode::AssignBond,
                };
                self.bond_picking = true;
                log::debug!("bond picking mode {}", self.bond_mode);
                return false;
            }
            PickingMode::DeleteBond => {
                self.bond_mode = BondPickingMode::DeleteBond;
                if self.bond_picking {
                    return false;
                }
                is_new = true;
            }
            _ => {}
        }
        is_new |= self.atom_mode != mode;
        if is_new {
            log::debug!("picking mode {} -> {mode}", self.atom_mode);
        }
        self.atom_mode = mode;
        is_new
    }

    /// Set a picking style and activate its binding table. Returns `true`
    /// if a pending measurement must be discarded.
    pub fn set_picking_style(&mut self, style: PickingStyle) -> bool {
        self.style = style;
        if style.is_measurement() {
            self.measurement_style = style;
            log::debug!("measurement style {style}");
            return true;
        }
        if style != PickingStyle::Drag {
            self.root_selection_style = style;
        }
        self.selection_style = style;
        self.rubber_band_enabled = false;
        let kind = match style {
            PickingStyle::ExtendedSelect => BindingKind::Pfaat,
            PickingStyle::Drag => {
                self.rubber_band_enabled = true;
                BindingKind::Drag
            }
            PickingStyle::SelectOrToggle => BindingKind::Rasmol,
            _ => BindingKind::Default,
        };
        self.bindings.activate(kind);
        log::debug!("selection style {style}");
        false
    }

    /// Return to identify mode, the root selection style, and the table
    /// that was active before any drag overlay. Returns `true` if a pending
    /// measurement must be discarded.
    pub fn clear(&mut self) -> bool {
        self.bindings.restore_predrag();
        let by_mode = self.set_picking_mode(PickingMode::Identify);
        let by_style = self.set_picking_style(self.root_selection_style);
        by_mode || by_style
    }

    /// Script fragment that restores the picking state.
    #[must_use]
    pub fn picking_state_script(&self, modelkit_mode: bool, modelkit: &ModelkitInfo) -> String {
        let mut script = format!(
            ";set modelkitMode {modelkit_mode};set picking {}",
            self.atom_mode
        );
        if self.atom_mode == PickingMode::AssignAtom {
            script.push('_');
            script.push_str(&modelkit.atom_type);
        }
        script.push(';');
        if self.bond_mode != BondPickingMode::Off {
            script.push_str("set picking ");
            script.push_str(self.bond_mode.name());
            if self.bond_mode == BondPickingMode::AssignBond {
                script.push('_');
                script.push_str(&modelkit.bond_type);
            }
            script.push(';');
        }
        script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_modes_leave_atom_axis_alone() {
        let mut p = PickingController::new();
        assert!(p.set_picking_mode(PickingMode::SelectAtom));
        assert!(!p.set_picking_mode(PickingMode::AssignBond));
        assert_eq!(p.atom_mode(), PickingMode::SelectAtom);
        assert_eq!(p.bond_mode(), BondPickingMode::AssignBond);
        assert!(p.bond_picking());
    }

    #[test]
    fn same_mode_does_not_reset() {
        let mut p = PickingController::new();
        assert!(!p.set_picking_mode(PickingMode::Identify));
        assert!(p.set_picking_mode(PickingMode::MeasureDistance));
        assert!(!p.set_picking_mode(PickingMode::MeasureDistance));
    }

    #[test]
    fn delete_bond_depends_on_bond_picking() {
        let mut p = PickingController::new();
        assert!(p.set_picking_mode(PickingMode::DeleteBond));
        assert_eq!(p.atom_mode(), PickingMode::DeleteBond);

        let mut p = PickingController::new();
        let _ = p.set_picking_mode(PickingMode::IdentifyBond);
        assert!(!p.set_picking_mode(PickingMode::DeleteBond));
        assert_eq!(p.atom_mode(), PickingMode::Identify);
        assert_eq!(p.bond_mode(), BondPickingMode::DeleteBond);
    }

    #[test]
    fn reset_restores_identify_and_toggle() {
        let mut p = PickingController::new();
        let _ = p.set_picking_mode(PickingMode::RotateBond);
        let _ = p.set_picking_mode(PickingMode::SelectChain);
        let _ = p.set_picking_style(PickingStyle::SelectOrToggle);
        assert!(p.set_picking_mode(PickingMode::Reset));
        assert_eq!(p.atom_mode(), PickingMode::Identify);
        assert_eq!(p.bond_mode(), BondPickingMode::IdentifyBond);
        assert!(!p.bond_picking());
        assert_eq!(p.selection_style(), PickingStyle::Toggle);
        assert_eq!(p.bindings().active_kind(), BindingKind::Default);
    }

    #[test]
    fn styles_select_tables() {
        let mut p = PickingController::new();
        let _ = p.set_picking_style(PickingStyle::ExtendedSelect);
        assert_eq!(p.bindings().active_kind(), BindingKind::Pfaat);
        assert!(!p.rubber_band_enabled());

        let _ = p.set_picking_style(PickingStyle::Drag);
        assert_eq!(p.bindings().active_kind(), BindingKind::Drag);
        assert!(p.rubber_band_enabled());

        assert!(p.set_picking_style(PickingStyle::MeasureOn));
        assert_eq!(p.selection_style(), PickingStyle::Drag);
        assert_eq!(p.measurement_style(), PickingStyle::MeasureOn);

        assert!(!p.clear());
        assert_eq!(p.selection_style(), PickingStyle::ExtendedSelect);
        assert_eq!(p.bindings().active_kind(), BindingKind::Pfaat);
    }

    #[test]
    fn state_script_appends_subtypes() {
        let mut p = PickingController::new();
        let kit = ModelkitInfo {
            atom_type: "N".to_owned(),
            bond_type: "2".to_owned(),
            assign_charge: false,
        };
        assert_eq!(
            p.picking_state_script(false, &kit),
            ";set modelkitMode false;set picking identify;"
        );
        let _ = p.set_picking_mode(PickingMode::AssignAtom);
        let _ = p.set_picking_mode(PickingMode::AssignBond);
        assert_eq!(
            p.picking_state_script(true, &kit),
            ";set modelkitMode true;set picking assignatom_N;set picking assignbond_2;"
        );
    }
}
