//! Picking modes and styles with their stable script names.

use std::fmt;
use std::str::FromStr;

use crate::error::InteractError;
use crate::session::MeasureKind;
use crate::viewer::{ConnectMode, SelectScope};

/// What a click on an atom does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum PickingMode {
    Off,
    #[default]
    Identify,
    Label,
    Center,
    Draw,
    Spin,
    Symmetry,
    DeleteAtom,
    DeleteBond,
    SelectAtom,
    SelectGroup,
    SelectChain,
    SelectMolecule,
    SelectPolymer,
    SelectStructure,
    SelectSite,
    SelectModel,
    SelectElement,
    Measure,
    MeasureDistance,
    MeasureAngle,
    MeasureTorsion,
    MeasureSequence,
    Navigate,
    Connect,
    Struts,
    DragSelected,
    DragMolecule,
    DragAtom,
    DragMinimize,
    DragMinimizeMolecule,
    InvertStereo,
    AssignAtom,
    AssignBond,
    RotateBond,
    IdentifyBond,
    DragLigand,
    /// Return both picking axes and the selection style to identify/toggle.
    Reset,
}

impl PickingMode {
    /// Every named mode, in registry order. [`PickingMode::Reset`] is
    /// internal and not listed.
    pub const ALL: [Self; 37] = [
        Self::Off,
        Self::Identify,
        Self::Label,
        Self::Center,
        Self::Draw,
        Self::Spin,
        Self::Symmetry,
        Self::DeleteAtom,
        Self::DeleteBond,
        Self::SelectAtom,
        Self::SelectGroup,
        Self::SelectChain,
        Self::SelectMolecule,
        Self::SelectPolymer,
        Self::SelectStructure,
        Self::SelectSite,
        Self::SelectModel,
        Self::SelectElement,
        Self::Measure,
        Self::MeasureDistance,
        Self::MeasureAngle,
        Self::MeasureTorsion,
        Self::MeasureSequence,
        Self::Navigate,
        Self::Connect,
        Self::Struts,
        Self::DragSelected,
        Self::DragMolecule,
        Self::DragAtom,
        Self::DragMinimize,
        Self::DragMinimizeMolecule,
        Self::InvertStereo,
        Self::AssignAtom,
        Self::AssignBond,
        Self::RotateBond,
        Self::IdentifyBond,
        Self::DragLigand,
    ];

    /// Stable script name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Identify => "identify",
            Self::Label => "label",
            Self::Center => "center",
            Self::Draw => "draw",
            Self::Spin => "spin",
            Self::Symmetry => "symmetry",
            Self::DeleteAtom => "deleteatom",
            Self::DeleteBond => "deletebond",
            Self::SelectAtom => "atom",
            Self::SelectGroup => "group",
            Self::SelectChain => "chain",
            Self::SelectMolecule => "molecule",
            Self::SelectPolymer => "polymer",
            Self::SelectStructure => "structure",
            Self::SelectSite => "site",
            Self::SelectModel => "model",
            Self::SelectElement => "element",
            Self::Measure => "measure",
            Self::MeasureDistance => "distance",
            Self::MeasureAngle => "angle",
            Self::MeasureTorsion => "torsion",
            Self::MeasureSequence => "sequence",
            Self::Navigate => "navigate",
            Self::Connect => "connect",
            Self::Struts => "struts",
            Self::DragSelected => "dragselected",
            Self::DragMolecule => "dragmolecule",
            Self::DragAtom => "dragatom",
            Self::DragMinimize => "dragminimize",
            Self::DragMinimizeMolecule => "dragminimizemolecule",
            Self::InvertStereo => "invertstereo",
            Self::AssignAtom => "assignatom",
            Self::AssignBond => "assignbond",
            Self::RotateBond => "rotatebond",
            Self::IdentifyBond => "identifybond",
            Self::DragLigand => "dragligand",
            Self::Reset => "reset",
        }
    }

    /// Case-insensitive lookup, including `reset`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case(Self::Reset.name()) {
            return Some(Self::Reset);
        }
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Measurement collected by clicks in this mode.
    #[must_use]
    pub const fn measure_kind(self) -> Option<MeasureKind> {
        Some(match self {
            Self::Measure => MeasureKind::Measure,
            Self::MeasureDistance => MeasureKind::Distance,
            Self::MeasureAngle => MeasureKind::Angle,
            Self::MeasureTorsion => MeasureKind::Torsion,
            Self::MeasureSequence => MeasureKind::Sequence,
            Self::Connect => MeasureKind::Connect(ConnectMode::Toggle),
            Self::Struts => MeasureKind::Connect(ConnectMode::Struts),
            Self::DeleteBond => MeasureKind::Connect(ConnectMode::Delete),
            Self::Spin | Self::Symmetry => MeasureKind::Axis,
            _ => return None,
        })
    }

    /// Selection scope for the select-by modes.
    #[must_use]
    pub const fn select_scope(self) -> Option<SelectScope> {
        Some(match self {
            Self::SelectAtom => SelectScope::Atom,
            Self::SelectGroup => SelectScope::Group,
            Self::SelectChain => SelectScope::Chain,
            Self::SelectMolecule => SelectScope::Molecule,
            Self::SelectPolymer => SelectScope::Polymer,
            Self::SelectStructure => SelectScope::Structure,
            Self::SelectSite => SelectScope::Site,
            Self::SelectModel => SelectScope::Model,
            Self::SelectElement => SelectScope::Element,
            _ => return None,
        })
    }

    /// Whether a press in this mode starts an atom drag.
    #[must_use]
    pub const fn is_drag(self) -> bool {
        matches!(
            self,
            Self::DragSelected
                | Self::DragMolecule
                | Self::DragAtom
                | Self::DragMinimize
                | Self::DragMinimizeMolecule
                | Self::DragLigand
        )
    }
}

impl fmt::Display for PickingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PickingMode {
    type Err = InteractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| InteractError::UnknownPickingMode(s.to_owned()))
    }
}

/// What a click on a bond does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondPickingMode {
    /// Bond clicks fall through to atom handling.
    #[default]
    Off,
    /// Report the bond.
    IdentifyBond,
    /// Rotate the branch about the bond.
    RotateBond,
    /// Assign the model kit bond type.
    AssignBond,
    /// Delete the bond.
    DeleteBond,
}

impl BondPickingMode {
    /// Stable script name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::IdentifyBond => "identifybond",
            Self::RotateBond => "rotatebond",
            Self::AssignBond => "assignbond",
            Self::DeleteBond => "deletebond",
        }
    }
}

impl fmt::Display for BondPickingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Selection or measurement style. Selection styles choose the active
/// binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PickingStyle {
    /// Click toggles (the default table).
    #[default]
    Toggle,
    /// RasMol-style select, shift-click toggles.
    SelectOrToggle,
    /// PFAAT-style extended select.
    ExtendedSelect,
    /// Drag a rubber band to select.
    Drag,
    /// Measurements stay displayed.
    MeasureOn,
    /// Measurements are transient.
    MeasureOff,
}

impl PickingStyle {
    /// Every style, in registry order.
    pub const ALL: [Self; 6] = [
        Self::Toggle,
        Self::SelectOrToggle,
        Self::ExtendedSelect,
        Self::Drag,
        Self::MeasureOn,
        Self::MeasureOff,
    ];

    /// Stable script name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::SelectOrToggle => "selectOrToggle",
            Self::ExtendedSelect => "extendedSelect",
            Self::Drag => "drag",
            Self::MeasureOn => "measure",
            Self::MeasureOff => "measureoff",
        }
    }

    /// Whether this is one of the measurement styles.
    #[must_use]
    pub const fn is_measurement(self) -> bool {
        matches!(self, Self::MeasureOn | Self::MeasureOff)
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for PickingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PickingStyle {
    type Err = InteractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| InteractError::UnknownPickingStyle(s.to_owned()))
    }
}
