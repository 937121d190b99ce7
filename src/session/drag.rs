//! Press-drag-release manipulation of atoms and selections.

use std::collections::BTreeSet;

use crate::action::{ActionCode, ActionId};
use crate::binding::BindingTable;
use crate::picking::PickingMode;
use crate::viewer::{AtomSelection, SelectionOp, UndoKind, Viewer, ViewerCommand};

/// What moving the pointer does during a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragBehavior {
    /// Translate the atom and its hydrogens.
    MoveAtom,
    /// Translate or rotate the current selection.
    MoveSelected,
    /// Translate or rotate the atom's whole molecule.
    MoveMolecule {
        /// Restrict to ligand atoms.
        ligand_only: bool,
    },
    /// Translate the atom, then minimize on release.
    Minimize {
        /// Carry the whole molecule and minimize it silently.
        molecule: bool,
    },
    /// Model kit: trace a new bond from the atom.
    AssignNew,
}

impl DragBehavior {
    /// Behavior for an atom-picking mode, if it drags atoms.
    #[must_use]
    pub const fn for_mode(mode: PickingMode) -> Option<Self> {
        Some(match mode {
            PickingMode::DragAtom => Self::MoveAtom,
            PickingMode::DragSelected => Self::MoveSelected,
            PickingMode::DragMolecule => Self::MoveMolecule { ligand_only: false },
            PickingMode::DragLigand => Self::MoveMolecule { ligand_only: true },
            PickingMode::DragMinimize => Self::Minimize { molecule: false },
            PickingMode::DragMinimizeMolecule => Self::Minimize { molecule: true },
            PickingMode::AssignAtom => Self::AssignNew,
            _ => return None,
        })
    }

    /// Actions on the drag code that let a press start this behavior.
    #[must_use]
    pub const fn press_actions(self) -> &'static [ActionId] {
        match self {
            Self::MoveAtom => &[ActionId::DragAtom, ActionId::DragZ],
            Self::MoveSelected | Self::MoveMolecule { .. } => &[
                ActionId::DragAtom,
                ActionId::DragZ,
                ActionId::RotateSelected,
            ],
            Self::Minimize { molecule: false } => {
                &[ActionId::DragMinimize, ActionId::DragZ]
            }
            Self::Minimize { molecule: true } => &[
                ActionId::DragMinimize,
                ActionId::DragZ,
                ActionId::RotateSelected,
            ],
            Self::AssignNew => &[],
        }
    }

    const fn carries_molecule(self) -> Option<bool> {
        match self {
            Self::MoveMolecule { ligand_only } => Some(ligand_only),
            Self::Minimize { molecule: true } => Some(false),
            _ => None,
        }
    }
}

/// One motion sample applied to a drag.
#[derive(Debug, Clone, Copy)]
pub struct DragMotion<'a> {
    /// Active bindings.
    pub table: &'a BindingTable,
    /// Drag action code after host rewriting.
    pub code: ActionCode,
    /// Pixels right since the last sample.
    pub dx: i32,
    /// Pixels down since the last sample.
    pub dy: i32,
    /// `(dx, dy)` converted to rotation degrees.
    pub degrees: (f32, f32),
    /// This is the first sample of the drag.
    pub first_sample: bool,
    /// Selections may rotate rather than translate.
    pub allow_rotate_selected: bool,
}

/// The atom being dragged and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    atom: usize,
    behavior: DragBehavior,
    target: Option<BTreeSet<usize>>,
}

impl DragSession {
    /// Start dragging `atom`. Molecule behaviors resolve their target atoms
    /// through the viewer.
    pub fn begin<V: Viewer + ?Sized>(
        viewer: &V,
        atom: usize,
        behavior: DragBehavior,
    ) -> Self {
        let target = behavior
            .carries_molecule()
            .map(|ligand_only| viewer.molecule_atoms(atom, ligand_only));
        log::debug!("drag begin: atom {atom} {behavior:?}");
        Self {
            atom,
            behavior,
            target,
        }
    }

    /// The dragged atom.
    #[must_use]
    pub fn atom(&self) -> usize {
        self.atom
    }

    /// How the drag behaves.
    #[must_use]
    pub fn behavior(&self) -> DragBehavior {
        self.behavior
    }

    /// Atoms moved with the dragged one, for molecule behaviors.
    #[must_use]
    pub fn target(&self) -> Option<&BTreeSet<usize>> {
        self.target.as_ref()
    }

    /// Apply one motion sample.
    pub fn apply_motion<V: Viewer + ?Sized>(&self, viewer: &mut V, m: &DragMotion<'_>) {
        let rotate = m.table.is_bound(m.code, ActionId::RotateSelected)
            && m.allow_rotate_selected;
        let dz = m
            .table
            .is_bound(m.code, ActionId::DragZ)
            .then_some(-m.dy);
        match self.behavior {
            DragBehavior::AssignNew => {}
            DragBehavior::MoveSelected => {
                viewer.execute(if rotate {
                    ViewerCommand::RotateSelected {
                        degrees_x: m.degrees.0,
                        degrees_y: m.degrees.1,
                        atoms: None,
                    }
                } else {
                    ViewerCommand::MoveSelected {
                        dx: m.dx,
                        dy: m.dy,
                        dz,
                    }
                });
            }
            DragBehavior::MoveAtom
            | DragBehavior::MoveMolecule { .. }
            | DragBehavior::Minimize { .. } => {
                if m.first_sample {
                    viewer.execute(ViewerCommand::RecordUndo(UndoKind::Coordinates(
                        self.atom,
                    )));
                }
                if rotate {
                    viewer.execute(ViewerCommand::RotateSelected {
                        degrees_x: m.degrees.0,
                        degrees_y: m.degrees.1,
                        atoms: self.target.clone(),
                    });
                    return;
                }
                if let Some(target) = &self.target {
                    viewer.mutate_selection(
                        &AtomSelection::Atoms(target.clone()),
                        SelectionOp::Replace,
                    );
                }
                viewer.execute(ViewerCommand::MoveAtom {
                    atom: self.atom,
                    dx: m.dx,
                    dy: m.dy,
                    dz,
                    atoms: self.target.clone(),
                });
            }
        }
    }

    /// Finish the drag. Minimizing behaviors request a minimization.
    pub fn release<V: Viewer + ?Sized>(self, viewer: &mut V) {
        if let DragBehavior::Minimize { molecule } = self.behavior {
            viewer.execute(ViewerCommand::Minimize {
                atom: self.atom,
                molecule,
            });
        }
        log::debug!("drag end: atom {}", self.atom);
    }
}
