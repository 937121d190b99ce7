use super::{BindingKind, BindingTable};
use crate::action::{ActionCode, ActionId};
use crate::input::{ButtonMods, EventKind};

const LEFT: ButtonMods = ButtonMods::LEFT;
const RIGHT: ButtonMods = ButtonMods::RIGHT;
const MIDDLE: ButtonMods = ButtonMods::MIDDLE;
const SHIFT: ButtonMods = ButtonMods::SHIFT;
const CTRL: ButtonMods = ButtonMods::CTRL;
const ALT: ButtonMods = ButtonMods::ALT;

const fn single(mods: ButtonMods, kind: EventKind) -> ActionCode {
    ActionCode::of(1, mods, kind)
}

const fn double(mods: ButtonMods, kind: EventKind) -> ActionCode {
    ActionCode::of(2, mods, kind)
}

const fn or(a: ButtonMods, b: ButtonMods) -> ButtonMods {
    a.union(b)
}

/// Install the built-in bindings for `table.kind()`.
pub(super) fn install(table: &mut BindingTable) {
    install_general(table);
    match table.kind() {
        BindingKind::Default => install_toggle(table),
        BindingKind::Rasmol => install_rasmol(table),
        BindingKind::Pfaat => install_pfaat(table),
        BindingKind::Drag => install_drag(table),
    }
}

fn bind_all(table: &mut BindingTable, code: ActionCode, ids: &[ActionId]) {
    for &id in ids {
        table.bind_action(code, id);
    }
}

fn install_general(t: &mut BindingTable) {
    use EventKind::{Clicked, Dragged, Pressed, Wheeled};

    // ── Camera ──
    bind_all(
        t,
        single(LEFT, Dragged),
        &[
            ActionId::Rotate,
            ActionId::RotateBranch,
            ActionId::DragAtom,
            ActionId::DragMinimize,
            ActionId::DragMinimizeMolecule,
            ActionId::DragLabel,
            ActionId::DragDrawPoint,
            ActionId::SlideZoom,
            ActionId::NavTranslate,
            ActionId::Swipe,
        ],
    );
    for code in [
        single(or(or(CTRL, ALT), LEFT), Dragged),
        single(or(CTRL, RIGHT), Dragged),
        double(or(SHIFT, LEFT), Dragged),
        double(MIDDLE, Dragged),
    ] {
        t.bind_action(code, ActionId::Translate);
    }
    for code in [
        single(or(SHIFT, LEFT), Dragged),
        single(MIDDLE, Dragged),
        single(or(SHIFT, RIGHT), Dragged),
    ] {
        t.bind_action(code, ActionId::RotateZorZoom);
    }
    t.bind_action(single(ButtonMods::empty(), Wheeled), ActionId::WheelZoom);
    t.bind_action(single(or(SHIFT, LEFT), Clicked), ActionId::Center);
    t.bind_action(double(or(SHIFT, LEFT), Clicked), ActionId::Reset);
    t.bind_action(single(LEFT, Pressed), ActionId::StopMotion);

    // ── Clipping ──
    t.bind_action(single(or(or(CTRL, SHIFT), LEFT), Dragged), ActionId::Slab);
    t.bind_action(double(or(or(CTRL, SHIFT), LEFT), Dragged), ActionId::Depth);
    t.bind_action(
        single(or(or(or(CTRL, ALT), SHIFT), LEFT), Dragged),
        ActionId::SlabAndDepth,
    );

    // ── Dragging ──
    t.bind_action(single(or(ALT, LEFT), Dragged), ActionId::RotateSelected);
    bind_all(
        t,
        single(or(SHIFT, LEFT), Dragged),
        &[ActionId::DragZ, ActionId::DragDrawObject],
    );
    t.bind_action(
        single(or(or(ALT, SHIFT), LEFT), Dragged),
        ActionId::DragSelected,
    );
    t.bind_action(single(or(CTRL, LEFT), Dragged), ActionId::SpinDrawObjectCcw);
    t.bind_action(
        single(or(or(CTRL, SHIFT), LEFT), Dragged),
        ActionId::SpinDrawObjectCw,
    );

    // ── Menus ──
    t.bind_action(single(or(CTRL, LEFT), Clicked), ActionId::PopupMenu);
    t.bind_action(single(RIGHT, Pressed), ActionId::PopupMenu);

    // ── Picking ──
    bind_all(
        t,
        single(LEFT, Clicked),
        &[
            ActionId::ClickFrank,
            ActionId::PickAtom,
            ActionId::PickPoint,
            ActionId::PickLabel,
            ActionId::PickMeasure,
            ActionId::PickIsosurface,
            ActionId::DeleteAtom,
            ActionId::DeleteBond,
            ActionId::ConnectAtoms,
            ActionId::AssignNew,
        ],
    );
    t.bind_action(double(LEFT, Clicked), ActionId::SetMeasure);
    t.bind_action(
        single(or(or(CTRL, SHIFT), LEFT), Clicked),
        ActionId::PickNavigate,
    );
}

fn install_toggle(t: &mut BindingTable) {
    t.bind_action(double(LEFT, EventKind::Clicked), ActionId::Select);
    t.bind_action(
        single(LEFT, EventKind::Clicked),
        ActionId::SelectToggleExtended,
    );
}

fn install_rasmol(t: &mut BindingTable) {
    t.bind_action(single(LEFT, EventKind::Clicked), ActionId::Select);
    t.bind_action(
        single(or(SHIFT, LEFT), EventKind::Clicked),
        ActionId::SelectToggle,
    );
}

fn install_pfaat(t: &mut BindingTable) {
    use EventKind::Clicked;

    bind_all(
        t,
        single(LEFT, Clicked),
        &[ActionId::Select, ActionId::SelectNone],
    );
    t.bind_action(single(or(SHIFT, LEFT), Clicked), ActionId::SelectToggle);
    t.bind_action(
        single(or(or(ALT, SHIFT), LEFT), Clicked),
        ActionId::SelectAndNot,
    );
    t.bind_action(single(or(ALT, LEFT), Clicked), ActionId::SelectOr);
}

fn install_drag(t: &mut BindingTable) {
    use EventKind::{Clicked, Dragged, Pressed};

    t.bind_action(single(or(ALT, LEFT), Clicked), ActionId::Select);
    t.bind_action(single(LEFT, Pressed), ActionId::SelectAndDrag);
    t.bind_action(single(LEFT, Dragged), ActionId::DragSelected);
    t.bind_action(single(or(SHIFT, LEFT), Clicked), ActionId::SelectToggle);
    t.bind_action(
        single(or(or(ALT, SHIFT), LEFT), Clicked),
        ActionId::SelectOr,
    );
}
