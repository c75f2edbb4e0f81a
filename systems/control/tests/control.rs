use box_siege_core::{CellCoord, Command, Event, Money, StageDirection};
use box_siege_system_control::{Control, ControlInput};
use box_siege_world::{self as world, query, World};

#[test]
fn idle_input_emits_no_commands() {
    let mut system = Control::new();
    let mut out = Vec::new();

    system.handle(ControlInput::default(), &mut out);

    assert!(out.is_empty());
}

#[test]
fn hovering_without_confirmation_emits_no_commands() {
    let mut system = Control::new();
    let mut out = Vec::new();

    let input = ControlInput::new(Some(2), Some(CellCoord::new(0, 0)), false, false, None);
    system.handle(input, &mut out);

    assert!(out.is_empty());
}

#[test]
fn selector_confirmation_takes_precedence_over_grid() {
    let mut system = Control::new();
    let mut out = Vec::new();

    let input = ControlInput::new(Some(1), Some(CellCoord::new(5, 5)), true, false, None);
    system.handle(input, &mut out);

    assert_eq!(out, vec![Command::SelectUnit { index: 1 }]);
}

#[test]
fn grid_confirmation_places_into_the_hovered_cell() {
    let mut system = Control::new();
    let mut out = Vec::new();

    let input = ControlInput::new(None, Some(CellCoord::new(5, 5)), true, false, None);
    system.handle(input, &mut out);

    assert_eq!(
        out,
        vec![Command::PlaceUnit {
            cell: CellCoord::new(5, 5),
        }]
    );
}

#[test]
fn toggle_and_navigation_precede_the_confirmation() {
    let mut system = Control::new();
    let mut out = Vec::new();

    let input = ControlInput::new(
        Some(0),
        None,
        true,
        true,
        Some(StageDirection::Previous),
    );
    system.handle(input, &mut out);

    assert_eq!(
        out,
        vec![
            Command::ToggleSecretUnit,
            Command::NavigateStage {
                direction: StageDirection::Previous,
            },
            Command::SelectUnit { index: 0 },
        ]
    );
}

#[test]
fn distilled_commands_drive_the_world() {
    let mut system = Control::new();
    let mut world = World::new();
    let mut commands = Vec::new();
    let mut events = Vec::new();

    let input = ControlInput::new(None, Some(CellCoord::new(0, 0)), true, false, None);
    system.handle(input, &mut commands);
    for command in commands.drain(..) {
        world::apply(&mut world, command, &mut events);
    }

    assert_eq!(
        events,
        vec![Event::UnitPlaced {
            cell: CellCoord::new(0, 0),
            refund: None,
        }]
    );
    assert_eq!(query::money(&world), Money::new(50));
}
