use std::time::Duration;

use box_siege_core::{CellCoord, Command, Event, Money, Stage, StageDirection};
use box_siege_world::{self as world, query, World};

const STEP: Duration = Duration::from_millis(20);

fn apply(world: &mut World, command: Command, events: &mut Vec<Event>) {
    world::apply(world, command, events);
}

/// Toggles the hidden template in, selects it and places it on a corner cell.
fn deploy_secret_unit(world: &mut World, cell: CellCoord) {
    let mut events = Vec::new();
    apply(world, Command::ToggleSecretUnit, &mut events);
    apply(world, Command::SelectUnit { index: 4 }, &mut events);
    apply(world, Command::PlaceUnit { cell }, &mut events);
    assert!(
        events.contains(&Event::UnitPlaced { cell, refund: None }),
        "secret unit should be affordable from starting money"
    );
}

#[test]
fn frontier_kills_march_the_box_to_the_terminal_stage() {
    let mut world = World::new();
    let cell = CellCoord::new(0, 0);
    deploy_secret_unit(&mut world, cell);

    let mut now = Duration::ZERO;
    let mut unlocked = Vec::new();
    let mut terminal_events = 0;

    for _ in 0..100_000 {
        now += STEP;
        let mut events = Vec::new();
        apply(&mut world, Command::Tick { now }, &mut events);
        apply(&mut world, Command::Strike { cell }, &mut events);

        for event in &events {
            match event {
                Event::StageUnlocked { stage } => unlocked.push(*stage),
                Event::TerminalStageReached => terminal_events += 1,
                _ => {}
            }
        }

        if terminal_events > 0 {
            break;
        }
    }

    let expected: Vec<Stage> = (2..=10).map(Stage::new).collect();
    assert_eq!(unlocked, expected, "stages must unlock one at a time");
    assert_eq!(terminal_events, 1);

    let snapshot = query::box_view(&world);
    assert_eq!(snapshot.stage, Stage::TERMINAL);
    assert_eq!(snapshot.max_stage, Stage::TERMINAL);
    assert_eq!(snapshot.progress, 0);
    assert_eq!(snapshot.health, snapshot.max_health);

    // The kill that entered the terminal stage paid the terminal reward.
    assert_eq!(query::money(&world), Money::MAX);

    // The terminal stage is not exitable through navigation.
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::NavigateStage {
            direction: StageDirection::Previous,
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::NavigateStage {
            direction: StageDirection::Next,
        },
        &mut events,
    );
    assert!(events.is_empty());
    assert_eq!(query::box_view(&world).stage, Stage::TERMINAL);
}

#[test]
fn kills_below_the_frontier_still_pay_out() {
    let mut world = World::new();
    let cell = CellCoord::new(6, 0);
    deploy_secret_unit(&mut world, cell);

    let mut now = Duration::ZERO;
    let mut kills = 0;

    // Unlock stage 2 at the frontier.
    while kills < 10 {
        now += STEP;
        let mut events = Vec::new();
        apply(&mut world, Command::Tick { now }, &mut events);
        apply(&mut world, Command::Strike { cell }, &mut events);
        kills += events
            .iter()
            .filter(|event| matches!(event, Event::BoxDestroyed { .. }))
            .count();
    }
    assert_eq!(query::box_view(&world).max_stage, Stage::new(2));

    // Step back down to stage 1 and kill once more.
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::NavigateStage {
            direction: StageDirection::Previous,
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::StageChanged {
            stage: Stage::FIRST
        }]
    );

    let before = query::money(&world);
    let mut reward = None;
    for _ in 0..1_000 {
        now += STEP;
        let mut events = Vec::new();
        apply(&mut world, Command::Tick { now }, &mut events);
        apply(&mut world, Command::Strike { cell }, &mut events);
        if let Some(Event::BoxDestroyed { reward: paid }) = events
            .iter()
            .find(|event| matches!(event, Event::BoxDestroyed { .. }))
        {
            reward = Some(*paid);
            break;
        }
    }

    assert_eq!(reward, Some(Money::new(50)), "off-frontier kills pay out");
    assert!(query::money(&world) > before);

    let snapshot = query::box_view(&world);
    assert_eq!(snapshot.progress, 0, "progress only accrues at the frontier");
    assert_eq!(snapshot.max_stage, Stage::new(2));
    assert_eq!(snapshot.stage, Stage::FIRST);
}
