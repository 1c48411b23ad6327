use std::time::Duration;

use blockade_core::{CellCoord, Command, Direction, Event, GridSize};
use blockade_system_controller::{Config, Controller};
use blockade_world::{self as world, query, World};

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn prepared_world(spawn: CellCoord, goal: CellCoord) -> World {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![
            Command::ConfigureGrid {
                size: GridSize::new(10, 10),
                tile_length: 32.0,
            },
            Command::SetGoal { cell: goal },
            Command::SetPreferredSpawn { cell: spawn },
            Command::ResetRun,
        ],
    );
    world
}

fn advance(world: &mut World, controller: &mut Controller, dt: Duration) {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);

    loop {
        let mut commands = Vec::new();
        controller.handle(&events, query::agent(world), &mut commands);
        if commands.is_empty() {
            break;
        }
        events = apply_all(world, commands);
    }
}

#[test]
fn the_agent_advances_one_cell_per_half_second() {
    let mut world = prepared_world(CellCoord::new(4, 4), CellCoord::new(0, 0));
    let mut controller = Controller::default();
    let mut commands = Vec::new();
    controller.start(&mut commands);
    let _ = apply_all(&mut world, commands);

    for _ in 0..4 {
        advance(&mut world, &mut controller, Duration::from_millis(250));
    }

    assert_eq!(query::agent(&world).cell, CellCoord::new(6, 4));
    assert_eq!(query::agent(&world).facing, Direction::Right);
}

#[test]
fn an_idle_controller_leaves_the_agent_in_place() {
    let mut world = prepared_world(CellCoord::new(4, 4), CellCoord::new(0, 0));
    let mut controller = Controller::default();

    for _ in 0..8 {
        advance(&mut world, &mut controller, Duration::from_millis(250));
    }

    assert_eq!(query::agent(&world).cell, CellCoord::new(4, 4));
}

#[test]
fn a_custom_cadence_is_honored() {
    let mut world = prepared_world(CellCoord::new(4, 4), CellCoord::new(0, 0));
    let mut controller = Controller::new(Config::new(Duration::from_millis(250)));
    let mut commands = Vec::new();
    controller.start(&mut commands);
    let _ = apply_all(&mut world, commands);

    for _ in 0..4 {
        advance(&mut world, &mut controller, Duration::from_millis(250));
    }

    assert_eq!(query::agent(&world).cell, CellCoord::new(8, 4));
}

#[test]
fn winning_stops_the_cadence() {
    let mut world = prepared_world(CellCoord::new(4, 4), CellCoord::new(5, 4));
    let mut controller = Controller::default();
    let mut commands = Vec::new();
    controller.start(&mut commands);
    let _ = apply_all(&mut world, commands);

    for _ in 0..8 {
        advance(&mut world, &mut controller, Duration::from_millis(500));
    }

    assert_eq!(query::agent(&world).cell, CellCoord::new(5, 4));
    assert!(!controller.is_running());
    assert!(!query::outcome(&world).is_in_progress());
}
