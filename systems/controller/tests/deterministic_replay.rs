use std::time::Duration;

use blockade_core::{
    CellCoord, CellRectSize, ColorHint, Command, Direction, Event, GridSize, ObstacleKind,
    Outcome, Provenance,
};
use blockade_system_controller::Controller;
use blockade_world::{self as world, query, World};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");

    // The scripted course: right into the building at (6,4), reverse to the
    // left, and walk onto the goal at (2,4) on the fifth step.
    assert_eq!(first.final_cell, CellCoord::new(2, 4));
    assert_eq!(first.final_facing, Direction::Left);
    assert_eq!(first.outcome, Outcome::Won);
    assert_eq!(first.moves, 4);
    assert_eq!(first.blocks, 1);
}

fn replay() -> ReplayOutcome {
    let mut world = World::new();
    let mut controller = Controller::default();
    let mut log: Vec<EventRecord> = Vec::new();

    let mut events = Vec::new();
    for command in scripted_setup() {
        world::apply(&mut world, command, &mut events);
    }
    record(&events, &mut log);

    let mut commands = Vec::new();
    controller.start(&mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    record(&events, &mut log);

    for _ in 0..8 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );
        record(&events, &mut log);

        loop {
            let mut commands = Vec::new();
            controller.handle(&events, query::agent(&world), &mut commands);
            if commands.is_empty() {
                break;
            }
            events.clear();
            for command in commands {
                world::apply(&mut world, command, &mut events);
            }
            record(&events, &mut log);
        }
    }

    let agent = query::agent(&world);
    ReplayOutcome {
        final_cell: agent.cell,
        final_facing: agent.facing,
        outcome: query::outcome(&world),
        moves: log
            .iter()
            .filter(|record| matches!(record, EventRecord::Moved { .. }))
            .count(),
        blocks: log
            .iter()
            .filter(|record| matches!(record, EventRecord::Blocked { .. }))
            .count(),
        events: log,
    }
}

fn scripted_setup() -> Vec<Command> {
    vec![
        Command::ConfigureGrid {
            size: GridSize::new(10, 10),
            tile_length: 32.0,
        },
        Command::PlaceObstacle {
            kind: ObstacleKind::Building,
            origin: CellCoord::new(6, 4),
            size: CellRectSize::SINGLE,
            color: ColorHint::from_rgb(96, 96, 96),
            provenance: Provenance::Level,
        },
        Command::SetGoal {
            cell: CellCoord::new(2, 4),
        },
        Command::SetPreferredSpawn {
            cell: CellCoord::new(4, 4),
        },
        Command::ResetRun,
    ]
}

fn record(events: &[Event], log: &mut Vec<EventRecord>) {
    log.extend(events.iter().filter_map(EventRecord::from_event));
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ReplayOutcome {
    final_cell: CellCoord,
    final_facing: Direction,
    outcome: Outcome,
    moves: usize,
    blocks: usize,
    events: Vec<EventRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum EventRecord {
    Moved {
        from: CellCoord,
        to: CellCoord,
        facing: Direction,
    },
    Blocked {
        at: CellCoord,
        facing: Direction,
    },
    Won {
        cell: CellCoord,
    },
    Lost,
}

impl EventRecord {
    fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::AgentMoved { from, to, facing } => Some(Self::Moved {
                from: *from,
                to: *to,
                facing: *facing,
            }),
            Event::AgentBlocked { at, facing, .. } => Some(Self::Blocked {
                at: *at,
                facing: *facing,
            }),
            Event::RunWon { cell } => Some(Self::Won { cell: *cell }),
            Event::RunLost { .. } => Some(Self::Lost),
            _ => None,
        }
    }
}
