#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that runs the Blockade Runner experience.
//!
//! Loads a level, places player blocks supplied on the command line or via
//! an imported layout string, then drives the scripted agent until the run
//! resolves or the simulated time budget expires.

mod layout_transfer;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::Vec2;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

use blockade_core::{
    CellCoord, CellRectSize, ColorHint, Command, Event, LossReason, ObstacleKind, Outcome,
    Provenance,
};
use blockade_rendering::{
    AgentPresentation, Camera, Color, GoalPresentation, GridPresentation, GridProjection, Scene,
    SceneObstacle,
};
use blockade_system_bootstrap::Bootstrap;
use blockade_system_controller::Controller;
use blockade_world::{self as world, query, World};

use crate::layout_transfer::BlockLayoutSnapshot;

/// Fixed 800x600 viewport used for camera bookkeeping.
const CANVAS_SIZE: Vec2 = Vec2::new(800.0, 600.0);

/// Cosmetic fur colors the cat can spawn with: orange, brown, golden.
const CAT_COLORS: [ColorHint; 3] = [
    ColorHint::from_rgb(0xff, 0x6b, 0x35),
    ColorHint::from_rgb(0x8b, 0x45, 0x13),
    ColorHint::from_rgb(0xff, 0xa5, 0x00),
];

const USER_BLOCK_COLOR: ColorHint = ColorHint::from_rgb(0x8b, 0x45, 0x13);
const GOAL_COLOR: ColorHint = ColorHint::from_rgb(0x00, 0xff, 0x00);
const GRID_LINE_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.1);

/// Command-line arguments accepted by the runner.
#[derive(Debug, Parser)]
#[command(name = "blockade", about = "Guide the cat home by placing blocks")]
struct Args {
    /// Level number to load from the catalogue.
    #[arg(long, default_value_t = 1)]
    level: u32,

    /// Simulated seconds to run before giving up.
    #[arg(long, default_value_t = 120.0)]
    duration_secs: f32,

    /// Simulated milliseconds advanced per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Block origin to place before the run, formatted as `column,row`.
    #[arg(long = "block", value_name = "COL,ROW")]
    blocks: Vec<String>,

    /// Previously exported layout string to place before the run.
    #[arg(long, value_name = "LAYOUT")]
    import_layout: Option<String>,

    /// Print the block layout string after placement, before running.
    #[arg(long)]
    export_layout: bool,

    /// Seed for the cosmetic cat color pick.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Enable verbose logging.
    #[arg(long, short)]
    verbose: bool,
}

/// Entry point for the Blockade Runner command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut world = World::new();
    let bootstrap = Bootstrap::new();
    println!("{}", bootstrap.welcome_banner(&world));

    let level = bootstrap.level(args.level)?;
    println!("Level {}: {}", level.number(), level.name());
    println!("{}", level.description());

    let mut commands = Vec::new();
    bootstrap.load_level(args.level, &mut commands)?;
    let _ = apply_all(&mut world, commands);

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let cat_color = CAT_COLORS
        .choose(&mut rng)
        .copied()
        .unwrap_or(CAT_COLORS[0]);

    place_user_blocks(&mut world, &args)?;
    println!("Blocks placed: {}", query::placed_block_count(&world));

    if args.export_layout {
        println!("{}", export_layout(&world));
    }

    let report = run_simulation(&mut world, &args)?;
    let scene = scene_from_world(&world, cat_color);
    print_report(&report, &scene);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::filter::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn place_user_blocks(world: &mut World, args: &Args) -> Result<()> {
    let mut origins = Vec::new();

    if let Some(layout) = &args.import_layout {
        let snapshot = BlockLayoutSnapshot::decode(layout).context("invalid layout string")?;
        let grid = query::grid(world).size();
        if snapshot.columns != grid.columns() || snapshot.rows != grid.rows() {
            bail!(
                "layout was authored for a {}x{} grid but the level uses {}x{}",
                snapshot.columns,
                snapshot.rows,
                grid.columns(),
                grid.rows(),
            );
        }
        origins.extend(snapshot.blocks);
    }

    for raw in &args.blocks {
        origins.push(parse_cell(raw)?);
    }

    for origin in origins {
        let events = apply_all(
            world,
            vec![Command::PlaceObstacle {
                kind: ObstacleKind::Building,
                origin,
                size: CellRectSize::SINGLE,
                color: USER_BLOCK_COLOR,
                provenance: Provenance::User,
            }],
        );
        for event in events {
            if let Event::ObstaclePlacementRejected { origin, reason, .. } = event {
                tracing::warn!(?origin, ?reason, "block placement rejected");
            }
        }
    }
    Ok(())
}

fn parse_cell(raw: &str) -> Result<CellCoord> {
    let (column, row) = raw
        .split_once(',')
        .with_context(|| format!("block '{raw}' must be formatted as 'column,row'"))?;
    let column = column
        .trim()
        .parse::<i32>()
        .with_context(|| format!("invalid block column in '{raw}'"))?;
    let row = row
        .trim()
        .parse::<i32>()
        .with_context(|| format!("invalid block row in '{raw}'"))?;
    Ok(CellCoord::new(column, row))
}

fn export_layout(world: &World) -> String {
    let grid = query::grid(world);
    let blocks = query::obstacle_view(world)
        .into_vec()
        .into_iter()
        .filter(|obstacle| obstacle.provenance == Provenance::User)
        .map(|obstacle| obstacle.region.origin())
        .collect();
    BlockLayoutSnapshot {
        columns: grid.size().columns(),
        rows: grid.size().rows(),
        tile_length: grid.tile_length(),
        blocks,
    }
    .encode()
}

struct RunReport {
    outcome: Outcome,
    final_cell: CellCoord,
    steps: u32,
    bounces: u32,
    simulated: Duration,
}

fn run_simulation(world: &mut World, args: &Args) -> Result<RunReport> {
    let grid = query::grid(world);
    let projection = GridProjection::new(grid.tile_length())?;
    let mut camera = Camera::new(CANVAS_SIZE, Vec2::new(grid.width(), grid.height()));
    camera.center_on(projection.cell_center(query::agent(world).cell));

    let tick = Duration::from_millis(args.tick_ms);
    let budget = Duration::from_secs_f32(args.duration_secs.max(0.0));
    let mut simulated = Duration::ZERO;
    let mut steps = 0u32;
    let mut bounces = 0u32;

    let mut controller = Controller::default();
    let mut commands = Vec::new();
    controller.start(&mut commands);
    let _ = apply_all(world, commands);

    while query::outcome(world).is_in_progress() && simulated < budget {
        simulated = simulated.saturating_add(tick);
        let mut events = Vec::new();
        world::apply(world, Command::Tick { dt: tick }, &mut events);

        loop {
            let mut commands = Vec::new();
            controller.handle(&events, query::agent(world), &mut commands);
            if commands.is_empty() {
                break;
            }
            events = apply_all(world, commands);
            for event in &events {
                match event {
                    Event::AgentMoved { .. } => steps += 1,
                    Event::AgentBlocked { .. } => bounces += 1,
                    _ => {}
                }
            }
        }

        camera.follow(projection.cell_center(query::agent(world).cell));
    }

    Ok(RunReport {
        outcome: query::outcome(world),
        final_cell: query::agent(world).cell,
        steps,
        bounces,
        simulated,
    })
}

fn scene_from_world(world: &World, cat_color: ColorHint) -> Scene {
    let grid = query::grid(world);
    let agent = query::agent(world);
    let outcome = query::outcome(world);
    let obstacles = query::obstacle_view(world)
        .into_vec()
        .into_iter()
        .map(|obstacle| {
            SceneObstacle::new(
                obstacle.id,
                obstacle.kind,
                obstacle.region,
                Color::from_hint(obstacle.color),
                obstacle.provenance,
            )
        })
        .collect();

    Scene::new(
        GridPresentation::new(
            grid.size().columns(),
            grid.size().rows(),
            grid.tile_length(),
            GRID_LINE_COLOR,
        ),
        obstacles,
        AgentPresentation::new(agent.cell, agent.facing, agent.mode, Color::from_hint(cat_color)),
        GoalPresentation::new(
            query::goal(world),
            Color::from_hint(GOAL_COLOR),
            query::goal_reached(world),
        ),
        outcome,
        query::placed_block_count(world),
    )
}

fn print_report(report: &RunReport, scene: &Scene) {
    match report.outcome {
        Outcome::Won => println!("Level Complete! The cat reached home."),
        Outcome::Lost(LossReason::LeftWorld) => {
            println!("Run over: {}.", LossReason::LeftWorld);
        }
        Outcome::InProgress => println!("Out of time: the cat is still wandering."),
    }
    println!(
        "Final cell: ({}, {})",
        report.final_cell.column(),
        report.final_cell.row()
    );
    println!(
        "Steps: {}  Bounces: {}  Blocks placed: {}",
        report.steps, report.bounces, scene.placed_blocks
    );
    println!("Simulated time: {:.1}s", report.simulated.as_secs_f32());
}
