#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Blockade Runner.
//!
//! The world owns the city grid, the obstacle registry, the agent, and the
//! run outcome. All mutation flows through [`apply`]; all observation flows
//! through the [`query`] module.

mod spawn;

use blockade_core::{
    AgentMode, CellCoord, CellRect, CellRectSize, ColorHint, Command, Direction, Event, GridSize,
    LossReason, ObstacleId, ObstacleKind, ObstacleSnapshot, Outcome, PlacementError, Provenance,
    RemovalError, StepResult, WELCOME_BANNER,
};

const DEFAULT_GRID_COLUMNS: u32 = 50;
const DEFAULT_GRID_ROWS: u32 = 50;
const DEFAULT_TILE_LENGTH: f32 = 32.0;

const DEFAULT_GOAL: CellCoord = CellCoord::new(2, 2);
const DEFAULT_SPAWN: CellCoord = CellCoord::new(45, 45);
const INITIAL_FACING: Direction = Direction::Right;

/// Describes the discrete cell layout of the world.
#[derive(Debug)]
pub struct Grid {
    size: GridSize,
    tile_length: f32,
}

impl Grid {
    #[must_use]
    const fn new(size: GridSize, tile_length: f32) -> Self {
        Self { size, tile_length }
    }

    /// Dimensions of the grid measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.size.columns() as f32 * self.tile_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.size.rows() as f32 * self.tile_length
    }
}

#[derive(Debug)]
struct Obstacle {
    id: ObstacleId,
    kind: ObstacleKind,
    region: CellRect,
    color: ColorHint,
    provenance: Provenance,
}

/// Registry of every obstacle currently placed in the world.
///
/// Overlapping footprints are permitted; lookups resolve to the earliest
/// placed match so insertion order stays observable and deterministic.
#[derive(Debug, Default)]
struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleRegistry {
    fn add(
        &mut self,
        kind: ObstacleKind,
        region: CellRect,
        color: ColorHint,
        provenance: Provenance,
    ) -> ObstacleId {
        let id = ObstacleId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.obstacles.push(Obstacle {
            id,
            kind,
            region,
            color,
            provenance,
        });
        id
    }

    /// First solid obstacle whose footprint covers the cell, if any.
    fn blocking_at(&self, cell: CellCoord) -> Option<(ObstacleId, Provenance)> {
        self.obstacles
            .iter()
            .find(|obstacle| obstacle.kind.is_solid() && obstacle.region.contains(cell))
            .map(|obstacle| (obstacle.id, obstacle.provenance))
    }

    /// Removes the first player-placed obstacle anchored at the cell.
    fn remove_user_at(&mut self, cell: CellCoord) -> Option<(ObstacleId, CellRect)> {
        let index = self.obstacles.iter().position(|obstacle| {
            obstacle.provenance == Provenance::User && obstacle.region.origin() == cell
        })?;
        let removed = self.obstacles.remove(index);
        Some((removed.id, removed.region))
    }

    fn clear_user_placed(&mut self) -> u32 {
        let before = self.obstacles.len();
        self.obstacles
            .retain(|obstacle| obstacle.provenance == Provenance::Level);
        (before - self.obstacles.len()) as u32
    }

    fn user_placed_count(&self) -> u32 {
        self.obstacles
            .iter()
            .filter(|obstacle| obstacle.provenance == Provenance::User)
            .count() as u32
    }

    fn snapshots(&self) -> Vec<ObstacleSnapshot> {
        self.obstacles
            .iter()
            .map(|obstacle| ObstacleSnapshot {
                id: obstacle.id,
                kind: obstacle.kind,
                region: obstacle.region,
                color: obstacle.color,
                provenance: obstacle.provenance,
            })
            .collect()
    }
}

/// The single scripted agent navigating the grid.
#[derive(Debug)]
struct Agent {
    cell: CellCoord,
    facing: Direction,
    mode: AgentMode,
}

impl Agent {
    const fn new(cell: CellCoord) -> Self {
        Self {
            cell,
            facing: INITIAL_FACING,
            mode: AgentMode::Idle,
        }
    }

    /// Attempts one step in the provided direction.
    ///
    /// The candidate cell is never bounds-checked: the agent may step outside
    /// the grid and the outcome evaluation converts that transient state into
    /// a loss. On a blocked step the agent stays put and rotates its current
    /// facing, counter-clockwise for player-placed blocks and a full reversal
    /// for level geometry.
    fn attempt_step(
        &mut self,
        direction: Direction,
        registry: &ObstacleRegistry,
    ) -> (StepResult, Option<ObstacleId>) {
        let candidate = self.cell.stepped(direction);
        match registry.blocking_at(candidate) {
            None => {
                self.cell = candidate;
                self.facing = direction;
                (StepResult::Moved, None)
            }
            Some((id, Provenance::User)) => {
                self.facing = self.facing.rotated_counter_clockwise();
                (StepResult::BlockedByUser, Some(id))
            }
            Some((id, Provenance::Level)) => {
                self.facing = self.facing.reversed();
                (StepResult::BlockedByLevel, Some(id))
            }
        }
    }
}

/// Represents the authoritative Blockade Runner world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    obstacles: ObstacleRegistry,
    agent: Agent,
    goal: CellCoord,
    preferred_spawn: CellCoord,
    outcome: Outcome,
}

impl World {
    /// Creates a new Blockade Runner world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(
                GridSize::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS),
                DEFAULT_TILE_LENGTH,
            ),
            obstacles: ObstacleRegistry::default(),
            agent: Agent::new(DEFAULT_SPAWN),
            goal: DEFAULT_GOAL,
            preferred_spawn: DEFAULT_SPAWN,
            outcome: Outcome::InProgress,
        }
    }

    fn validate_placement(
        &self,
        origin: CellCoord,
        size: CellRectSize,
    ) -> Result<CellRect, PlacementError> {
        if size.is_empty() {
            return Err(PlacementError::EmptyFootprint);
        }
        let region = CellRect::from_origin_and_size(origin, size);
        let far_corner = CellCoord::new(
            origin.column() + size.width() as i32 - 1,
            origin.row() + size.height() as i32 - 1,
        );
        if !self.grid.size().contains(origin) || !self.grid.size().contains(far_corner) {
            return Err(PlacementError::OutOfBounds);
        }
        Ok(region)
    }

    /// Resolves win and loss immediately after agent movement and on ticks.
    /// Idempotent once the run is terminal.
    fn evaluate_outcome(&mut self, out_events: &mut Vec<Event>) {
        if !self.outcome.is_in_progress() {
            return;
        }
        // Leaving the world is checked before the goal so an out-of-bounds
        // goal cell can never convert a fall off the edge into a win.
        if !self.grid.size().contains(self.agent.cell) {
            self.outcome = Outcome::Lost(LossReason::LeftWorld);
            out_events.push(Event::RunLost {
                reason: LossReason::LeftWorld,
            });
            if self.agent.mode != AgentMode::Idle {
                self.agent.mode = AgentMode::Idle;
                out_events.push(Event::AgentModeChanged {
                    mode: AgentMode::Idle,
                });
            }
        } else if self.agent.cell == self.goal {
            self.outcome = Outcome::Won;
            out_events.push(Event::RunWon { cell: self.goal });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { size, tile_length } => {
            world.grid = Grid::new(size, tile_length);
            world.obstacles = ObstacleRegistry::default();
            world.outcome = Outcome::InProgress;
            out_events.push(Event::GridConfigured { size, tile_length });
        }
        Command::SetGoal { cell } => {
            world.goal = cell;
            out_events.push(Event::GoalConfigured { cell });
        }
        Command::SetPreferredSpawn { cell } => {
            world.preferred_spawn = cell;
            out_events.push(Event::SpawnConfigured { cell });
        }
        Command::PlaceObstacle {
            kind,
            origin,
            size,
            color,
            provenance,
        } => match world.validate_placement(origin, size) {
            Ok(region) => {
                let id = world.obstacles.add(kind, region, color, provenance);
                out_events.push(Event::ObstaclePlaced {
                    id,
                    kind,
                    region,
                    provenance,
                });
            }
            Err(reason) => {
                tracing::warn!(?kind, ?origin, ?reason, "rejected obstacle placement");
                out_events.push(Event::ObstaclePlacementRejected {
                    kind,
                    origin,
                    reason,
                });
            }
        },
        Command::RemoveUserObstacle { cell } => match world.obstacles.remove_user_at(cell) {
            Some((id, region)) => {
                out_events.push(Event::ObstacleRemoved { id, region });
            }
            None => {
                tracing::debug!(?cell, "no player-placed obstacle anchored at cell");
                out_events.push(Event::ObstacleRemovalRejected {
                    cell,
                    reason: RemovalError::NoUserObstacle,
                });
            }
        },
        Command::ClearUserObstacles => {
            let removed = world.obstacles.clear_user_placed();
            out_events.push(Event::UserObstaclesCleared { removed });
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.evaluate_outcome(out_events);
        }
        Command::StepAgent { direction } => {
            if !world.outcome.is_in_progress() {
                tracing::debug!(?direction, "step ignored: run already resolved");
                return;
            }
            let from = world.agent.cell;
            let (result, obstacle) = world.agent.attempt_step(direction, &world.obstacles);
            match (result, obstacle) {
                (StepResult::Moved, _) => {
                    out_events.push(Event::AgentMoved {
                        from,
                        to: world.agent.cell,
                        facing: world.agent.facing,
                    });
                    world.evaluate_outcome(out_events);
                }
                (StepResult::BlockedByUser, Some(id)) => {
                    out_events.push(Event::AgentBlocked {
                        at: from.stepped(direction),
                        obstacle: id,
                        provenance: Provenance::User,
                        facing: world.agent.facing,
                    });
                }
                (StepResult::BlockedByLevel, Some(id)) => {
                    out_events.push(Event::AgentBlocked {
                        at: from.stepped(direction),
                        obstacle: id,
                        provenance: Provenance::Level,
                        facing: world.agent.facing,
                    });
                }
                (StepResult::BlockedByUser | StepResult::BlockedByLevel, None) => {}
            }
        }
        Command::SetAgentMode { mode } => {
            if world.agent.mode != mode {
                world.agent.mode = mode;
                out_events.push(Event::AgentModeChanged { mode });
            }
        }
        Command::ResetRun => {
            world.outcome = Outcome::InProgress;
            let spawn_cell = spawn::find_valid_spawn(
                world.preferred_spawn,
                world.grid.size(),
                &world.obstacles,
            );
            world.agent.cell = spawn_cell;
            out_events.push(Event::RunReset {
                agent_cell: spawn_cell,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, World};
    use blockade_core::{
        AgentSnapshot, CellCoord, ObstacleId, ObstacleView, Outcome, Provenance,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's grid definition.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Captures a read-only snapshot of the agent.
    #[must_use]
    pub fn agent(world: &World) -> AgentSnapshot {
        AgentSnapshot {
            cell: world.agent.cell,
            facing: world.agent.facing,
            mode: world.agent.mode,
        }
    }

    /// Captures a read-only view of every obstacle in the world.
    #[must_use]
    pub fn obstacle_view(world: &World) -> ObstacleView {
        ObstacleView::from_snapshots(world.obstacles.snapshots())
    }

    /// Current outcome of the run.
    #[must_use]
    pub fn outcome(world: &World) -> Outcome {
        world.outcome
    }

    /// Cell the agent must reach to win the run.
    #[must_use]
    pub fn goal(world: &World) -> CellCoord {
        world.goal
    }

    /// Whether the agent has reached the goal this run. Clears when
    /// `ResetRun` returns the run to `InProgress`.
    #[must_use]
    pub fn goal_reached(world: &World) -> bool {
        world.outcome == Outcome::Won
    }

    /// Cell where run resets attempt to reposition the agent.
    #[must_use]
    pub fn preferred_spawn(world: &World) -> CellCoord {
        world.preferred_spawn
    }

    /// Number of player-placed obstacles currently in the world.
    #[must_use]
    pub fn placed_block_count(world: &World) -> u32 {
        world.obstacles.user_placed_count()
    }

    /// Reports whether a solid obstacle covers the provided cell.
    #[must_use]
    pub fn is_blocked(world: &World, cell: CellCoord) -> bool {
        world.obstacles.blocking_at(cell).is_some()
    }

    /// Identifies the solid obstacle covering the cell, if any.
    #[must_use]
    pub fn blocking_obstacle_at(
        world: &World,
        cell: CellCoord,
    ) -> Option<(ObstacleId, Provenance)> {
        world.obstacles.blocking_at(cell)
    }
}
