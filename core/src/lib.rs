#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Blockade Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Blockade Runner.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's cell grid using the provided dimensions.
    ConfigureGrid {
        /// Number of columns and rows laid out in the grid.
        size: GridSize,
        /// Length of each square cell measured in world units.
        tile_length: f32,
    },
    /// Anchors the goal the agent must reach at the provided cell.
    SetGoal {
        /// Cell that defines the goal.
        cell: CellCoord,
    },
    /// Records the preferred cell where run resets reposition the agent.
    SetPreferredSpawn {
        /// Cell the agent should start on when unobstructed.
        cell: CellCoord,
    },
    /// Requests placement of an obstacle anchored at the provided origin cell.
    PlaceObstacle {
        /// Category of the obstacle to construct.
        kind: ObstacleKind,
        /// Upper-left cell that anchors the obstacle's footprint.
        origin: CellCoord,
        /// Dimensions of the footprint measured in whole cells.
        size: CellRectSize,
        /// Presentation color carried alongside the obstacle.
        color: ColorHint,
        /// Whether the obstacle is level-authored or player-placed.
        provenance: Provenance,
    },
    /// Requests removal of the player-placed obstacle anchored at a cell.
    RemoveUserObstacle {
        /// Origin cell of the obstacle targeted for removal.
        cell: CellCoord,
    },
    /// Removes every player-placed obstacle, leaving level geometry intact.
    ClearUserObstacles,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the agent advance a single step in the given direction.
    StepAgent {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Switches the agent between its idle and moving modes.
    SetAgentMode {
        /// Mode the agent should adopt.
        mode: AgentMode,
    },
    /// Rewinds the current run: outcome and agent position.
    ResetRun,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the cell grid was reconfigured.
    GridConfigured {
        /// Dimensions applied to the grid.
        size: GridSize,
        /// Cell edge length applied to the grid.
        tile_length: f32,
    },
    /// Confirms that the goal moved to a new cell.
    GoalConfigured {
        /// Cell that now defines the goal.
        cell: CellCoord,
    },
    /// Confirms that the preferred spawn cell changed.
    SpawnConfigured {
        /// Cell recorded as the preferred agent start.
        cell: CellCoord,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an obstacle was placed into the world.
    ObstaclePlaced {
        /// Identifier assigned to the obstacle by the world.
        id: ObstacleId,
        /// Category of the placed obstacle.
        kind: ObstacleKind,
        /// Region of cells occupied by the obstacle.
        region: CellRect,
        /// Whether the obstacle is level-authored or player-placed.
        provenance: Provenance,
    },
    /// Confirms that an obstacle was removed from the world.
    ObstacleRemoved {
        /// Identifier of the obstacle that was removed.
        id: ObstacleId,
        /// Region of cells previously occupied by the obstacle.
        region: CellRect,
    },
    /// Reports that an obstacle placement request was rejected.
    ObstaclePlacementRejected {
        /// Category of obstacle requested for placement.
        kind: ObstacleKind,
        /// Origin cell provided in the placement request.
        origin: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that an obstacle removal request found nothing to remove.
    ObstacleRemovalRejected {
        /// Cell provided in the removal request.
        cell: CellCoord,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Confirms that every player-placed obstacle was removed.
    UserObstaclesCleared {
        /// Number of obstacles removed by the sweep.
        removed: u32,
    },
    /// Confirms that the agent moved between two cells.
    AgentMoved {
        /// Cell the agent occupied before moving.
        from: CellCoord,
        /// Cell the agent occupies after completing the move.
        to: CellCoord,
        /// Direction the agent faces after the move.
        facing: Direction,
    },
    /// Reports that the agent's step was blocked by a solid obstacle.
    AgentBlocked {
        /// Candidate cell the agent attempted to enter.
        at: CellCoord,
        /// Identifier of the obstacle occupying the candidate cell.
        obstacle: ObstacleId,
        /// Whether the blocking obstacle was level-authored or player-placed.
        provenance: Provenance,
        /// Direction the agent faces after applying the reaction policy.
        facing: Direction,
    },
    /// Announces that the agent switched between idle and moving modes.
    AgentModeChanged {
        /// Mode the agent adopted.
        mode: AgentMode,
    },
    /// Confirms that the run was rewound to its initial state.
    RunReset {
        /// Cell the agent occupies after repositioning.
        agent_cell: CellCoord,
    },
    /// Announces that the agent reached the goal cell.
    RunWon {
        /// Goal cell the agent arrived at.
        cell: CellCoord,
    },
    /// Announces that the run ended in failure.
    RunLost {
        /// Specific reason the run was lost.
        reason: LossReason,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed: the agent may legally occupy a cell one step
/// outside the grid while the outcome evaluation catches up with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the neighboring cell one step in the provided direction.
    #[must_use]
    pub const fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            column: self.column + dx,
            row: self.row + dy,
        }
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub const fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Dimensions of the world grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside `[0,columns) x [0,rows)`.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= 0
            && cell.row() >= 0
            && (cell.column() as u32) < self.columns
            && (cell.row() as u32) < self.rows
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Reports whether the cell lies within the rectangle's footprint.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= self.origin.column()
            && cell.column() < self.origin.column() + self.size.width() as i32
            && cell.row() >= self.origin.row()
            && cell.row() < self.origin.row() + self.size.height() as i32
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// A footprint covering exactly one cell.
    pub const SINGLE: Self = Self::new(1, 1);

    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the footprint covers at least one cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Cardinal facing and movement directions available to the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// Unit offset applied to a cell when stepping in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Rotates the direction 90 degrees counter-clockwise.
    ///
    /// The cycle is Up, Left, Down, Right: the reaction applied when the
    /// agent bumps into a player-placed block.
    #[must_use]
    pub const fn rotated_counter_clockwise(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Rotates the direction 180 degrees: the reaction applied when the
    /// agent bumps into level geometry.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Unique identifier assigned to an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Categories of obstacle that can occupy the city grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Street or ground surface covering walkable area.
    Ground,
    /// City building that blocks movement.
    Building,
    /// Elevated platform that blocks movement.
    Platform,
    /// Decorated goal-adjacent structure, walkable.
    Special,
    /// Park area, walkable.
    Park,
    /// Corporate plaza, walkable.
    Plaza,
    /// Industrial smokestack that blocks movement.
    Smokestack,
    /// Holographic display, walkable.
    Hologram,
}

impl ObstacleKind {
    /// Reports whether this category participates in collision.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        match self {
            Self::Building | Self::Smokestack | Self::Platform => true,
            Self::Ground | Self::Special | Self::Park | Self::Plaza | Self::Hologram => false,
        }
    }
}

/// Records whether an obstacle came from the level author or the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Obstacle created while loading the level.
    Level,
    /// Obstacle placed by the player at runtime.
    User,
}

/// Presentation color carried alongside obstacles and the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorHint {
    red: u8,
    green: u8,
    blue: u8,
}

impl ColorHint {
    /// Creates a new color hint from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Idle/moving mode toggled on the agent by the scripted controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentMode {
    /// The agent holds its position.
    Idle,
    /// The agent advances under controller commands.
    Moving,
}

/// Result of a single attempted agent step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepResult {
    /// The candidate cell was free and the agent committed the move.
    Moved,
    /// A level-authored solid obstacle blocked the move.
    BlockedByLevel,
    /// A player-placed solid obstacle blocked the move.
    BlockedByUser,
}

/// Specific reason a run ended in failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LossReason {
    /// The agent stepped outside the world bounds.
    LeftWorld,
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftWorld => write!(f, "the cat went off the screen"),
        }
    }
}

/// Terminal state of a single level attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The run is still being played.
    InProgress,
    /// The agent reached the goal cell.
    Won,
    /// The run failed for the recorded reason.
    Lost(LossReason),
}

impl Outcome {
    /// Reports whether the run is still being played.
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// Reasons an obstacle placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested footprint extends beyond the configured grid bounds.
    OutOfBounds,
    /// The requested footprint has zero width or height.
    EmptyFootprint,
}

/// Reasons an obstacle removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// No player-placed obstacle is anchored at the provided cell.
    NoUserObstacle,
}

/// Immutable representation of the agent's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Grid cell currently occupied by the agent.
    pub cell: CellCoord,
    /// Direction the agent currently faces.
    pub facing: Direction,
    /// Idle/moving mode the agent currently holds.
    pub mode: AgentMode,
}

/// Immutable representation of a single obstacle used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObstacleSnapshot {
    /// Identifier allocated to the obstacle by the world.
    pub id: ObstacleId,
    /// Category of the obstacle.
    pub kind: ObstacleKind,
    /// Region of cells occupied by the obstacle.
    pub region: CellRect,
    /// Presentation color carried alongside the obstacle.
    pub color: ColorHint,
    /// Whether the obstacle is level-authored or player-placed.
    pub provenance: Provenance,
}

/// Read-only snapshot describing all obstacles within the world.
#[derive(Clone, Debug, Default)]
pub struct ObstacleView {
    snapshots: Vec<ObstacleSnapshot>,
}

impl ObstacleView {
    /// Creates a new obstacle view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ObstacleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured obstacle snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ObstacleSnapshot> {
        self.snapshots.iter()
    }

    /// Number of obstacles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no obstacles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ObstacleSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, CellRect, CellRectSize, Direction, GridSize, ObstacleId, ObstacleKind,
        PlacementError, RemovalError,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn stepped_applies_unit_offsets() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(origin.stepped(Direction::Up), CellCoord::new(3, 2));
        assert_eq!(origin.stepped(Direction::Right), CellCoord::new(4, 3));
        assert_eq!(origin.stepped(Direction::Down), CellCoord::new(3, 4));
        assert_eq!(origin.stepped(Direction::Left), CellCoord::new(2, 3));
    }

    #[test]
    fn counter_clockwise_cycle_visits_all_directions() {
        assert_eq!(Direction::Up.rotated_counter_clockwise(), Direction::Left);
        assert_eq!(
            Direction::Left.rotated_counter_clockwise(),
            Direction::Down
        );
        assert_eq!(
            Direction::Down.rotated_counter_clockwise(),
            Direction::Right
        );
        assert_eq!(Direction::Right.rotated_counter_clockwise(), Direction::Up);
    }

    #[test]
    fn reversing_twice_is_identity() {
        for direction in [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ] {
            assert_eq!(direction.reversed().reversed(), direction);
        }
    }

    #[test]
    fn solidity_covers_exactly_the_blocking_kinds() {
        let solid = [
            ObstacleKind::Building,
            ObstacleKind::Smokestack,
            ObstacleKind::Platform,
        ];
        let walkable = [
            ObstacleKind::Ground,
            ObstacleKind::Special,
            ObstacleKind::Park,
            ObstacleKind::Plaza,
            ObstacleKind::Hologram,
        ];
        for kind in solid {
            assert!(kind.is_solid(), "{kind:?} must block movement");
        }
        for kind in walkable {
            assert!(!kind.is_solid(), "{kind:?} must not block movement");
        }
    }

    #[test]
    fn grid_size_contains_rejects_negative_and_overflowing_cells() {
        let size = GridSize::new(50, 50);
        assert!(size.contains(CellCoord::new(0, 0)));
        assert!(size.contains(CellCoord::new(49, 49)));
        assert!(!size.contains(CellCoord::new(-1, 4)));
        assert!(!size.contains(CellCoord::new(4, -1)));
        assert!(!size.contains(CellCoord::new(50, 4)));
        assert!(!size.contains(CellCoord::new(4, 50)));
    }

    #[test]
    fn cell_rect_contains_matches_footprint() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(5, 5), CellRectSize::new(6, 8));
        assert!(rect.contains(CellCoord::new(5, 5)));
        assert!(rect.contains(CellCoord::new(10, 12)));
        assert!(!rect.contains(CellCoord::new(11, 5)));
        assert!(!rect.contains(CellCoord::new(5, 13)));
        assert!(!rect.contains(CellCoord::new(4, 5)));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn obstacle_id_round_trips_through_bincode() {
        assert_round_trip(&ObstacleId::new(42));
    }

    #[test]
    fn obstacle_kind_round_trips_through_bincode() {
        assert_round_trip(&ObstacleKind::Smokestack);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::OutOfBounds);
    }

    #[test]
    fn removal_error_round_trips_through_bincode() {
        assert_round_trip(&RemovalError::NoUserObstacle);
    }

    #[test]
    fn cell_rect_round_trips_through_bincode() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(-1, 7), CellRectSize::new(2, 3));
        assert_round_trip(&rect);
    }
}
