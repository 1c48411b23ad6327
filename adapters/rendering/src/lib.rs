#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Blockade Runner adapters.
//!
//! Provides the grid-to-world projection, the smoothed follow camera, and
//! the scene descriptors that frontends consume. No drawing happens here;
//! backends implement [`RenderingBackend`] against these contracts.

use anyhow::Result as AnyResult;
use blockade_core::{
    AgentMode, CellCoord, CellRect, ColorHint, Direction, ObstacleId, ObstacleKind, Outcome,
    Provenance,
};
use glam::Vec2;
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Converts a core color hint into a presentation color.
    #[must_use]
    pub const fn from_hint(hint: ColorHint) -> Self {
        Self::from_rgb_u8(hint.red(), hint.green(), hint.blue())
    }
}

/// Converts between cell coordinates and world-space positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridProjection {
    tile_length: f32,
}

impl GridProjection {
    /// Creates a projection for the provided cell edge length.
    ///
    /// Returns an error when the length is not strictly positive and finite.
    pub fn new(tile_length: f32) -> Result<Self, RenderingError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }
        Ok(Self { tile_length })
    }

    /// Side length of a single square cell expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// World-space position of the cell's upper-left corner.
    #[must_use]
    pub fn cell_to_world(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.tile_length,
            cell.row() as f32 * self.tile_length,
        )
    }

    /// World-space position of the cell's center.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.cell_to_world(cell) + Vec2::splat(self.tile_length * 0.5)
    }

    /// Cell containing the provided world-space position.
    ///
    /// Floors toward negative infinity so positions left of or above the
    /// grid resolve to negative cell indices rather than cell zero.
    #[must_use]
    pub fn world_to_cell(&self, position: Vec2) -> CellCoord {
        CellCoord::new(
            (position.x / self.tile_length).floor() as i32,
            (position.y / self.tile_length).floor() as i32,
        )
    }
}

/// Smoothed camera that follows a world-space target across the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    position: Vec2,
    canvas_size: Vec2,
    world_size: Vec2,
    smoothing: f32,
}

impl Camera {
    /// Fraction of the remaining distance covered per follow update.
    pub const DEFAULT_SMOOTHING: f32 = 0.15;

    /// Creates a camera at the world origin.
    #[must_use]
    pub const fn new(canvas_size: Vec2, world_size: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            canvas_size,
            world_size,
            smoothing: Self::DEFAULT_SMOOTHING,
        }
    }

    /// Current world-space position of the viewport's upper-left corner.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Size of the viewport expressed in world units.
    #[must_use]
    pub const fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    /// Eases the viewport toward centering the target.
    ///
    /// Non-finite targets are logged and ignored so a corrupted position can
    /// never poison the camera state. The desired corner is clamped to the
    /// world bounds before smoothing is applied.
    pub fn follow(&mut self, target: Vec2) {
        if !target.is_finite() {
            tracing::warn!(?target, "ignoring non-finite camera target");
            return;
        }

        let desired = target - self.canvas_size * 0.5;
        let clamped = Vec2::new(
            desired.x.min(self.world_size.x - self.canvas_size.x).max(0.0),
            desired.y.min(self.world_size.y - self.canvas_size.y).max(0.0),
        );
        self.position += (clamped - self.position) * self.smoothing;
    }

    /// Centers the viewport on the target immediately, without smoothing.
    pub fn center_on(&mut self, target: Vec2) {
        if !target.is_finite() {
            tracing::warn!(?target, "ignoring non-finite camera target");
            return;
        }

        let desired = target - self.canvas_size * 0.5;
        self.position = Vec2::new(
            desired.x.min(self.world_size.x - self.canvas_size.x).max(0.0),
            desired.y.min(self.world_size.y - self.canvas_size.y).max(0.0),
        );
    }

    /// Translates a world-space position into viewport coordinates.
    #[must_use]
    pub fn world_to_screen(&self, position: Vec2) -> Vec2 {
        position - self.position
    }

    /// Translates a viewport position back into world space.
    #[must_use]
    pub fn screen_to_world(&self, position: Vec2) -> Vec2 {
        position + self.position
    }

    /// Reports whether a world-space rectangle intersects the viewport.
    #[must_use]
    pub fn is_visible(&self, min: Vec2, size: Vec2) -> bool {
        let max = min + size;
        let viewport_max = self.position + self.canvas_size;
        max.x >= self.position.x
            && min.x <= viewport_max.x
            && max.y >= self.position.y
            && min.y <= viewport_max.y
    }

    /// Range of cells currently intersecting the viewport.
    #[must_use]
    pub fn visible_cells(&self, projection: &GridProjection) -> VisibleCellBounds {
        let min = projection.world_to_cell(self.position);
        let corner = self.position + self.canvas_size;
        let max = CellCoord::new(
            (corner.x / projection.tile_length()).ceil() as i32,
            (corner.y / projection.tile_length()).ceil() as i32,
        );
        VisibleCellBounds { min, max }
    }
}

/// Half-open range of cells intersecting the camera viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleCellBounds {
    /// Inclusive upper-left cell of the visible range.
    pub min: CellCoord,
    /// Exclusive lower-right cell of the visible range.
    pub max: CellCoord,
}

impl VisibleCellBounds {
    /// Reports whether the cell lies inside the visible range.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() >= self.min.column()
            && cell.column() < self.max.column()
            && cell.row() >= self.min.row()
            && cell.row() < self.max.row()
    }
}

/// Describes the cell grid that composes the play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single cell expressed in world units.
    pub tile_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, tile_length: f32, line_color: Color) -> Self {
        Self {
            columns,
            rows,
            tile_length,
            line_color,
        }
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }
}

/// Immutable snapshot describing an obstacle placed within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObstacle {
    /// Identifier allocated to the obstacle by the world.
    pub id: ObstacleId,
    /// Category of the obstacle.
    pub kind: ObstacleKind,
    /// Region of cells occupied by the obstacle.
    pub region: CellRect,
    /// Fill color of the obstacle.
    pub color: Color,
    /// Whether the obstacle is level-authored or player-placed.
    pub provenance: Provenance,
}

impl SceneObstacle {
    /// Creates a new scene obstacle descriptor.
    #[must_use]
    pub const fn new(
        id: ObstacleId,
        kind: ObstacleKind,
        region: CellRect,
        color: Color,
        provenance: Provenance,
    ) -> Self {
        Self {
            id,
            kind,
            region,
            color,
            provenance,
        }
    }
}

/// The agent rendered within its current cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPresentation {
    /// Cell currently occupied by the agent.
    pub cell: CellCoord,
    /// Direction the agent faces, used to orient the sprite.
    pub facing: Direction,
    /// Idle/moving mode, used to pick the pose.
    pub mode: AgentMode,
    /// Fur color of the agent.
    pub color: Color,
}

impl AgentPresentation {
    /// Creates a new agent presentation descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, facing: Direction, mode: AgentMode, color: Color) -> Self {
        Self {
            cell,
            facing,
            mode,
            color,
        }
    }
}

/// The goal marker rendered as a pulsing circle on its cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoalPresentation {
    /// Cell that defines the goal.
    pub cell: CellCoord,
    /// Base fill color of the marker.
    pub color: Color,
    /// Whether the agent already reached the goal this run.
    pub reached: bool,
}

impl GoalPresentation {
    /// Creates a new goal presentation descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, color: Color, reached: bool) -> Self {
        Self {
            cell,
            color,
            reached,
        }
    }
}

/// Scene description combining the grid, cityscape and inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Cell grid that composes the play area.
    pub grid: GridPresentation,
    /// Obstacles currently placed in the world.
    pub obstacles: Vec<SceneObstacle>,
    /// The agent navigating the grid.
    pub agent: AgentPresentation,
    /// Goal marker the agent must reach.
    pub goal: GoalPresentation,
    /// Outcome of the current run.
    pub outcome: Outcome,
    /// Number of player-placed blocks, shown in the HUD.
    pub placed_blocks: u32,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        grid: GridPresentation,
        obstacles: Vec<SceneObstacle>,
        agent: AgentPresentation,
        goal: GoalPresentation,
        outcome: Outcome,
        placed_blocks: u32,
    ) -> Self {
        Self {
            grid,
            obstacles,
            agent,
            goal,
            outcome,
            placed_blocks,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Blockade Runner scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and may mutate the scene before it is rendered, allowing adapters to
    /// animate world snapshots deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RenderingError {
    /// Cell edge length must be positive and finite.
    #[error("tile_length must be positive and finite (received {tile_length})")]
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}
