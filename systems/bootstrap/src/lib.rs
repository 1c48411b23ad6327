#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Blockade Runner experience.
//!
//! Owns the level catalogue and translates a level into the command batch
//! that configures the world: grid, level geometry, goal, and spawn.

mod levels;

use blockade_core::{
    CellCoord, CellRect, CellRectSize, ColorHint, Command, GridSize, ObstacleKind, Provenance,
};
use blockade_world::{query, World};
use thiserror::Error;

/// Level-authored obstacle description.
#[derive(Clone, Copy, Debug)]
pub struct ObstacleSpec {
    kind: ObstacleKind,
    origin: CellCoord,
    size: CellRectSize,
    color: ColorHint,
}

impl ObstacleSpec {
    const fn new(
        kind: ObstacleKind,
        origin: CellCoord,
        size: CellRectSize,
        color: ColorHint,
    ) -> Self {
        Self {
            kind,
            origin,
            size,
            color,
        }
    }

    /// Category of the obstacle.
    #[must_use]
    pub const fn kind(&self) -> ObstacleKind {
        self.kind
    }

    /// Region of cells the obstacle occupies.
    #[must_use]
    pub const fn region(&self) -> CellRect {
        CellRect::from_origin_and_size(self.origin, self.size)
    }
}

/// Complete description of a playable level.
#[derive(Clone, Debug)]
pub struct LevelSpec {
    number: u32,
    name: &'static str,
    description: &'static str,
    sky_color: ColorHint,
    grid: GridSize,
    tile_length: f32,
    goal: CellCoord,
    agent_start: CellCoord,
    obstacles: Vec<ObstacleSpec>,
}

impl LevelSpec {
    /// Number identifying the level within the catalogue.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Human-readable name of the level.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Short description shown alongside the level name.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Backdrop color used by presentation layers.
    #[must_use]
    pub const fn sky_color(&self) -> ColorHint {
        self.sky_color
    }

    /// Grid dimensions the level plays on.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Cell edge length in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Cell the agent must reach to complete the level.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Cell the agent prefers to spawn on.
    #[must_use]
    pub const fn agent_start(&self) -> CellCoord {
        self.agent_start
    }

    /// Level-authored obstacles composing the cityscape.
    #[must_use]
    pub fn obstacles(&self) -> &[ObstacleSpec] {
        &self.obstacles
    }

    /// Checks the level data for internal consistency.
    pub fn validate(&self) -> Result<(), LevelError> {
        if !self.grid.contains(self.goal) {
            return Err(LevelError::GoalOutOfBounds {
                number: self.number,
                cell: self.goal,
            });
        }
        if !self.grid.contains(self.agent_start) {
            return Err(LevelError::StartOutOfBounds {
                number: self.number,
                cell: self.agent_start,
            });
        }
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            let region = obstacle.region();
            let far_corner = CellCoord::new(
                region.origin().column() + region.size().width() as i32 - 1,
                region.origin().row() + region.size().height() as i32 - 1,
            );
            if region.size().is_empty()
                || !self.grid.contains(region.origin())
                || !self.grid.contains(far_corner)
            {
                return Err(LevelError::ObstacleOutOfBounds {
                    number: self.number,
                    index,
                });
            }
        }
        Ok(())
    }
}

/// Errors surfaced while resolving or validating level data.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The requested level number is not part of the catalogue.
    #[error("level {0} does not exist")]
    UnknownLevel(u32),
    /// The level's goal cell lies outside its own grid.
    #[error("level {number}: goal cell {cell:?} lies outside the grid")]
    GoalOutOfBounds {
        /// Level that failed validation.
        number: u32,
        /// Offending goal cell.
        cell: CellCoord,
    },
    /// The level's agent start cell lies outside its own grid.
    #[error("level {number}: start cell {cell:?} lies outside the grid")]
    StartOutOfBounds {
        /// Level that failed validation.
        number: u32,
        /// Offending start cell.
        cell: CellCoord,
    },
    /// A level obstacle extends beyond the grid.
    #[error("level {number}: obstacle {index} extends beyond the grid")]
    ObstacleOutOfBounds {
        /// Level that failed validation.
        number: u32,
        /// Index of the offending obstacle within the level data.
        index: usize,
    },
}

/// Produces data required to start and greet the player.
#[derive(Debug)]
pub struct Bootstrap {
    catalogue: Vec<LevelSpec>,
}

impl Bootstrap {
    /// Creates a bootstrap system backed by the built-in level catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalogue: levels::catalogue(),
        }
    }

    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Looks up a level by its catalogue number.
    pub fn level(&self, number: u32) -> Result<&LevelSpec, LevelError> {
        self.catalogue
            .iter()
            .find(|level| level.number == number)
            .ok_or(LevelError::UnknownLevel(number))
    }

    /// Emits the command batch that loads the requested level.
    ///
    /// The batch starts with a grid reconfiguration, which wipes all existing
    /// obstacles, and ends with a run reset so the agent lands on the level's
    /// start cell.
    pub fn load_level(&self, number: u32, out: &mut Vec<Command>) -> Result<(), LevelError> {
        let level = self.level(number)?;
        level.validate()?;

        out.push(Command::ConfigureGrid {
            size: level.grid,
            tile_length: level.tile_length,
        });
        for obstacle in &level.obstacles {
            out.push(Command::PlaceObstacle {
                kind: obstacle.kind,
                origin: obstacle.origin,
                size: obstacle.size,
                color: obstacle.color,
                provenance: Provenance::Level,
            });
        }
        out.push(Command::SetGoal { cell: level.goal });
        out.push(Command::SetPreferredSpawn {
            cell: level.agent_start,
        });
        out.push(Command::ResetRun);
        Ok(())
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}
