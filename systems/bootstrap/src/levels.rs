//! Built-in level catalogue.

use blockade_core::{CellCoord, CellRectSize, ColorHint, GridSize, ObstacleKind};

use crate::{LevelSpec, ObstacleSpec};

const SLATE: ColorHint = ColorHint::from_rgb(0x2f, 0x4f, 0x4f);
const SADDLE_BROWN: ColorHint = ColorHint::from_rgb(0x8b, 0x45, 0x13);
const SIENNA: ColorHint = ColorHint::from_rgb(0xa0, 0x52, 0x2d);
const DARK_BROWN: ColorHint = ColorHint::from_rgb(0x65, 0x43, 0x21);
const DIM_GRAY: ColorHint = ColorHint::from_rgb(0x69, 0x69, 0x69);
const STACK_GRAY: ColorHint = ColorHint::from_rgb(0x4a, 0x4a, 0x4a);
const PARK_GREEN: ColorHint = ColorHint::from_rgb(0x22, 0x8b, 0x22);
const SKY_BLUE: ColorHint = ColorHint::from_rgb(0x87, 0xce, 0xeb);

const fn obstacle(
    kind: ObstacleKind,
    column: i32,
    row: i32,
    width: u32,
    height: u32,
    color: ColorHint,
) -> ObstacleSpec {
    ObstacleSpec::new(
        kind,
        CellCoord::new(column, row),
        CellRectSize::new(width, height),
        color,
    )
}

pub(crate) fn catalogue() -> Vec<LevelSpec> {
    vec![level_one()]
}

fn level_one() -> LevelSpec {
    use ObstacleKind::{Building, Ground, Park, Smokestack};

    LevelSpec {
        number: 1,
        name: "Cat Navigation Challenge",
        description: "Help the cat reach home by placing blocks to guide its path",
        sky_color: SKY_BLUE,
        grid: GridSize::new(50, 50),
        tile_length: 32.0,
        goal: CellCoord::new(2, 2),
        agent_start: CellCoord::new(45, 45),
        obstacles: vec![
            // Ground layer
            obstacle(Ground, 0, 0, 50, 50, SLATE),
            // Major buildings
            obstacle(Building, 5, 5, 6, 8, SADDLE_BROWN),
            obstacle(Building, 15, 3, 7, 12, SIENNA),
            obstacle(Building, 25, 6, 5, 9, SADDLE_BROWN),
            obstacle(Building, 35, 4, 8, 11, DARK_BROWN),
            // Middle row buildings
            obstacle(Building, 3, 18, 7, 6, SIENNA),
            obstacle(Building, 14, 20, 6, 8, SADDLE_BROWN),
            obstacle(Building, 24, 17, 8, 10, DARK_BROWN),
            obstacle(Building, 36, 19, 5, 7, SIENNA),
            // Lower buildings
            obstacle(Building, 6, 30, 5, 6, SADDLE_BROWN),
            obstacle(Building, 16, 32, 7, 8, DARK_BROWN),
            obstacle(Building, 28, 31, 6, 7, SIENNA),
            obstacle(Building, 38, 33, 5, 5, SADDLE_BROWN),
            // Small scattered buildings
            obstacle(Building, 12, 8, 2, 3, DIM_GRAY),
            obstacle(Building, 32, 12, 2, 4, DIM_GRAY),
            obstacle(Building, 8, 26, 3, 2, DIM_GRAY),
            obstacle(Building, 21, 28, 2, 3, DIM_GRAY),
            obstacle(Building, 42, 28, 3, 3, DIM_GRAY),
            // Industrial buildings
            obstacle(Building, 1, 40, 8, 4, SLATE),
            obstacle(Building, 12, 42, 6, 5, SLATE),
            obstacle(Building, 22, 41, 9, 6, SLATE),
            obstacle(Building, 35, 40, 7, 4, SLATE),
            // Smokestacks
            obstacle(Smokestack, 4, 35, 1, 8, STACK_GRAY),
            obstacle(Smokestack, 19, 38, 1, 6, STACK_GRAY),
            obstacle(Smokestack, 29, 36, 1, 7, STACK_GRAY),
            obstacle(Smokestack, 41, 37, 1, 5, STACK_GRAY),
            // Park areas
            obstacle(Park, 11, 15, 2, 2, PARK_GREEN),
            obstacle(Park, 33, 22, 2, 2, PARK_GREEN),
        ],
    }
}
