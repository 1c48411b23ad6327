//! Valid-spawn search used when a run resets.

use blockade_core::{CellCoord, GridSize};

use crate::ObstacleRegistry;

const SEARCH_RADIUS: i32 = 5;

/// Finds an unobstructed in-bounds cell for the agent to spawn on.
///
/// Prefers the requested cell, then expands square rings around it up to
/// [`SEARCH_RADIUS`], then falls back to a row-major scan of the whole grid.
/// If every cell is obstructed the preferred cell is returned unchanged so
/// callers always receive a deterministic answer.
pub(crate) fn find_valid_spawn(
    preferred: CellCoord,
    grid: GridSize,
    registry: &ObstacleRegistry,
) -> CellCoord {
    let is_valid =
        |cell: CellCoord| grid.contains(cell) && registry.blocking_at(cell).is_none();

    if is_valid(preferred) {
        return preferred;
    }

    for radius in 1..=SEARCH_RADIUS {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let candidate =
                    CellCoord::new(preferred.column() + dx, preferred.row() + dy);
                if is_valid(candidate) {
                    return candidate;
                }
            }
        }
    }

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let candidate = CellCoord::new(column as i32, row as i32);
            if is_valid(candidate) {
                return candidate;
            }
        }
    }

    tracing::warn!(?preferred, "no unobstructed spawn cell found");
    preferred
}
