//! Procedural map generation
//!
//! Generators for dungeon floors, the town and building interiors, plus the
//! carving helpers they share.

pub mod building;
pub mod dungeon;
pub mod town;

pub use building::{generate_interior, generate_interior_with, Building};
pub use dungeon::{generate_dungeon, generate_dungeon_with, Dungeon};
pub use town::{
    generate_town, generate_town_with, BuildingCategory, BuildingLot, DoorSide, Town,
};

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Grid, Position, Rect, Tile};

/// Outcome of a bounded rejection-sampling search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement<T> {
    Placed(T),
    /// Every try was rejected
    Skipped { attempts: u32 },
}

impl<T> Placement<T> {
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed(_))
    }

    pub fn placed(&self) -> Option<&T> {
        match self {
            Placement::Placed(value) => Some(value),
            Placement::Skipped { .. } => None,
        }
    }
}

/// Grow a requested size to at least the minimum. Returns the size to build
/// and, when it had to grow, the size that was asked for.
pub(crate) fn grow_to_minimum(
    what: &str,
    (width, height): (i32, i32),
    (min_width, min_height): (i32, i32),
) -> (i32, i32, Option<(i32, i32)>) {
    if width >= min_width && height >= min_height {
        return (width, height, None);
    }
    log::warn!(
        "{} size {}x{} too small, growing to at least {}x{}",
        what,
        width,
        height,
        min_width,
        min_height
    );
    (width.max(min_width), height.max(min_height), Some((width, height)))
}

/// Carve out a room
pub(crate) fn carve_room(grid: &mut Grid, room: &Rect) {
    for pos in room.cells() {
        grid.set_tile(pos.x, pos.y, Tile::Floor);
    }
}

/// Carve a horizontal run of floor on row `y`
pub(crate) fn carve_h_corridor(grid: &mut Grid, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        grid.set_tile(x, y, Tile::Floor);
    }
}

/// Carve a vertical run of floor on column `x`
pub(crate) fn carve_v_corridor(grid: &mut Grid, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        grid.set_tile(x, y, Tile::Floor);
    }
}

/// Join two cells with an L-shaped corridor, bending at a coin flip
pub(crate) fn carve_l_corridor(grid: &mut Grid, from: Position, to: Position, rng: &mut StdRng) {
    if rng.gen_bool(0.5) {
        carve_h_corridor(grid, from.x, to.x, from.y);
        carve_v_corridor(grid, from.y, to.y, to.x);
    } else {
        carve_v_corridor(grid, from.y, to.y, from.x);
        carve_h_corridor(grid, from.x, to.x, to.y);
    }
}
