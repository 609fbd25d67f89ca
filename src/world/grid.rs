//! Grid data structure
//!
//! The 2D tile map shared by dungeon floors, the town and building interiors,
//! together with its two visibility bitmaps.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Position, Tile};
use crate::error::{Result, WorldError};

/// Random tries made by [`Grid::find_random_floor_tile`] before it scans
pub const DEFAULT_FLOOR_SAMPLE_TRIES: u32 = 4096;

/// A fixed-size tile map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
    visible_now: Vec<bool>,
    seen_ever: Vec<bool>,
    /// Start position for player
    pub start: Position,
    /// Exit position (stairs down), dungeon floors only
    pub exit: Option<Position>,
}

impl Grid {
    /// Create a new grid filled with `fill`
    pub fn new(width: i32, height: i32, fill: Tile) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![fill; cells],
            visible_now: vec![false; cells],
            seen_ever: vec![false; cells],
            start: Position::default(),
            exit: None,
        }
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// The single bounds-checked index used by every accessor
    #[inline]
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y).then(|| (y * self.width + x) as usize)
    }

    #[inline]
    fn idx_to_xy(&self, idx: usize) -> Position {
        let idx = idx as i32;
        Position::new(idx % self.width, idx / self.width)
    }

    /// Tile at position; out of bounds reads as a wall
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        self.idx(x, y).map_or(Tile::Wall, |i| self.tiles[i])
    }

    pub fn tile_at(&self, pos: Position) -> Tile {
        self.tile(pos.x, pos.y)
    }

    /// Set tile at position, ignored out of bounds
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.idx(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Overwrite every cell
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.iter_mut().for_each(|t| *t = tile);
    }

    /// Check if a position is walkable
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).is_some_and(|i| self.tiles[i].is_walkable())
    }

    /// Check if a position blocks line of sight
    pub fn blocks_sight(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).map_or(true, |i| self.tiles[i].is_opaque())
    }

    /// Mark a cell as visible now, which also records it as seen
    pub fn mark_visible(&mut self, x: i32, y: i32) {
        if let Some(i) = self.idx(x, y) {
            self.visible_now[i] = true;
            self.seen_ever[i] = true;
        }
    }

    /// Clear current visibility (before recalculating FOV)
    pub fn clear_visible_now(&mut self) {
        self.visible_now.iter_mut().for_each(|v| *v = false);
    }

    pub fn is_visible_now(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).is_some_and(|i| self.visible_now[i])
    }

    pub fn was_seen_ever(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).is_some_and(|i| self.seen_ever[i])
    }

    /// Uniformly pick a FLOOR tile inside the 1-cell border.
    pub fn find_random_floor_tile(&self, rng: &mut StdRng) -> Result<Position> {
        self.find_random_floor_tile_with(rng, DEFAULT_FLOOR_SAMPLE_TRIES)
    }

    /// Rejection-sample up to `tries` times, then fall back to picking among
    /// every interior FLOOR tile. Errors only when there is none.
    pub fn find_random_floor_tile_with(&self, rng: &mut StdRng, tries: u32) -> Result<Position> {
        let no_floor = WorldError::NoFloorTile {
            width: self.width,
            height: self.height,
        };
        if self.width < 3 || self.height < 3 {
            return Err(no_floor);
        }

        for _ in 0..tries {
            let x = rng.gen_range(1..self.width - 1);
            let y = rng.gen_range(1..self.height - 1);
            if self.tile(x, y) == Tile::Floor {
                return Ok(Position::new(x, y));
            }
        }

        let candidates: Vec<Position> = (1..self.height - 1)
            .flat_map(|y| (1..self.width - 1).map(move |x| Position::new(x, y)))
            .filter(|pos| self.tile_at(*pos) == Tile::Floor)
            .collect();
        if candidates.is_empty() {
            return Err(no_floor);
        }
        log::debug!(
            "Floor sampling exhausted {} tries, picking among {} floor tiles",
            tries,
            candidates.len()
        );
        Ok(candidates[rng.gen_range(0..candidates.len())])
    }

    /// Render the grid as text, one line per row. With `only_seen`,
    /// cells never seen are blank.
    pub fn to_ascii(&self, only_seen: bool) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                if only_seen && !self.was_seen_ever(x, y) {
                    out.push(' ');
                } else {
                    out.push(self.tile(x, y).glyph());
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Stored form of a [`Grid`], checked before it becomes one
#[derive(Deserialize)]
#[serde(rename = "Grid")]
struct GridData {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    visible_now: Vec<bool>,
    seen_ever: Vec<bool>,
    start: Position,
    exit: Option<Position>,
}

impl TryFrom<GridData> for Grid {
    type Error = WorldError;

    fn try_from(data: GridData) -> Result<Self> {
        let cells = (data.width >= 0 && data.height >= 0)
            .then(|| data.width as usize * data.height as usize);
        let sized = cells.is_some_and(|n| {
            data.tiles.len() == n && data.visible_now.len() == n && data.seen_ever.len() == n
        });
        if !sized {
            return Err(WorldError::MalformedGrid {
                width: data.width,
                height: data.height,
            });
        }
        Ok(Self {
            width: data.width,
            height: data.height,
            tiles: data.tiles,
            visible_now: data.visible_now,
            seen_ever: data.seen_ever,
            start: data.start,
            exit: data.exit,
        })
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let data = GridData::deserialize(deserializer)?;
        Grid::try_from(data).map_err(serde::de::Error::custom)
    }
}

impl Grid {
    /// Get all walkable positions (for spawning)
    pub fn walkable_positions(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_walkable())
            .map(|(idx, _)| self.idx_to_xy(idx))
            .collect()
    }

    /// Get valid spawn positions (walkable, not too close to start)
    pub fn spawn_positions(&self, min_dist_from_start: i32) -> Vec<Position> {
        self.walkable_positions()
            .into_iter()
            .filter(|pos| pos.chebyshev_distance(&self.start) >= min_dist_from_start)
            .filter(|pos| Some(*pos) != self.exit)
            .collect()
    }

    /// Check if a position is a chokepoint that an occupant would block:
    /// at most one walkable cardinal neighbour, a straight 1-wide run,
    /// or a cramped cell with three or fewer walkable neighbours overall.
    pub fn is_narrow_passage(&self, pos: Position) -> bool {
        let walkable_cardinal: Vec<Position> = pos
            .cardinal_neighbors()
            .into_iter()
            .filter(|p| self.is_walkable(p.x, p.y))
            .collect();

        if walkable_cardinal.len() <= 1 {
            return true;
        }

        if let [a, b] = walkable_cardinal.as_slice() {
            let is_horizontal = a.y == b.y && a.y == pos.y;
            let is_vertical = a.x == b.x && a.x == pos.x;
            if is_horizontal || is_vertical {
                return true;
            }
        }

        let walkable_diag_count = [(-1, -1), (1, -1), (-1, 1), (1, 1)]
            .iter()
            .filter(|(dx, dy)| self.is_walkable(pos.x + dx, pos.y + dy))
            .count();

        walkable_cardinal.len() + walkable_diag_count <= 3
    }

    /// Spawn positions suitable for NPCs and loot (not in narrow passages)
    pub fn open_spawn_positions(&self, min_dist_from_start: i32) -> Vec<Position> {
        self.spawn_positions(min_dist_from_start)
            .into_iter()
            .filter(|pos| !self.is_narrow_passage(*pos))
            .collect()
    }
}
