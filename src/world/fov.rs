//! Field of View calculation
//!
//! Every cell inside the radius disc gets its own Bresenham ray from the
//! origin; the cell is visible when no opaque cell sits strictly between the
//! two. Rays only leave the origin, so visibility is not symmetric (A seeing B
//! does not mean B sees A) and diagonal wall corners can leak light.

use super::{Grid, Position};

/// Cells visible from one origin at one radius
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilitySet {
    width: i32,
    height: i32,
    cells: Vec<bool>,
    positions: Vec<Position>,
}

impl VisibilitySet {
    fn empty(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; (width.max(0) * height.max(0)) as usize],
            positions: Vec::new(),
        }
    }

    fn insert(&mut self, pos: Position) {
        if let Some(i) = self.idx(pos) {
            if !self.cells[i] {
                self.cells[i] = true;
                self.positions.push(pos);
            }
        }
    }

    fn idx(&self, pos: Position) -> Option<usize> {
        let in_bounds = pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height;
        in_bounds.then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.idx(pos).is_some_and(|i| self.cells[i])
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions.iter().copied()
    }

    /// Replace the grid's current visibility with this set; seen-ever only grows
    pub fn apply(&self, grid: &mut Grid) {
        grid.clear_visible_now();
        for pos in &self.positions {
            grid.mark_visible(pos.x, pos.y);
        }
    }
}

/// Compute field of view from a position with given radius
pub fn compute(grid: &Grid, origin: Position, radius: i32) -> VisibilitySet {
    let mut visible = VisibilitySet::empty(grid.width, grid.height);

    if !grid.in_bounds(origin.x, origin.y) {
        return visible;
    }

    // Origin is always visible
    visible.insert(origin);

    // Every cell of the grid lies within width + height of the origin
    let radius = radius.min(grid.width + grid.height);
    let radius_squared = i64::from(radius) * i64::from(radius);

    // Only walk the part of the bounding square that overlaps the grid
    let (min_dx, max_dx) = ((-radius).max(-origin.x), radius.min(grid.width - 1 - origin.x));
    let (min_dy, max_dy) = ((-radius).max(-origin.y), radius.min(grid.height - 1 - origin.y));

    for dy in min_dy..=max_dy {
        for dx in min_dx..=max_dx {
            if i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy) > radius_squared {
                continue;
            }
            let target = origin.offset(dx, dy);
            if grid.in_bounds(target.x, target.y) && has_line_of_sight(grid, origin, target) {
                visible.insert(target);
            }
        }
    }

    visible
}

/// Compute FOV and write it into the grid's visibility bitmaps
pub fn update_visibility(grid: &mut Grid, origin: Position, radius: i32) -> VisibilitySet {
    let visible = compute(grid, origin, radius);
    visible.apply(grid);
    visible
}

/// True if no cell strictly between `from` and `to` blocks sight
pub fn has_line_of_sight(grid: &Grid, from: Position, to: Position) -> bool {
    BresenhamLine::new(from, to)
        .skip(1)
        .take_while(|pos| *pos != to)
        .all(|pos| !grid.blocks_sight(pos.x, pos.y))
}

/// Integer line walk from `from` to `to`, both ends included
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    x: i32,
    y: i32,
    end: Position,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(from: Position, to: Position) -> Self {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        Self {
            x: from.x,
            y: from.y,
            end: to,
            dx,
            dy,
            sx: if from.x < to.x { 1 } else { -1 },
            sy: if from.y < to.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.done {
            return None;
        }
        let current = Position::new(self.x, self.y);
        if current == self.end {
            self.done = true;
            return Some(current);
        }

        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Rect, Tile};

    fn room_grid() -> Grid {
        let mut grid = Grid::new(30, 20, Tile::Wall);
        for pos in Rect::new(1, 1, 28, 18).cells() {
            grid.set_tile(pos.x, pos.y, Tile::Floor);
        }
        // A pillar in the middle
        for pos in Rect::new(14, 8, 2, 3).cells() {
            grid.set_tile(pos.x, pos.y, Tile::Wall);
        }
        grid
    }

    #[test]
    fn test_line_endpoints() {
        let line: Vec<Position> =
            BresenhamLine::new(Position::new(0, 0), Position::new(4, 2)).collect();
        assert_eq!(line.first(), Some(&Position::new(0, 0)));
        assert_eq!(line.last(), Some(&Position::new(4, 2)));
        assert_eq!(line.len(), 5);

        let single: Vec<Position> =
            BresenhamLine::new(Position::new(3, 3), Position::new(3, 3)).collect();
        assert_eq!(single, vec![Position::new(3, 3)]);
    }

    #[test]
    fn test_origin_always_visible() {
        let grid = room_grid();
        for radius in [-3, 0, 1, 8] {
            let visible = compute(&grid, Position::new(5, 5), radius);
            assert!(visible.contains(Position::new(5, 5)));
        }
    }

    #[test]
    fn test_non_positive_radius_sees_only_origin() {
        let grid = room_grid();
        assert_eq!(compute(&grid, Position::new(5, 5), 0).len(), 1);
        assert_eq!(compute(&grid, Position::new(5, 5), -2).len(), 1);
    }

    #[test]
    fn test_origin_out_of_bounds_sees_nothing() {
        let grid = room_grid();
        assert!(compute(&grid, Position::new(-1, 5), 6).is_empty());
        assert!(compute(&grid, Position::new(30, 5), 6).is_empty());
    }

    #[test]
    fn test_walls_block_but_are_lit() {
        let grid = room_grid();
        let origin = Position::new(10, 9);
        let visible = compute(&grid, origin, 10);
        // The pillar face is visible
        assert!(visible.contains(Position::new(14, 9)));
        // Directly behind it is not
        assert!(!visible.contains(Position::new(17, 9)));
        // Clear line but outside the disc
        assert!(!visible.contains(Position::new(3, 1)));
    }

    #[test]
    fn test_larger_radius_only_adds_cells() {
        let grid = room_grid();
        let origin = Position::new(6, 12);
        for (r1, r2) in [(1, 2), (3, 7), (5, 12)] {
            let small = compute(&grid, origin, r1);
            let large = compute(&grid, origin, r2);
            assert!(small.iter().all(|p| large.contains(p)), "radius {} not within {}", r1, r2);
        }
    }

    #[test]
    fn test_huge_radius_covers_the_grid() {
        let grid = room_grid();
        let origin = Position::new(5, 5);
        let whole = compute(&grid, origin, grid.width + grid.height);
        assert_eq!(compute(&grid, origin, 50_000), whole);
        assert_eq!(compute(&grid, origin, i32::MAX), whole);

        let open = Grid::new(20, 20, Tile::Floor);
        assert_eq!(compute(&open, Position::new(5, 5), 50_000).len(), 400);
    }

    #[test]
    fn test_seen_ever_is_monotonic_superset() {
        let mut grid = room_grid();
        let mut previously_seen: Vec<(i32, i32)> = Vec::new();
        for origin in [Position::new(3, 3), Position::new(20, 15), Position::new(12, 9)] {
            update_visibility(&mut grid, origin, 6);
            for y in 0..grid.height {
                for x in 0..grid.width {
                    if grid.is_visible_now(x, y) {
                        assert!(grid.was_seen_ever(x, y));
                    }
                }
            }
            assert!(previously_seen.iter().all(|&(x, y)| grid.was_seen_ever(x, y)));
            previously_seen = (0..grid.height)
                .flat_map(|y| (0..grid.width).map(move |x| (x, y)))
                .filter(|&(x, y)| grid.was_seen_ever(x, y))
                .collect();
        }
        // Current visibility was recomputed, not accumulated
        assert!(!grid.is_visible_now(3, 3));
    }

    #[test]
    fn test_straight_corridor_is_fully_visible() {
        let mut grid = Grid::new(30, 9, Tile::Wall);
        for pos in Rect::new(1, 2, 5, 5).cells() {
            grid.set_tile(pos.x, pos.y, Tile::Floor);
        }
        for pos in Rect::new(16, 2, 5, 5).cells() {
            grid.set_tile(pos.x, pos.y, Tile::Floor);
        }
        for x in 6..16 {
            grid.set_tile(x, 4, Tile::Floor);
        }

        let visible = compute(&grid, Position::new(5, 4), 12);
        for x in 5..=16 {
            assert!(visible.contains(Position::new(x, 4)), "corridor cell {} hidden", x);
        }
        // Walls lining the corridor do not hide the far room entrance
        assert!(visible.contains(Position::new(17, 4)));
    }
}
