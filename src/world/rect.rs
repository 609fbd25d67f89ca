//! Axis-aligned rectangles
//!
//! The placement primitive for rooms and building footprints.

use serde::{Deserialize, Serialize};

use super::Position;

/// An integer rectangle covering `width * height` cells from `(x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Last column covered (inclusive)
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Last row covered (inclusive)
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    /// Center cell, rounded down: a 7-wide rect at x has its center at x + 3
    pub fn center(&self) -> Position {
        Position::new(self.x + (self.width - 1) / 2, self.y + (self.height - 1) / 2)
    }

    /// True if the closed cell ranges overlap on both axes
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Grow by `n` cells on every side
    pub fn expanded(&self, n: i32) -> Rect {
        Rect::new(self.x - n, self.y - n, self.width + 2 * n, self.height + 2 * n)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }

    /// Every cell covered, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y..=self.bottom())
            .flat_map(move |y| (self.x..=self.right()).map(move |x| Position::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_rounds_down() {
        let room = Rect::new(10, 4, 7, 5);
        assert_eq!(room.center(), Position::new(13, 6));
        let even = Rect::new(0, 0, 4, 4);
        assert_eq!(even.center(), Position::new(1, 1));
    }

    #[test]
    fn test_edges() {
        let room = Rect::new(8, 5, 5, 5);
        assert_eq!(room.right(), 12);
        assert_eq!(room.bottom(), 9);
        assert_eq!(room.cells().count(), 25);
        assert!(room.contains(Position::new(12, 9)));
        assert!(!room.contains(Position::new(13, 9)));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 5, 5);
        // Sharing an edge cell counts as overlap
        assert!(a.intersects(&Rect::new(4, 4, 3, 3)));
        // Touching but not overlapping
        let b = Rect::new(5, 0, 3, 3);
        assert!(!a.intersects(&b));
        assert!(a.expanded(1).intersects(&b));
        // Separated on one axis only
        assert!(!a.intersects(&Rect::new(2, 9, 3, 3)));
    }
}
