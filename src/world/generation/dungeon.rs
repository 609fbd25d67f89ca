//! Room and corridor dungeon generator
//!
//! Classic roguelike floor: rejection-sampled rectangular rooms, each chained
//! to the one placed before it by an L-shaped corridor.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{carve_l_corridor, carve_room, grow_to_minimum};
use crate::data::DungeonConfig;
use crate::world::{Grid, Position, Rect, Tile};

/// Smallest floor that still fits the two fallback rooms
pub const MIN_DUNGEON_SIZE: i32 = 10;

/// A generated dungeon floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    pub grid: Grid,
    /// Rooms in placement order
    pub rooms: Vec<Rect>,
    /// Center of the first room
    pub start: Position,
    /// Stairs down, center of the last room
    pub exit: Position,
    /// Random placement found fewer than two rooms and the corner rooms were used
    pub used_fallback: bool,
    /// Requested size, set when it was below the minimum and the grid was grown
    pub grown_from: Option<(i32, i32)>,
}

/// Generate a dungeon with rooms and corridors using default parameters
pub fn generate_dungeon(width: i32, height: i32, rng: &mut StdRng) -> Dungeon {
    let config = DungeonConfig {
        width,
        height,
        ..Default::default()
    };
    generate_dungeon_with(rng, &config)
}

/// Generate a dungeon with rooms and corridors
pub fn generate_dungeon_with(rng: &mut StdRng, config: &DungeonConfig) -> Dungeon {
    let (width, height, grown_from) = grow_to_minimum(
        "Dungeon",
        (config.width, config.height),
        (MIN_DUNGEON_SIZE, MIN_DUNGEON_SIZE),
    );
    let mut grid = Grid::new(width, height, Tile::Wall);

    let min_room_size = config.min_room_size.max(1);
    let max_room_size = config.max_room_size.max(min_room_size);

    let mut rooms: Vec<Rect> = Vec::new();

    for _ in 0..config.attempts {
        let w = rng.gen_range(min_room_size..=max_room_size);
        let h = rng.gen_range(min_room_size..=max_room_size);
        // Room plus a 1-cell margin must fit inside the border
        if w > width - 2 || h > height - 2 {
            continue;
        }
        let x = rng.gen_range(1..=width - w - 1);
        let y = rng.gen_range(1..=height - h - 1);
        let candidate = Rect::new(x, y, w, h);

        // Rooms never touch: both sides keep a 1-cell buffer
        let overlaps = rooms
            .iter()
            .any(|r| r.expanded(1).intersects(&candidate.expanded(1)));
        if overlaps {
            continue;
        }

        carve_room(&mut grid, &candidate);
        if let Some(prev_center) = rooms.last().map(Rect::center) {
            carve_l_corridor(&mut grid, prev_center, candidate.center(), rng);
        }
        rooms.push(candidate);
    }

    let used_fallback = rooms.len() < 2;
    if used_fallback {
        log::warn!(
            "Only {} room(s) placed in {} attempts, using corner rooms",
            rooms.len(),
            config.attempts
        );
        rooms = place_corner_rooms(&mut grid, min_room_size, rng);
    }

    let start = rooms[0].center();
    let exit = rooms[rooms.len() - 1].center();
    grid.set_tile(exit.x, exit.y, Tile::StairsDown);
    grid.start = start;
    grid.exit = Some(exit);

    log::info!("Generated {}x{} dungeon with {} rooms", width, height, rooms.len());

    Dungeon {
        grid,
        rooms,
        start,
        exit,
        used_fallback,
        grown_from,
    }
}

/// Wipe the grid and place two rooms in opposite corners, joined directly
fn place_corner_rooms(grid: &mut Grid, room_size: i32, rng: &mut StdRng) -> Vec<Rect> {
    grid.fill(Tile::Wall);

    let w = room_size.clamp(1, ((grid.width - 3) / 3).max(1));
    let h = room_size.clamp(1, ((grid.height - 3) / 3).max(1));
    let first = Rect::new(1, 1, w, h);
    let second = Rect::new(grid.width - 1 - w, grid.height - 1 - h, w, h);

    carve_room(grid, &first);
    carve_room(grid, &second);
    carve_l_corridor(grid, first.center(), second.center(), rng);

    vec![first, second]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::paths::is_reachable;
    use rand::SeedableRng;

    fn assert_valid(dungeon: &Dungeon) {
        let rooms = &dungeon.rooms;
        assert!(rooms.len() >= 2, "only {} rooms", rooms.len());

        for (i, a) in rooms.iter().enumerate() {
            for b in &rooms[i + 1..] {
                assert!(
                    !a.expanded(1).intersects(&b.expanded(1)),
                    "{:?} touches {:?}",
                    a,
                    b
                );
            }
            assert!(a.x >= 1 && a.y >= 1);
            assert!(a.right() <= dungeon.grid.width - 2);
            assert!(a.bottom() <= dungeon.grid.height - 2);
        }

        let grid = &dungeon.grid;
        assert_eq!(grid.tile_at(dungeon.start), Tile::Floor);
        assert_eq!(grid.tile_at(dungeon.exit), Tile::StairsDown);
        assert!(rooms[0].contains(dungeon.start));
        assert!(rooms[rooms.len() - 1].contains(dungeon.exit));
        assert!(!rooms[0].contains(dungeon.exit));
        assert_eq!(grid.start, dungeon.start);
        assert_eq!(grid.exit, Some(dungeon.exit));
        assert!(is_reachable(grid, dungeon.start, dungeon.exit));
    }

    #[test]
    fn test_generated_dungeons_are_valid() {
        for seed in 0..60 {
            let mut rng = StdRng::seed_from_u64(seed);
            let dungeon = generate_dungeon(80, 50, &mut rng);
            assert_valid(&dungeon);
        }
    }

    #[test]
    fn test_every_room_is_connected() {
        let mut rng = StdRng::seed_from_u64(99);
        let dungeon = generate_dungeon(80, 50, &mut rng);
        for room in &dungeon.rooms {
            assert!(is_reachable(&dungeon.grid, dungeon.start, room.center()));
        }
    }

    #[test]
    fn test_cramped_dungeons_are_valid() {
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_valid(&generate_dungeon(14, 12, &mut rng));
        }
    }

    #[test]
    fn test_fallback_when_no_room_places() {
        let config = DungeonConfig {
            width: 40,
            height: 30,
            attempts: 0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let dungeon = generate_dungeon_with(&mut rng, &config);

        assert!(dungeon.used_fallback);
        assert_eq!(dungeon.rooms.len(), 2);
        assert_eq!(dungeon.rooms[0].x, 1);
        assert_eq!(dungeon.rooms[1].right(), 38);
        assert_valid(&dungeon);
    }

    #[test]
    fn test_tiny_request_is_grown() {
        let mut rng = StdRng::seed_from_u64(11);
        let dungeon = generate_dungeon(3, 2, &mut rng);
        assert_eq!(dungeon.grid.width, MIN_DUNGEON_SIZE);
        assert_eq!(dungeon.grid.height, MIN_DUNGEON_SIZE);
        assert_eq!(dungeon.grown_from, Some((3, 2)));
        assert_valid(&dungeon);

        let full = generate_dungeon(40, 30, &mut rng);
        assert_eq!(full.grown_from, None);
    }

    #[test]
    fn test_same_seed_same_dungeon() {
        let a = generate_dungeon(80, 50, &mut StdRng::seed_from_u64(1234));
        let b = generate_dungeon(80, 50, &mut StdRng::seed_from_u64(1234));
        let c = generate_dungeon(80, 50, &mut StdRng::seed_from_u64(4321));
        assert_eq!(a, b);
        assert_ne!(a.grid, c.grid);
    }
}
