//! Building interior generator
//!
//! Interiors grow from a door on the west wall: an entry room by the door,
//! then up to two more rooms, each reached by a short stub corridor heading
//! east, north or south from the room placed before it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::town::BuildingCategory;
use super::{
    carve_h_corridor, carve_l_corridor, carve_room, carve_v_corridor, grow_to_minimum, Placement,
};
use crate::data::BuildingConfig;
use crate::entities::{NpcRole, NpcSpawn};
use crate::world::{Grid, Position, Rect, Tile};

pub const MIN_INTERIOR_WIDTH: i32 = 12;
pub const MIN_INTERIOR_HEIGHT: i32 = 9;

/// A generated building interior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub category: BuildingCategory,
    pub grid: Grid,
    /// Door on the west border, leads back out to town
    pub door: Position,
    /// Player start, just inside the door
    pub start: Position,
    /// Rooms in placement order, entry room first
    pub rooms: Vec<Rect>,
    /// Outcome of every room slot, entry room included
    pub slots: Vec<Placement<Rect>>,
    pub npc: Option<NpcSpawn>,
    /// Configured size, set when it was below the minimum and the grid was grown
    pub grown_from: Option<(i32, i32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StubDirection {
    East,
    North,
    South,
}

const STUB_DIRECTIONS: [StubDirection; 3] =
    [StubDirection::East, StubDirection::North, StubDirection::South];

/// Generate an interior using default parameters
pub fn generate_interior(category: BuildingCategory, rng: &mut StdRng) -> Building {
    generate_interior_with(category, rng, &BuildingConfig::default())
}

/// Generate an interior for a building of the given category
pub fn generate_interior_with(
    category: BuildingCategory,
    rng: &mut StdRng,
    config: &BuildingConfig,
) -> Building {
    let (width, height, grown_from) = grow_to_minimum(
        category.name(),
        (config.width, config.height),
        (MIN_INTERIOR_WIDTH, MIN_INTERIOR_HEIGHT),
    );
    let mut grid = Grid::new(width, height, Tile::Wall);

    let min_size = config.min_room_size.max(1);
    let max_size = config.max_room_size.max(min_size);

    let door = Position::new(0, height / 2);
    let start = Position::new(1, height / 2);

    // Entry room sits against the start cell and spans its row
    let entry_w = rng.gen_range(min_size..=max_size).min(width - 3);
    let entry_h = rng.gen_range(min_size..=max_size).min(height - 2);
    let entry_y = (start.y - entry_h / 2).clamp(1, height - 1 - entry_h);
    let entry = Rect::new(start.x + 1, entry_y, entry_w, entry_h);
    carve_room(&mut grid, &entry);

    let mut rooms = vec![entry];
    let mut slots = vec![Placement::Placed(entry)];

    let min_rooms = config.min_rooms.max(1);
    let target_rooms = rng.gen_range(min_rooms..=config.max_rooms.max(min_rooms));

    for _ in 1..target_rooms {
        let mut placed = None;
        for _ in 0..config.tries_per_room {
            if let Some(room) = try_grow_room(&mut grid, &rooms, rng, config, min_size, max_size) {
                placed = Some(room);
                break;
            }
        }
        match placed {
            Some(room) => {
                rooms.push(room);
                slots.push(Placement::Placed(room));
            }
            None => {
                log::debug!(
                    "{} room slot skipped after {} tries",
                    category.name(),
                    config.tries_per_room
                );
                slots.push(Placement::Skipped {
                    attempts: config.tries_per_room,
                });
            }
        }
    }

    // Door and start go in last so no carving overwrites them
    grid.set_tile(door.x, door.y, Tile::Door);
    grid.set_tile(start.x, start.y, Tile::Floor);
    grid.start = start;

    let npc = NpcRole::for_category(category).map(|role| {
        let room = rooms[rooms.len() - 1];
        NpcSpawn {
            role,
            position: place_npc(&grid, &room, door, start, rng, config.npc_tries),
        }
    });

    log::info!(
        "Generated {} interior with {} room(s){}",
        category.name(),
        rooms.len(),
        npc.map(|n| format!(", {} at ({}, {})", n.role.name(), n.position.x, n.position.y))
            .unwrap_or_default()
    );

    Building {
        category,
        grid,
        door,
        start,
        rooms,
        slots,
        npc,
        grown_from,
    }
}

/// One attempt at a stub corridor plus a room beyond it. Carves and returns
/// the room on success, leaves the grid untouched otherwise.
fn try_grow_room(
    grid: &mut Grid,
    rooms: &[Rect],
    rng: &mut StdRng,
    config: &BuildingConfig,
    min_size: i32,
    max_size: i32,
) -> Option<Rect> {
    let last = rooms[rooms.len() - 1];
    let center = last.center();

    let direction = *STUB_DIRECTIONS.choose(rng)?;
    let min_stub = config.min_stub_length.max(1);
    let stub_len = rng.gen_range(min_stub..=config.max_stub_length.max(min_stub));
    let w = rng.gen_range(min_size..=max_size);
    let h = rng.gen_range(min_size..=max_size);

    let (stub_start, stub_end, candidate) = match direction {
        StubDirection::East => {
            let stub_start = Position::new(last.right() + 1, center.y);
            let stub_end = Position::new(last.right() + stub_len, center.y);
            let y = stub_end.y - rng.gen_range(0..h);
            (stub_start, stub_end, Rect::new(stub_end.x + 1, y, w, h))
        }
        StubDirection::North => {
            let stub_start = Position::new(center.x, last.y - 1);
            let stub_end = Position::new(center.x, last.y - stub_len);
            let x = stub_end.x - rng.gen_range(0..w);
            (stub_start, stub_end, Rect::new(x, stub_end.y - h, w, h))
        }
        StubDirection::South => {
            let stub_start = Position::new(center.x, last.bottom() + 1);
            let stub_end = Position::new(center.x, last.bottom() + stub_len);
            let x = stub_end.x - rng.gen_range(0..w);
            (stub_start, stub_end, Rect::new(x, stub_end.y + 1, w, h))
        }
    };

    let in_bounds = candidate.x >= 2
        && candidate.y >= 1
        && candidate.right() <= grid.width - 2
        && candidate.bottom() <= grid.height - 2;
    if !in_bounds || rooms.iter().any(|r| r.expanded(1).intersects(&candidate)) {
        return None;
    }

    match direction {
        StubDirection::East => carve_h_corridor(grid, stub_start.x, stub_end.x, stub_start.y),
        StubDirection::North | StubDirection::South => {
            carve_v_corridor(grid, stub_start.y, stub_end.y, stub_start.x)
        }
    }
    carve_room(grid, &candidate);
    carve_l_corridor(grid, stub_end, candidate.center(), rng);

    Some(candidate)
}

/// Pick a walkable cell in `room` that is neither the start nor the door,
/// falling back to the room center
fn place_npc(
    grid: &Grid,
    room: &Rect,
    door: Position,
    start: Position,
    rng: &mut StdRng,
    tries: u32,
) -> Position {
    for _ in 0..tries {
        let pos = Position::new(
            rng.gen_range(room.x..=room.right()),
            rng.gen_range(room.y..=room.bottom()),
        );
        if grid.is_walkable(pos.x, pos.y) && pos != start && pos != door {
            return pos;
        }
    }
    room.center()
}
