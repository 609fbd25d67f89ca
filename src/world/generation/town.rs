//! Town generator
//!
//! The persistent surface level: a walled field of grass holding a fixed
//! catalog of buildings, with dirt roads from every door to the inn.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::building::{generate_interior_with, Building};
use super::{grow_to_minimum, Placement};
use crate::data::{BuildingConfig, TownConfig};
use crate::world::paths::shortest_path;
use crate::world::{Grid, Position, Rect, Tile};

pub const MIN_TOWN_WIDTH: i32 = 24;
pub const MIN_TOWN_HEIGHT: i32 = 16;

/// Kinds of town buildings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingCategory {
    /// The hub every road leads to
    Inn,
    Shop,
    Blacksmith,
    Home,
    /// Entrance to the dungeon
    Crypt,
}

impl BuildingCategory {
    pub fn name(&self) -> &'static str {
        match self {
            BuildingCategory::Inn => "Inn",
            BuildingCategory::Shop => "Shop",
            BuildingCategory::Blacksmith => "Blacksmith",
            BuildingCategory::Home => "Home",
            BuildingCategory::Crypt => "Crypt",
        }
    }

    /// Hub-like buildings cluster around the town center
    pub fn is_hub(&self) -> bool {
        matches!(
            self,
            BuildingCategory::Inn | BuildingCategory::Shop | BuildingCategory::Blacksmith
        )
    }

    pub fn door_tile(&self) -> Tile {
        match self {
            BuildingCategory::Crypt => Tile::CryptDoor,
            _ => Tile::Door,
        }
    }

    fn bias(&self) -> PlacementBias {
        match self {
            BuildingCategory::Inn | BuildingCategory::Shop | BuildingCategory::Blacksmith => {
                PlacementBias::Central
            }
            BuildingCategory::Home => PlacementBias::Uniform,
            BuildingCategory::Crypt => PlacementBias::Edge,
        }
    }
}

/// Which wall of a footprint holds the door
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorSide {
    North,
    South,
    East,
    West,
}

impl DoorSide {
    /// Unit step out of the building
    pub fn offset(&self) -> (i32, i32) {
        match self {
            DoorSide::North => (0, -1),
            DoorSide::South => (0, 1),
            DoorSide::East => (1, 0),
            DoorSide::West => (-1, 0),
        }
    }

    /// Door cell for a footprint, centered on this side
    pub fn door_of(&self, footprint: &Rect) -> Position {
        let center = footprint.center();
        match self {
            DoorSide::North => Position::new(center.x, footprint.y),
            DoorSide::South => Position::new(center.x, footprint.bottom()),
            DoorSide::East => Position::new(footprint.right(), center.y),
            DoorSide::West => Position::new(footprint.x, center.y),
        }
    }
}

/// A required building in the town catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotSpec {
    pub category: BuildingCategory,
    pub width: i32,
    pub height: i32,
    pub door_side: DoorSide,
}

impl LotSpec {
    const fn new(category: BuildingCategory, width: i32, height: i32, door_side: DoorSide) -> Self {
        Self {
            category,
            width,
            height,
            door_side,
        }
    }
}

/// Every town has these, placed in this order: hubs first, the crypt last
pub const TOWN_CATALOG: [LotSpec; 6] = [
    LotSpec::new(BuildingCategory::Inn, 9, 6, DoorSide::South),
    LotSpec::new(BuildingCategory::Shop, 7, 5, DoorSide::East),
    LotSpec::new(BuildingCategory::Blacksmith, 7, 5, DoorSide::West),
    LotSpec::new(BuildingCategory::Home, 5, 4, DoorSide::South),
    LotSpec::new(BuildingCategory::Home, 5, 4, DoorSide::North),
    LotSpec::new(BuildingCategory::Crypt, 5, 5, DoorSide::South),
];

/// A placed town building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingLot {
    pub category: BuildingCategory,
    pub footprint: Rect,
    pub door: Position,
    pub door_side: DoorSide,
    /// Generated on first entry, then reused
    pub interior: Option<Building>,
}

impl BuildingLot {
    /// The cell directly in front of the door
    pub fn outside(&self) -> Position {
        let (dx, dy) = self.door_side.offset();
        self.door.offset(dx, dy)
    }

    /// The interior, generating it the first time it is asked for
    pub fn interior_or_generate(
        &mut self,
        rng: &mut StdRng,
        config: &BuildingConfig,
    ) -> &Building {
        let category = self.category;
        self.interior
            .get_or_insert_with(|| generate_interior_with(category, rng, config))
    }
}

/// A generated town
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Town {
    pub grid: Grid,
    /// Placed buildings; the first one is the hub
    pub lots: Vec<BuildingLot>,
    /// Outcome per catalog entry, indexing into `lots` when placed
    pub placements: Vec<(BuildingCategory, Placement<usize>)>,
    pub start: Position,
    /// Requested size, set when it was below the minimum and the grid was grown
    pub grown_from: Option<(i32, i32)>,
}

impl Town {
    pub fn hub(&self) -> Option<&BuildingLot> {
        self.lots.first()
    }

    /// The lot whose door is at `pos`
    pub fn lot_at_door(&self, pos: Position) -> Option<&BuildingLot> {
        self.lots.iter().find(|lot| lot.door == pos)
    }

    pub fn lot_at_door_mut(&mut self, pos: Position) -> Option<&mut BuildingLot> {
        self.lots.iter_mut().find(|lot| lot.door == pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlacementBias {
    Uniform,
    Central,
    Edge,
}

/// Width of the band along the map edge the crypt is drawn to
const EDGE_BAND: i32 = 3;

/// Generate a town using default parameters
pub fn generate_town(width: i32, height: i32, rng: &mut StdRng) -> Town {
    let config = TownConfig {
        width,
        height,
        ..Default::default()
    };
    generate_town_with(rng, &config)
}

/// Generate a town
pub fn generate_town_with(rng: &mut StdRng, config: &TownConfig) -> Town {
    let (width, height, grown_from) = grow_to_minimum(
        "Town",
        (config.width, config.height),
        (MIN_TOWN_WIDTH, MIN_TOWN_HEIGHT),
    );
    let mut grid = Grid::new(width, height, Tile::Grass);

    // Enclosing wall
    for x in 0..width {
        grid.set_tile(x, 0, Tile::Wall);
        grid.set_tile(x, height - 1, Tile::Wall);
    }
    for y in 0..height {
        grid.set_tile(0, y, Tile::Wall);
        grid.set_tile(width - 1, y, Tile::Wall);
    }

    let mut lots: Vec<BuildingLot> = Vec::new();
    let mut placements = Vec::with_capacity(TOWN_CATALOG.len());

    for spec in &TOWN_CATALOG {
        let outcome = match place_lot(&grid, &lots, spec, rng, config) {
            Some(lot) => {
                for pos in lot.footprint.cells() {
                    grid.set_tile(pos.x, pos.y, Tile::Wall);
                }
                grid.set_tile(lot.door.x, lot.door.y, spec.category.door_tile());
                log::debug!(
                    "Placed {} at ({}, {}), door ({}, {})",
                    spec.category.name(),
                    lot.footprint.x,
                    lot.footprint.y,
                    lot.door.x,
                    lot.door.y
                );
                lots.push(lot);
                Placement::Placed(lots.len() - 1)
            }
            None => {
                log::warn!(
                    "Could not place {} in {}x{} town, dropping it",
                    spec.category.name(),
                    width,
                    height
                );
                Placement::Skipped {
                    attempts: config.biased_tries + config.fallback_tries,
                }
            }
        };
        placements.push((spec.category, outcome));
    }

    cut_roads(&mut grid, &lots);
    paint_porches(&mut grid, &lots);

    let start = match lots.first() {
        Some(hub) => {
            let (dx, dy) = hub.door_side.offset();
            let front = hub.door.offset(2 * dx, 2 * dy);
            if grid.is_walkable(front.x, front.y) {
                front
            } else {
                hub.door
            }
        }
        None => Position::new(width / 2, height / 2),
    };
    grid.start = start;

    log::info!("Generated {}x{} town with {} buildings", width, height, lots.len());

    Town {
        grid,
        lots,
        placements,
        start,
        grown_from,
    }
}

/// Biased search first, then uniform brute force under the same rules
fn place_lot(
    grid: &Grid,
    lots: &[BuildingLot],
    spec: &LotSpec,
    rng: &mut StdRng,
    config: &TownConfig,
) -> Option<BuildingLot> {
    let margin = config.edge_margin.max(1);
    let range_x = margin..=grid.width - margin - spec.width;
    let range_y = margin..=grid.height - margin - spec.height;
    if range_x.is_empty() || range_y.is_empty() {
        return None;
    }

    let searches = [
        (spec.category.bias(), config.biased_tries),
        (PlacementBias::Uniform, config.fallback_tries),
    ];
    for (bias, tries) in searches {
        for _ in 0..tries {
            let origin = sample_origin(rng, bias, range_x.clone(), range_y.clone());
            let footprint = Rect::new(origin.x, origin.y, spec.width, spec.height);
            let lot = BuildingLot {
                category: spec.category,
                footprint,
                door: spec.door_side.door_of(&footprint),
                door_side: spec.door_side,
                interior: None,
            };
            if lot_fits(grid, lots, &lot, config.building_buffer) {
                return Some(lot);
            }
        }
        log::debug!(
            "{} search for {} exhausted {} tries",
            bias_name(bias),
            spec.category.name(),
            tries
        );
    }
    None
}

fn lot_fits(grid: &Grid, lots: &[BuildingLot], lot: &BuildingLot, buffer: i32) -> bool {
    let clear = !lots
        .iter()
        .any(|other| other.footprint.expanded(buffer).intersects(&lot.footprint));
    let outside = lot.outside();
    clear && grid.in_bounds(outside.x, outside.y) && grid.tile_at(outside) != Tile::Wall
}

fn sample_origin(
    rng: &mut StdRng,
    bias: PlacementBias,
    range_x: RangeInclusive<i32>,
    range_y: RangeInclusive<i32>,
) -> Position {
    match bias {
        PlacementBias::Uniform => Position::new(rng.gen_range(range_x), rng.gen_range(range_y)),
        PlacementBias::Central => {
            Position::new(sample_central(rng, range_x), sample_central(rng, range_y))
        }
        PlacementBias::Edge => {
            let (lo_x, hi_x) = (*range_x.start(), *range_x.end());
            let (lo_y, hi_y) = (*range_y.start(), *range_y.end());
            let near_low = |lo: i32, hi: i32| lo..=hi.min(lo + EDGE_BAND);
            let near_high = |lo: i32, hi: i32| hi.saturating_sub(EDGE_BAND).max(lo)..=hi;
            match rng.gen_range(0..4) {
                0 => Position::new(rng.gen_range(near_low(lo_x, hi_x)), rng.gen_range(range_y)),
                1 => Position::new(rng.gen_range(near_high(lo_x, hi_x)), rng.gen_range(range_y)),
                2 => Position::new(rng.gen_range(range_x), rng.gen_range(near_low(lo_y, hi_y))),
                _ => Position::new(rng.gen_range(range_x), rng.gen_range(near_high(lo_y, hi_y))),
            }
        }
    }
}

/// Middle half of the range
fn sample_central(rng: &mut StdRng, range: RangeInclusive<i32>) -> i32 {
    let (lo, hi) = (*range.start(), *range.end());
    let mid = lo + (hi - lo) / 2;
    let spread = (hi - lo) / 4;
    rng.gen_range(mid - spread..=mid + spread)
}

fn bias_name(bias: PlacementBias) -> &'static str {
    match bias {
        PlacementBias::Uniform => "Uniform",
        PlacementBias::Central => "Central",
        PlacementBias::Edge => "Edge",
    }
}

/// Shortest road from every other door to the hub door. Walls and doors
/// along the way are left alone.
fn cut_roads(grid: &mut Grid, lots: &[BuildingLot]) {
    let Some((hub, others)) = lots.split_first() else {
        return;
    };

    for lot in others {
        let road = shortest_path(grid, lot.door, hub.door, |p| {
            let tile = grid.tile_at(p);
            tile.is_walkable() && tile != Tile::Wall
        });
        let Some(road) = road else {
            log::warn!("No road from {} to {}", lot.category.name(), hub.category.name());
            continue;
        };
        for pos in &road[1..road.len() - 1] {
            let tile = grid.tile_at(*pos);
            if tile != Tile::Wall && !tile.is_door() {
                grid.set_tile(pos.x, pos.y, Tile::Path);
            }
        }
    }
}

/// Plus of path in front of every door, over grass only
fn paint_porches(grid: &mut Grid, lots: &[BuildingLot]) {
    for lot in lots {
        let front = lot.outside();
        let porch = std::iter::once(front).chain(front.cardinal_neighbors());
        for pos in porch {
            if grid.tile_at(pos) == Tile::Grass {
                grid.set_tile(pos.x, pos.y, Tile::Path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::paths::{is_reachable, shortest_path};
    use rand::SeedableRng;

    fn assert_valid(town: &Town) {
        let grid = &town.grid;
        let hub = town.hub().expect("town without a hub");
        assert_eq!(hub.category, BuildingCategory::Inn);

        for (i, a) in town.lots.iter().enumerate() {
            for b in &town.lots[i + 1..] {
                let overlap = a.footprint.intersects(&b.footprint);
                assert!(!overlap, "{:?} overlaps {:?}", a.category, b.category);
                assert!(!a.footprint.expanded(2).intersects(&b.footprint));
            }

            assert_eq!(grid.tile_at(a.door), a.category.door_tile());
            let open_side = a
                .door
                .cardinal_neighbors()
                .iter()
                .any(|p| grid.in_bounds(p.x, p.y) && grid.tile_at(*p) != Tile::Wall);
            assert!(open_side, "{} door is sealed", a.category.name());

            assert!(is_reachable(grid, hub.door, a.door), "{} unreachable", a.category.name());
            let by_road = shortest_path(grid, a.door, hub.door, |p| {
                matches!(grid.tile_at(p), Tile::Path | Tile::Door | Tile::CryptDoor)
            });
            assert!(by_road.is_some(), "no road to {}", a.category.name());
        }

        assert!(grid.is_walkable(town.start.x, town.start.y));
        assert_eq!(grid.start, town.start);

        // Border ring is intact
        for x in 0..grid.width {
            assert_eq!(grid.tile(x, 0), Tile::Wall);
            assert_eq!(grid.tile(x, grid.height - 1), Tile::Wall);
        }
    }

    #[test]
    fn test_generated_towns_are_valid() {
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let town = generate_town(64, 40, &mut rng);
            assert_valid(&town);
            assert_eq!(town.placements.len(), TOWN_CATALOG.len());
        }
    }

    #[test]
    fn test_default_town_fits_whole_catalog() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let town = generate_town(64, 40, &mut rng);
            let all_placed = town.placements.iter().all(|(_, p)| p.is_placed());
            assert!(all_placed, "seed {} dropped a building", seed);
            assert_eq!(town.lots.len(), TOWN_CATALOG.len());
            assert_eq!(town.lots.last().map(|l| l.category), Some(BuildingCategory::Crypt));
        }
    }

    #[test]
    fn test_cramped_town_drops_buildings_gracefully() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let town = generate_town(24, 16, &mut rng);
            assert_valid(&town);
            let placed = town.placements.iter().filter(|(_, p)| p.is_placed()).count();
            assert_eq!(placed, town.lots.len());
            for (category, placement) in &town.placements {
                if let Some(&i) = placement.placed() {
                    assert_eq!(town.lots[i].category, *category);
                }
            }
        }
    }

    #[test]
    fn test_start_is_in_front_of_inn() {
        let mut rng = StdRng::seed_from_u64(21);
        let town = generate_town(64, 40, &mut rng);
        let hub = town.hub().unwrap();
        let (dx, dy) = hub.door_side.offset();
        let front = hub.door.offset(2 * dx, 2 * dy);
        assert!(town.start == front || town.start == hub.door);
    }

    #[test]
    fn test_porches_only_cover_grass() {
        let mut rng = StdRng::seed_from_u64(3);
        let town = generate_town(64, 40, &mut rng);
        for lot in &town.lots {
            assert_eq!(town.grid.tile_at(lot.outside()), Tile::Path);
            assert_eq!(town.grid.tile_at(lot.door), lot.category.door_tile());
        }
    }

    #[test]
    fn test_lot_lookup_by_door() {
        let mut rng = StdRng::seed_from_u64(17);
        let town = generate_town(64, 40, &mut rng);
        for lot in &town.lots {
            assert_eq!(town.lot_at_door(lot.door), Some(lot));
            assert!(town.lot_at_door(lot.outside()).is_none());
        }
        assert_eq!(town.grown_from, None);
    }

    #[test]
    fn test_small_request_is_grown() {
        let mut rng = StdRng::seed_from_u64(6);
        let town = generate_town(10, 10, &mut rng);
        assert_eq!((town.grid.width, town.grid.height), (MIN_TOWN_WIDTH, MIN_TOWN_HEIGHT));
        assert_eq!(town.grown_from, Some((10, 10)));
        assert_valid(&town);
    }

    #[test]
    fn test_interior_is_generated_once() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut town = generate_town(64, 40, &mut rng);
        let config = BuildingConfig::default();
        let door = town.lots[1].door;

        let lot = town.lot_at_door_mut(door).unwrap();
        let first = lot.interior_or_generate(&mut rng, &config).clone();
        let again = lot.interior_or_generate(&mut rng, &config).clone();
        assert_eq!(first, again);
        assert_eq!(first.category, lot.category);
    }

    #[test]
    fn test_same_seed_same_town() {
        let a = generate_town(64, 40, &mut StdRng::seed_from_u64(555));
        let b = generate_town(64, 40, &mut StdRng::seed_from_u64(555));
        assert_eq!(a, b);
    }
}
