//! Generation parameters
//!
//! Hardcoded defaults that an external RON file may override.

use serde::{Deserialize, Serialize};

/// All tunable generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub dungeon: DungeonConfig,
    pub building: BuildingConfig,
    pub town: TownConfig,
    /// Player sight radius used by the demo and callers without their own
    pub fov_radius: i32,
    /// Random tries before the floor-tile sampler falls back to a scan
    pub floor_sample_tries: u32,
}

/// Room-and-corridor dungeon floors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub width: i32,
    pub height: i32,
    pub min_room_size: i32,
    pub max_room_size: i32,
    /// Placement attempts, not a room-count target
    pub attempts: u32,
}

/// Building interiors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingConfig {
    pub width: i32,
    pub height: i32,
    /// Total rooms including the entry room
    pub min_rooms: u32,
    pub max_rooms: u32,
    pub tries_per_room: u32,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub min_stub_length: i32,
    pub max_stub_length: i32,
    pub npc_tries: u32,
}

/// The town map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TownConfig {
    pub width: i32,
    pub height: i32,
    /// Category-biased placement tries per building
    pub biased_tries: u32,
    /// Uniform tries once the biased search gives up
    pub fallback_tries: u32,
    /// Minimum free cells between two footprints
    pub building_buffer: i32,
    /// Footprints keep this many cells from the map edge
    pub edge_margin: i32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            dungeon: DungeonConfig::default(),
            building: BuildingConfig::default(),
            town: TownConfig::default(),
            fov_radius: 8,
            floor_sample_tries: crate::world::grid::DEFAULT_FLOOR_SAMPLE_TRIES,
        }
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 50,
            min_room_size: 4,
            max_room_size: 10,
            attempts: 60,
        }
    }
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
            min_rooms: 1,
            max_rooms: 3,
            tries_per_room: 12,
            min_room_size: 3,
            max_room_size: 6,
            min_stub_length: 2,
            max_stub_length: 4,
            npc_tries: 20,
        }
    }
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 40,
            biased_tries: 60,
            fallback_tries: 400,
            building_buffer: 2,
            edge_margin: 2,
        }
    }
}
