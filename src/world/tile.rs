//! Tile definitions
//!
//! The closed set of cell kinds and their fixed properties.

use serde::{Deserialize, Serialize};

/// Kinds of tiles in dungeons, towns and building interiors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    // Basic terrain
    #[default]
    Wall,
    Floor,

    // Interactables
    StairsDown,
    Door,
    LockedDoor,
    /// Door of the building that leads down into the dungeon
    CryptDoor,
    TownPortal,

    // Town ground
    Grass,
    Path,
}

impl Tile {
    pub fn is_walkable(&self) -> bool {
        !matches!(self, Tile::Wall | Tile::LockedDoor)
    }

    /// Only walls block line of sight
    pub fn is_opaque(&self) -> bool {
        matches!(self, Tile::Wall)
    }

    pub fn is_door(&self) -> bool {
        matches!(self, Tile::Door | Tile::LockedDoor | Tile::CryptDoor)
    }

    pub fn glyph(&self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
            Tile::StairsDown => '>',
            Tile::Door => '+',
            Tile::LockedDoor => 'X',
            Tile::CryptDoor => 'C',
            Tile::TownPortal => 'O',
            Tile::Grass => '"',
            Tile::Path => ':',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tile::Wall => "Wall",
            Tile::Floor => "Floor",
            Tile::StairsDown => "Stairs Down",
            Tile::Door => "Door",
            Tile::LockedDoor => "Locked Door",
            Tile::CryptDoor => "Crypt Door",
            Tile::TownPortal => "Town Portal",
            Tile::Grass => "Grass",
            Tile::Path => "Path",
        }
    }
}
