//! Hollowvale - world generation for a grimdark roguelike
//!
//! Builds the places the player walks: dungeon floors, the town above them
//! and the interiors of its buildings, and works out what the player can
//! see from where they stand.

pub mod data;
pub mod entities;
pub mod error;
pub mod world;

// Re-export commonly used types
pub use data::GenConfig;
pub use error::{Result, WorldError};
pub use world::generation::{
    generate_dungeon, generate_interior, generate_town, Building, BuildingCategory, Dungeon, Town,
};
pub use world::{Grid, Position, Rect, Tile};
