//! World module
//!
//! Contains the grid data structures, tiles, field of view, path search and
//! procedural generation.

pub mod fov;
pub mod generation;
pub mod grid;
pub mod paths;
pub mod position;
pub mod rect;
pub mod tile;

pub use fov::{compute as compute_fov, update_visibility, VisibilitySet};
pub use grid::Grid;
pub use position::Position;
pub use rect::Rect;
pub use tile::Tile;
