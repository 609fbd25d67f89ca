//! Entities placed by the generators

pub mod npcs;

pub use npcs::{NpcRole, NpcSpawn};
