//! Generation data
//!
//! Tunable parameters for every generator, loadable from external RON files.

pub mod config;
pub mod loader;

pub use config::{BuildingConfig, DungeonConfig, GenConfig, TownConfig};
pub use loader::export_default_config;
