//! Error types
//!
//! Generation itself never fails; errors come from the bounded floor-tile
//! sampler, from malformed stored grids and from loading or exporting
//! configuration.

use std::path::PathBuf;

/// Errors surfaced by the world library
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The grid interior holds no FLOOR tile to sample
    #[error("no floor tile in the interior of a {width}x{height} grid")]
    NoFloorTile { width: i32, height: i32 },

    /// Stored grid data whose cell vectors do not match its size
    #[error("grid data does not match its {width}x{height} size")]
    MalformedGrid { width: i32, height: i32 },

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

pub type Result<T> = std::result::Result<T, WorldError>;
