//! RON config loader
//!
//! Loads generation parameters from an external RON file, with fallback to
//! hardcoded defaults.

use std::fs;
use std::path::Path;

use super::GenConfig;
use crate::error::{Result, WorldError};

impl GenConfig {
    /// Load a config from a RON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| WorldError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&content)?;
        log::debug!("Loaded generation config from {:?}", path);
        Ok(config)
    }

    /// Load a config, using defaults if the file is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }
}

/// Export the default config to a RON file for easy editing
pub fn export_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| WorldError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let ron = ron::ser::to_string_pretty(&GenConfig::default(), ron::ser::PrettyConfig::default())?;
    fs::write(path, ron).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
