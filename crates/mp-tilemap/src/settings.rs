use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TilemapResult;

/// Settings shared by every tile map of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilemapSettings {
    /// Rule table for the tile replacer. `None` disables replacement.
    pub tile_replacer_table: Option<PathBuf>,
    /// Width in tiles of newly created maps.
    pub default_map_width: u32,
    /// Height in tiles of newly created maps.
    pub default_map_height: u32,
    /// Width in pixels of one tile of newly created maps.
    pub default_tile_width: u32,
    /// Height in pixels of one tile of newly created maps.
    pub default_tile_height: u32,
}

impl Default for TilemapSettings {
    fn default() -> Self {
        Self {
            tile_replacer_table: None,
            default_map_width: 4,
            default_map_height: 4,
            default_tile_width: 32,
            default_tile_height: 32,
        }
    }
}

impl TilemapSettings {
    /// Read settings from a JSON file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> TilemapResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Set the tile replacer rule table.
    pub fn with_tile_replacer_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.tile_replacer_table = Some(path.into());
        self
    }

    /// Set the size in tiles of newly created maps.
    pub fn with_default_map_size(mut self, width: u32, height: u32) -> Self {
        self.default_map_width = width;
        self.default_map_height = height;
        self
    }

    /// Set the size in pixels of one tile of newly created maps.
    pub fn with_default_tile_size(mut self, width: u32, height: u32) -> Self {
        self.default_tile_width = width;
        self.default_tile_height = height;
        self
    }
}
