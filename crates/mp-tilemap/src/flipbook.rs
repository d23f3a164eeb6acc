use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layer::{LayerId, TileCoord, TileLayer};

/// Reference to a flipbook asset, by asset path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlipbookRef(pub String);

impl FlipbookRef {
    /// Create a reference from an asset path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The asset path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the reference points nowhere.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FlipbookRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlipbookRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// A flipbook painted onto one cell of one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintedFlipbook {
    /// The flipbook drawn at the cell.
    pub source: FlipbookRef,
    /// The layer the flipbook is painted on.
    pub layer: LayerId,
    /// The cell the flipbook is painted on.
    pub location: TileCoord,
}

impl PaintedFlipbook {
    /// Check if this placement sits at `coord` on `layer`, where `None`
    /// matches any layer.
    pub fn matches(&self, layer: Option<LayerId>, coord: TileCoord) -> bool {
        layer.is_none_or(|id| id == self.layer) && self.location == coord
    }

    /// Transient key for editor preview bookkeeping.
    ///
    /// Mixes the CRC of the layer name with the layer size and the location.
    /// Distinct placements can share a key, and renaming the layer changes
    /// it, so it must only be used to narrow a search.
    pub fn preview_key(&self, layer: &TileLayer) -> i32 {
        debug_assert_eq!(layer.id, self.layer, "preview key computed against the wrong layer");

        let name_hash = crc32fast::hash(layer.name.as_bytes());
        let width = layer.width();
        let height = layer.height();
        name_hash
            .wrapping_mul(width)
            .wrapping_mul(height)
            .wrapping_add((self.location.x as u32).wrapping_mul(height))
            .wrapping_add(self.location.y as u32) as i32
    }
}
