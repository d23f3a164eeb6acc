//! Error types for tile map operations.

use thiserror::Error;

use crate::layer::LayerId;

/// Result type for tile map operations.
pub type TilemapResult<T> = Result<T, TilemapError>;

/// Errors that can occur while loading or editing a tile map.
///
/// Placement lookups never produce these: a missing placement is `None`.
#[derive(Debug, Error)]
pub enum TilemapError {
    /// A placement refers to a layer the map does not contain.
    #[error("layer not found: {0}")]
    LayerNotFound(LayerId),

    /// Map dimensions must be at least one tile in each direction.
    #[error("invalid map size {width}x{height}")]
    InvalidDimensions {
        /// Requested width in tiles.
        width: u32,
        /// Requested height in tiles.
        height: u32,
    },

    /// A layer's size differs from the size of its map.
    #[error("layer \"{layer}\" is {width}x{height}, map is {map_width}x{map_height}")]
    LayerSizeMismatch {
        /// Layer name.
        layer: String,
        /// Width of the layer in tiles.
        width: u32,
        /// Height of the layer in tiles.
        height: u32,
        /// Width of the map in tiles.
        map_width: u32,
        /// Height of the map in tiles.
        map_height: u32,
    },

    /// A layer's cell grid does not match its declared size.
    #[error("layer \"{layer}\" has {actual} cells, expected {expected}")]
    CellCountMismatch {
        /// Layer name.
        layer: String,
        /// `width * height` of the layer.
        expected: usize,
        /// Number of cells stored.
        actual: usize,
    },

    /// The replacer table does not hold replacer rows.
    #[error("row structure of the tile replacer table is \"{0}\", expected \"Pixel2DTileReplacerRow\"")]
    RowStructMismatch(String),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be parsed or written.
    #[error("invalid document: {0}")]
    Json(#[from] serde_json::Error),
}
