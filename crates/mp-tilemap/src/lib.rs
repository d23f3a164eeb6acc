//! Tile maps with painted flipbooks.
//!
//! A [`TileMap`] owns a stack of [`TileLayer`]s and a sparse list of
//! [`PaintedFlipbook`]s keyed by (layer, coordinate). Layer edits keep the
//! placements consistent: deleting a layer drops its flipbooks, duplicating
//! one copies them, and shrinking the map prunes the ones that fall outside.
//!
//! The [`PreviewIndex`] gives editors a hashed lookup over the placements,
//! and the [`TileReplacer`] swaps tiles for flipbooks according to a
//! data-driven rule table.

/// Error types used throughout the crate.
pub mod error;
/// Flipbook references and painted placements.
pub mod flipbook;
/// Tile layers, cells, and coordinates.
pub mod layer;
/// The tile map and its placement bookkeeping.
pub mod map;
/// Hashed lookup of placements for editor previews.
pub mod preview;
/// Rule-driven replacement of tiles by flipbooks.
pub mod replacer;
/// Plugin-wide settings.
pub mod settings;

pub use error::{TilemapError, TilemapResult};
pub use flipbook::{FlipbookRef, PaintedFlipbook};
pub use layer::{LayerId, TileCell, TileCoord, TileLayer};
pub use map::{FlipbookSpawn, TileMap};
pub use preview::PreviewIndex;
pub use replacer::{Replacement, ReplacerRow, ReplacerTable, SpawnMode, TileReplacer};
pub use settings::TilemapSettings;
