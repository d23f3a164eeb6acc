//! Replace painted tiles with flipbooks when a tile map is dropped into a world.
//!
//! Rules come from a JSON table of [`ReplacerRow`]s. A row matches a cell when
//! the world and tile map are among its targets (no targets means any) and
//! the cell shows the row's tile. Matched cells are cleared and reported as
//! [`Replacement`]s for the caller to spawn.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TilemapError, TilemapResult};
use crate::flipbook::FlipbookRef;
use crate::layer::{LayerId, TileCell, TileCoord};
use crate::map::TileMap;
use crate::settings::TilemapSettings;

/// Row structure name a replacer table must declare.
pub const REPLACER_ROW_STRUCT: &str = "Pixel2DTileReplacerRow";

/// One replacement rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplacerRow {
    /// Row key.
    pub name: String,
    /// Worlds the rule applies to. Empty means every world.
    pub target_worlds: Vec<String>,
    /// Tile maps the rule applies to. Empty means every tile map.
    pub target_tile_maps: Vec<String>,
    /// Tile set of the tile to replace.
    pub tile_set: String,
    /// Index of the tile to replace within `tile_set`.
    pub tile_index: i32,
    /// Flipbook spawned in place of the tile.
    pub flipbook: FlipbookRef,
    /// Spawn a standalone actor instead of a component of the map.
    pub spawn_actor: bool,
    /// Group the spawned actor with the map so they move together.
    pub lock_actor_relative_position: bool,
}

impl ReplacerRow {
    /// A rule replacing tile `tile_index` of `tile_set` with `flipbook`.
    pub fn new(
        name: impl Into<String>,
        tile_set: impl Into<String>,
        tile_index: i32,
        flipbook: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tile_set: tile_set.into(),
            tile_index,
            flipbook: FlipbookRef::new(flipbook),
            ..Self::default()
        }
    }

    /// Restrict the rule to a world.
    pub fn with_target_world(mut self, world: impl Into<String>) -> Self {
        self.target_worlds.push(world.into());
        self
    }

    /// Restrict the rule to a tile map.
    pub fn with_target_tile_map(mut self, tile_map: impl Into<String>) -> Self {
        self.target_tile_maps.push(tile_map.into());
        self
    }

    /// Spawn actors instead of components.
    pub fn spawning_actor(mut self, lock_relative_position: bool) -> Self {
        self.spawn_actor = true;
        self.lock_actor_relative_position = lock_relative_position;
        self
    }

    fn targets_world(&self, world: &str) -> bool {
        self.target_worlds.is_empty() || self.target_worlds.iter().any(|w| w == world)
    }

    fn targets_tile_map(&self, tile_map: &str) -> bool {
        self.target_tile_maps.is_empty() || self.target_tile_maps.iter().any(|m| m == tile_map)
    }

    fn spawn_mode(&self) -> SpawnMode {
        if self.spawn_actor {
            SpawnMode::Actor {
                lock_relative_position: self.lock_actor_relative_position,
            }
        } else {
            SpawnMode::Component
        }
    }
}

/// A replacer rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacerTable {
    /// Declared row structure, must be [`REPLACER_ROW_STRUCT`].
    pub row_struct: String,
    /// Rules, applied in order.
    #[serde(default)]
    pub rows: Vec<ReplacerRow>,
}

impl ReplacerTable {
    /// A table holding `rows`.
    pub fn new(rows: Vec<ReplacerRow>) -> Self {
        Self {
            row_struct: REPLACER_ROW_STRUCT.to_string(),
            rows,
        }
    }

    /// Parse a table and check its row structure.
    pub fn from_json(json: &str) -> TilemapResult<Self> {
        let table: ReplacerTable = serde_json::from_str(json)?;
        if table.row_struct != REPLACER_ROW_STRUCT {
            return Err(TilemapError::RowStructMismatch(table.row_struct));
        }
        Ok(table)
    }

    /// Read and parse a table file.
    pub fn load(path: &Path) -> TilemapResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// How a replacement flipbook should be spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// A standalone flipbook actor at the tile's world position.
    Actor {
        /// Group the actor with the tile map.
        lock_relative_position: bool,
    },
    /// A flipbook component attached to the tile map at the tile's position.
    Component,
}

/// A tile that was cleared and should be replaced by a flipbook.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    /// Key of the rule that matched.
    pub row: String,
    /// Layer the tile was on.
    pub layer: LayerId,
    /// Position of that layer in the stack.
    pub layer_index: usize,
    /// The tile's cell.
    pub coord: TileCoord,
    /// Flipbook to spawn.
    pub flipbook: FlipbookRef,
    /// How to spawn it.
    pub mode: SpawnMode,
}

/// Applies a replacer table to tile maps.
///
/// A replacer without a table is disabled and replaces nothing.
#[derive(Debug, Clone, Default)]
pub struct TileReplacer {
    table: Option<ReplacerTable>,
}

impl TileReplacer {
    /// A replacer applying `table`.
    pub fn new(table: ReplacerTable) -> Self {
        Self { table: Some(table) }
    }

    /// A replacer that replaces nothing.
    pub fn disabled() -> Self {
        Self { table: None }
    }

    /// Load the table configured in `settings`.
    ///
    /// Configuration problems are logged and yield a disabled replacer.
    pub fn from_settings(settings: &TilemapSettings) -> Self {
        let Some(path) = settings.tile_replacer_table.as_deref() else {
            tracing::debug!("no tile replacer table configured");
            return Self::disabled();
        };
        match ReplacerTable::load(path) {
            Ok(table) => {
                tracing::debug!(path = %path.display(), rows = table.rows.len(), "loaded tile replacer table");
                Self::new(table)
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    "unable to load the tile replacer table, no replacing will occur: {e}"
                );
                Self::disabled()
            }
        }
    }

    /// Check if a table is loaded.
    pub fn is_enabled(&self) -> bool {
        self.table.is_some()
    }

    /// The loaded rules, empty when disabled.
    pub fn rows(&self) -> &[ReplacerRow] {
        self.table.as_ref().map_or(&[], |table| table.rows.as_slice())
    }

    /// Check if `row` replaces `cell` of `tile_map` dropped into `world`.
    pub fn should_replace_tile(
        &self,
        cell: &TileCell,
        world: &str,
        tile_map: &str,
        row: &ReplacerRow,
    ) -> bool {
        let Some(tile_set) = cell.tile_set.as_deref() else {
            return false;
        };
        row.targets_world(world)
            && row.targets_tile_map(tile_map)
            && row.tile_index == cell.tile_index
            && row.tile_set == tile_set
    }

    /// Check if any rule targets both `tile_map` and `world`.
    pub fn has_replaceable_tiles(&self, tile_map: &str, world: &str) -> bool {
        self.rows()
            .iter()
            .any(|row| row.targets_tile_map(tile_map) && row.targets_world(world))
    }

    /// Clear every tile of `map` matched by a rule and report what should
    /// replace it.
    ///
    /// Cells are visited column by column on each layer and rules in table
    /// order; the first matching rule wins. A matching rule without a
    /// flipbook still clears the tile.
    pub fn replace_tiles(&self, map: &mut TileMap, world: &str) -> Vec<Replacement> {
        let mut replacements = Vec::new();
        if !self.has_replaceable_tiles(&map.name, world) {
            return replacements;
        }

        let map_name = map.name.clone();
        let layer_ids: Vec<LayerId> = map.layers().iter().map(|layer| layer.id).collect();
        for (layer_index, layer_id) in layer_ids.into_iter().enumerate() {
            let Some(layer) = map.layer_mut(layer_id) else {
                continue;
            };
            for x in 0..layer.width() as i32 {
                for y in 0..layer.height() as i32 {
                    let coord = TileCoord::new(x, y);
                    for row in self.rows() {
                        let Some(cell) = layer.cell(coord) else {
                            break;
                        };
                        if !self.should_replace_tile(cell, world, &map_name, row) {
                            continue;
                        }
                        let cleared = TileCell {
                            tile_set: None,
                            ..cell.clone()
                        };
                        layer.set_cell(coord, cleared);
                        if row.flipbook.is_empty() {
                            continue;
                        }
                        replacements.push(Replacement {
                            row: row.name.clone(),
                            layer: layer_id,
                            layer_index,
                            coord,
                            flipbook: row.flipbook.clone(),
                            mode: row.spawn_mode(),
                        });
                    }
                }
            }
        }

        tracing::debug!(
            tile_map = %map_name,
            world,
            replaced = replacements.len(),
            "replaced tiles"
        );
        replacements
    }
}
