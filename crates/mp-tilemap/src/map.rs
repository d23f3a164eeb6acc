use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TilemapError, TilemapResult};
use crate::flipbook::{FlipbookRef, PaintedFlipbook};
use crate::layer::{LayerId, TileCoord, TileLayer};
use crate::settings::TilemapSettings;

/// A placement ready to be spawned, with the index of its layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipbookSpawn<'a> {
    /// The placement.
    pub flipbook: &'a PaintedFlipbook,
    /// Position of the placement's layer in the layer stack.
    pub layer_index: usize,
}

/// A tile map: a stack of layers plus the flipbooks painted onto them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    /// Asset name of the map.
    pub name: String,
    /// Width in pixels of one tile.
    pub tile_width: u32,
    /// Height in pixels of one tile.
    pub tile_height: u32,
    width: u32,
    height: u32,
    layers: Vec<TileLayer>,
    #[serde(default)]
    flipbooks: Vec<PaintedFlipbook>,
}

impl TileMap {
    /// Create a map without layers.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            tile_width: 32,
            tile_height: 32,
            width,
            height,
            layers: Vec::new(),
            flipbooks: Vec::new(),
        }
    }

    /// Create a map sized by `settings`, with one empty layer.
    pub fn from_settings(name: impl Into<String>, settings: &TilemapSettings) -> Self {
        let mut map = Self::new(name, settings.default_map_width, settings.default_map_height);
        map.tile_width = settings.default_tile_width;
        map.tile_height = settings.default_tile_height;
        map.add_layer("Layer 1");
        map
    }

    /// Width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    // -----------------------------------------------------------------------
    // Layers
    // -----------------------------------------------------------------------

    /// Add an empty layer on top of the stack.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let layer = TileLayer::new(name, self.width, self.height);
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    /// All layers, bottom first.
    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    /// Get a layer by handle.
    pub fn layer(&self, id: LayerId) -> Option<&TileLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Get a mutable layer by handle.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut TileLayer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    /// Get the stack position of a layer.
    pub fn layer_index(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    /// Remove the layer at `index` together with every flipbook painted on it.
    ///
    /// The order of the remaining flipbooks is not preserved.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Nothing is modified in that case.
    pub fn delete_layer(&mut self, index: usize) {
        assert!(
            index < self.layers.len(),
            "layer index {index} out of range ({} layers)",
            self.layers.len()
        );

        let deleted = self.layers[index].id;
        let removed = swap_remove_where(&mut self.flipbooks, |entry| entry.layer == deleted);
        self.layers.remove(index);
        tracing::debug!(layer = %deleted, flipbooks = removed, "deleted tile layer");
    }

    /// Copy the layer at `index`, inserting the copy right above it.
    ///
    /// Every flipbook painted on the source layer is painted on the copy too.
    /// Returns the handle of the copy.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range. Nothing is modified in that case.
    pub fn duplicate_layer(&mut self, index: usize) -> LayerId {
        assert!(
            index < self.layers.len(),
            "layer index {index} out of range ({} layers)",
            self.layers.len()
        );

        let source = self.layers[index].id;
        let copy = self.layers[index].duplicate();
        let copy_id = copy.id;
        self.layers.insert(index + 1, copy);

        // Only the entries that existed before the copy started.
        let existing = self.flipbooks.len();
        for i in 0..existing {
            if self.flipbooks[i].layer == source {
                let entry = PaintedFlipbook {
                    layer: copy_id,
                    ..self.flipbooks[i].clone()
                };
                self.flipbooks.push(entry);
            }
        }

        tracing::debug!(
            layer = %source,
            copy = %copy_id,
            flipbooks = self.flipbooks.len() - existing,
            "duplicated tile layer"
        );
        copy_id
    }

    /// Change the map size. Every layer is resized and flipbooks that no
    /// longer fit are pruned.
    pub fn resize(&mut self, width: u32, height: u32) -> TilemapResult<()> {
        if width == 0 || height == 0 {
            return Err(TilemapError::InvalidDimensions { width, height });
        }
        self.width = width;
        self.height = height;
        for layer in &mut self.layers {
            layer.resize(width, height);
        }
        self.prune_out_of_range_flipbooks();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Flipbooks
    // -----------------------------------------------------------------------

    /// Paint `source` at `location` on `layer`, replacing whatever flipbook
    /// was painted there.
    pub fn add_flipbook(&mut self, source: FlipbookRef, layer: LayerId, location: TileCoord) {
        match self
            .flipbooks
            .iter_mut()
            .find(|entry| entry.layer == layer && entry.location == location)
        {
            Some(entry) => entry.source = source,
            None => self.flipbooks.push(PaintedFlipbook {
                source,
                layer,
                location,
            }),
        }
    }

    /// Erase the flipbooks at `location` on `layer`, or on every layer when
    /// `layer` is `None`.
    pub fn remove_flipbook(&mut self, layer: Option<LayerId>, location: TileCoord) {
        self.flipbooks.retain(|entry| !entry.matches(layer, location));
    }

    /// The flipbook at `location` on `layer`, or on any layer when `layer` is
    /// `None`. The first match wins.
    pub fn flipbook(&self, layer: Option<LayerId>, location: TileCoord) -> Option<&FlipbookRef> {
        self.flipbooks
            .iter()
            .find(|entry| entry.matches(layer, location))
            .map(|entry| &entry.source)
    }

    /// Erase every flipbook.
    pub fn clear_all_flipbooks(&mut self) {
        self.flipbooks.clear();
    }

    /// Number of painted flipbooks.
    pub fn num_flipbooks(&self) -> usize {
        self.flipbooks.len()
    }

    /// All painted flipbooks.
    pub fn flipbooks(&self) -> &[PaintedFlipbook] {
        &self.flipbooks
    }

    /// Drop every flipbook outside the current map bounds.
    ///
    /// The order of the remaining flipbooks is not preserved. Returns the
    /// number of flipbooks removed.
    pub fn prune_out_of_range_flipbooks(&mut self) -> usize {
        let (width, height) = (self.width, self.height);
        let removed = swap_remove_where(&mut self.flipbooks, |entry| {
            !entry.location.is_within(width, height)
        });
        if removed > 0 {
            tracing::debug!(removed, width, height, "pruned out-of-range flipbooks");
        }
        removed
    }

    /// The flipbooks a game-time renderer should spawn: those on layers
    /// that are not hidden in game.
    pub fn spawn_list(&self) -> Vec<FlipbookSpawn<'_>> {
        self.flipbooks
            .iter()
            .filter_map(|flipbook| {
                let layer_index = self.layer_index(flipbook.layer)?;
                (!self.layers[layer_index].hidden_in_game).then_some(FlipbookSpawn {
                    flipbook,
                    layer_index,
                })
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Check that every layer matches the map size and every flipbook refers
    /// to a known layer.
    pub fn validate(&self) -> TilemapResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TilemapError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        for layer in &self.layers {
            if (layer.width(), layer.height()) != (self.width, self.height) {
                return Err(TilemapError::LayerSizeMismatch {
                    layer: layer.name.clone(),
                    width: layer.width(),
                    height: layer.height(),
                    map_width: self.width,
                    map_height: self.height,
                });
            }
            let expected = layer.width() as usize * layer.height() as usize;
            if layer.cell_count() != expected {
                return Err(TilemapError::CellCountMismatch {
                    layer: layer.name.clone(),
                    expected,
                    actual: layer.cell_count(),
                });
            }
        }
        if let Some(orphan) = self.flipbooks.iter().find(|f| self.layer(f.layer).is_none()) {
            return Err(TilemapError::LayerNotFound(orphan.layer));
        }
        Ok(())
    }

    /// Parse and validate a tile map from JSON.
    pub fn from_json(json: &str) -> TilemapResult<Self> {
        let map: TileMap = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    /// Read, parse, and validate a tile map file.
    pub fn load(path: &Path) -> TilemapResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> TilemapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the map to a file as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> TilemapResult<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

/// Remove every element matching `pred` by swapping in the last element.
fn swap_remove_where<T>(items: &mut Vec<T>, mut pred: impl FnMut(&T) -> bool) -> usize {
    let mut removed = 0;
    let mut i = 0;
    while i < items.len() {
        if pred(&items[i]) {
            items.swap_remove(i);
            removed += 1;
        } else {
            i += 1;
        }
    }
    removed
}
