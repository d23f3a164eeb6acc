use std::collections::HashMap;

use crate::flipbook::PaintedFlipbook;
use crate::layer::{LayerId, TileCoord, TileLayer};
use crate::map::TileMap;

/// Editor-side lookup from preview key to placements.
///
/// Built from a snapshot of a map and invalidated by any edit to it; rebuild
/// after editing. Keys only narrow the search, hits are confirmed against the
/// placement itself.
#[derive(Debug, Clone, Default)]
pub struct PreviewIndex {
    slots: HashMap<i32, Vec<usize>>,
}

impl PreviewIndex {
    /// Index every placement of `map` whose layer still exists.
    pub fn build(map: &TileMap) -> Self {
        let mut slots: HashMap<i32, Vec<usize>> = HashMap::new();
        for (i, flipbook) in map.flipbooks().iter().enumerate() {
            let Some(layer) = map.layer(flipbook.layer) else {
                continue;
            };
            slots.entry(flipbook.preview_key(layer)).or_default().push(i);
        }
        Self { slots }
    }

    /// Find the placement at `coord` on `layer`.
    pub fn find<'m>(
        &self,
        map: &'m TileMap,
        layer: LayerId,
        coord: TileCoord,
    ) -> Option<&'m PaintedFlipbook> {
        let tile_layer = map.layer(layer)?;
        let key = lookup_key(tile_layer, coord);
        self.slots
            .get(&key)?
            .iter()
            .filter_map(|&i| map.flipbooks().get(i))
            .find(|entry| entry.matches(Some(layer), coord))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn lookup_key(layer: &TileLayer, coord: TileCoord) -> i32 {
    PaintedFlipbook {
        source: Default::default(),
        layer: layer.id,
        location: coord,
    }
    .preview_key(layer)
}
