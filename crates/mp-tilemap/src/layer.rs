use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable handle of a tile layer.
///
/// Placements refer to layers by handle, never by ownership; a handle whose
/// layer was deleted simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub Uuid);

impl LayerId {
    /// Generate a new random layer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Integer tile coordinate within a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl TileCoord {
    /// Create a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True if the coordinate lies in `[0, width) x [0, height)`.
    pub fn is_within(self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One cell of a tile layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileCell {
    /// Tile set asset the tile comes from. `None` is an empty cell.
    pub tile_set: Option<String>,
    /// Index of the tile within its tile set.
    pub tile_index: i32,
}

impl TileCell {
    /// A cell showing tile `tile_index` of `tile_set`.
    pub fn new(tile_set: impl Into<String>, tile_index: i32) -> Self {
        Self {
            tile_set: Some(tile_set.into()),
            tile_index,
        }
    }

    /// Check if the cell shows nothing.
    pub fn is_empty(&self) -> bool {
        self.tile_set.is_none()
    }
}

impl Default for TileCell {
    fn default() -> Self {
        Self {
            tile_set: None,
            tile_index: -1,
        }
    }
}

/// A 2D grid plane of a tile map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Handle used by placements.
    pub id: LayerId,
    /// Display name.
    pub name: String,
    /// Whether the layer is only drawn in the editor.
    #[serde(default)]
    pub hidden_in_game: bool,
    width: u32,
    height: u32,
    /// Row-major, `width * height` entries.
    cells: Vec<TileCell>,
}

impl TileLayer {
    /// Create an empty layer.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: LayerId::new(),
            name: name.into(),
            hidden_in_game: false,
            width,
            height,
            cells: vec![TileCell::default(); (width as usize) * (height as usize)],
        }
    }

    /// Width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of stored cells. Equal to `width * height` for a valid layer.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn offset(&self, coord: TileCoord) -> Option<usize> {
        coord
            .is_within(self.width, self.height)
            .then(|| coord.y as usize * self.width as usize + coord.x as usize)
    }

    /// Get the cell at `coord`.
    pub fn cell(&self, coord: TileCoord) -> Option<&TileCell> {
        self.offset(coord).and_then(|i| self.cells.get(i))
    }

    /// Replace the cell at `coord`. Returns false if `coord` is out of range.
    pub fn set_cell(&mut self, coord: TileCoord, cell: TileCell) -> bool {
        match self.offset(coord).and_then(|i| self.cells.get_mut(i)) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Iterate over every cell with its coordinate, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (TileCoord, &TileCell)> {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            (TileCoord::new((i % width) as i32, (i / width) as i32), cell)
        })
    }

    /// Change the grid size, keeping the cells that still fit.
    pub fn resize(&mut self, width: u32, height: u32) {
        let mut cells = vec![TileCell::default(); (width as usize) * (height as usize)];
        for y in 0..height.min(self.height) {
            for x in 0..width.min(self.width) {
                let old = y as usize * self.width as usize + x as usize;
                let new = y as usize * width as usize + x as usize;
                if let Some(cell) = self.cells.get_mut(old) {
                    cells[new] = std::mem::take(cell);
                }
            }
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
    }

    /// Deep copy with a fresh handle.
    pub fn duplicate(&self) -> Self {
        Self {
            id: LayerId::new(),
            name: format!("{} Copy", self.name),
            ..self.clone()
        }
    }
}
