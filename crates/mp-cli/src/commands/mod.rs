pub mod dialogue;
pub mod tilemap;

use std::path::Path;

use mp_dialogue::Dialogue;
use mp_tilemap::TileMap;

/// Load a dialogue file, mapping errors to a message naming the file.
fn load_dialogue(path: &Path) -> Result<Dialogue, String> {
    let dialogue = Dialogue::load(path).map_err(|e| format!("{}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), nodes = dialogue.data.len(), "loaded dialogue");
    Ok(dialogue)
}

/// Load a tile map file, mapping errors to a message naming the file.
fn load_tilemap(path: &Path) -> Result<TileMap, String> {
    let map = TileMap::load(path).map_err(|e| format!("{}: {e}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        layers = map.layers().len(),
        flipbooks = map.num_flipbooks(),
        "loaded tile map"
    );
    Ok(map)
}

/// Shorten `text` to at most `max` characters for table cells.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else if text.is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}
