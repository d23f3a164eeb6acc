//! `mp tilemap` commands.

use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use mp_tilemap::{SpawnMode, TileReplacer, TilemapSettings};

/// `mp tilemap show`
pub fn show(path: &Path) -> Result<(), String> {
    let map = super::load_tilemap(path)?;

    println!(
        "  {} [{}x{} tiles, {}x{} px]",
        map.name.bold(),
        map.width(),
        map.height(),
        map.tile_width,
        map.tile_height
    );
    println!();

    if map.layers().is_empty() {
        println!("  No layers.");
        return Ok(());
    }

    let mut layers = Table::new();
    layers.set_content_arrangement(ContentArrangement::Dynamic);
    layers.set_header(vec!["#", "Layer", "Tiles", "Flipbooks", "Hidden in game"]);
    for (index, layer) in map.layers().iter().enumerate() {
        let tiles = layer.cells().filter(|(_, cell)| !cell.is_empty()).count();
        let flipbooks = map
            .flipbooks()
            .iter()
            .filter(|flipbook| flipbook.layer == layer.id)
            .count();
        layers.add_row(vec![
            index.to_string(),
            layer.name.clone(),
            tiles.to_string(),
            flipbooks.to_string(),
            if layer.hidden_in_game { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{layers}");

    if map.num_flipbooks() > 0 {
        let mut placements = Table::new();
        placements.set_content_arrangement(ContentArrangement::Dynamic);
        placements.set_header(vec!["Layer", "Location", "Flipbook"]);
        for flipbook in map.flipbooks() {
            let layer = map
                .layer(flipbook.layer)
                .map_or_else(|| flipbook.layer.to_string(), |layer| layer.name.clone());
            placements.add_row(vec![
                layer,
                flipbook.location.to_string(),
                flipbook.source.to_string(),
            ]);
        }
        println!();
        println!("{placements}");
    }

    println!();
    println!(
        "  {} layers, {} flipbooks",
        map.layers().len(),
        map.num_flipbooks()
    );

    Ok(())
}

/// `mp tilemap resize`
pub fn resize(path: &Path, width: u32, height: u32, output: Option<&Path>) -> Result<(), String> {
    let mut map = super::load_tilemap(path)?;
    let before = map.num_flipbooks();

    map.resize(width, height).map_err(|e| e.to_string())?;

    let target = output.unwrap_or(path);
    map.save(target)
        .map_err(|e| format!("{}: {e}", target.display()))?;

    println!(
        "  Resized {} to {}x{}, pruned {} flipbooks",
        map.name.bold(),
        width,
        height,
        before - map.num_flipbooks()
    );
    println!("  Wrote {}", target.display());

    Ok(())
}

/// `mp tilemap replace`
pub fn replace(
    path: &Path,
    rules: &Path,
    world: &str,
    output: Option<&Path>,
) -> Result<(), String> {
    let mut map = super::load_tilemap(path)?;
    let settings = TilemapSettings::default().with_tile_replacer_table(rules);
    let replacer = TileReplacer::from_settings(&settings);
    if !replacer.is_enabled() {
        return Err(format!(
            "{}: not a usable tile replacer table",
            rules.display()
        ));
    }

    let replacements = replacer.replace_tiles(&mut map, world);
    if replacements.is_empty() {
        println!("  No tiles to replace.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Rule", "Layer", "Location", "Flipbook", "Spawn"]);
        for replacement in &replacements {
            let layer = map
                .layer(replacement.layer)
                .map_or_else(|| replacement.layer.to_string(), |layer| layer.name.clone());
            let spawn = match replacement.mode {
                SpawnMode::Actor {
                    lock_relative_position: true,
                } => "actor (grouped)",
                SpawnMode::Actor {
                    lock_relative_position: false,
                } => "actor",
                SpawnMode::Component => "component",
            };
            table.add_row(vec![
                replacement.row.clone(),
                layer,
                replacement.coord.to_string(),
                replacement.flipbook.to_string(),
                spawn.to_string(),
            ]);
        }
        println!("{table}");
        println!();
        println!("  {} tiles replaced", replacements.len());
    }

    if let Some(target) = output {
        map.save(target)
            .map_err(|e| format!("{}: {e}", target.display()))?;
        println!("  Wrote {}", target.display());
    }

    Ok(())
}
