//! Integration tests for the mp-cli binary commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn mp() -> Command {
    Command::cargo_bin("mp").unwrap()
}

const GROUND: &str = "6f1c2a9e-0d3b-4c1e-9a57-3e2b8d4f0a11";
const DECO: &str = "b2d47c10-5e8a-4f3b-8c61-7a9e0f2d3c22";

/// A dialogue with a gated branch and a few events.
fn write_dialogue(dir: &Path) -> PathBuf {
    let path = dir.join("smith.json");
    let dialogue = json!({
        "name": "Smith",
        "description": "The village blacksmith",
        "npc_disposition": "Friendly",
        "next_node_id": 5,
        "data": [
            { "id": -1, "links": [1] },
            {
                "id": 1,
                "text": "Welcome to my forge.",
                "links": [2, 3, 4],
                "events": [{ "name": "greet" }]
            },
            {
                "id": 2,
                "is_player": true,
                "text": "I need a sword.",
                "links": [],
                "events": [{ "name": "give_item", "params": { "item": "sword" } }]
            },
            {
                "id": 3,
                "is_player": true,
                "text": "The mayor sent me.",
                "conditions": [{ "leaf": { "name": "flag", "params": { "name": "met_mayor" } } }],
                "links": []
            },
            {
                "id": 4,
                "is_player": true,
                "text": "Never mind.",
                "conditions": [{ "or": [{ "leaf": { "name": "never" } }, { "leaf": { "name": "always" } }] }],
                "links": [99]
            }
        ]
    });
    fs::write(&path, serde_json::to_string_pretty(&dialogue).unwrap()).unwrap();
    path
}

fn cells(width: usize, height: usize, painted: &[(usize, usize, &str, i32)]) -> Vec<Value> {
    let mut cells = vec![json!({}); width * height];
    for &(x, y, tile_set, tile_index) in painted {
        cells[y * width + x] = json!({ "tile_set": tile_set, "tile_index": tile_index });
    }
    cells
}

/// A 4x3 map with two layers and three painted flipbooks.
fn write_tilemap(dir: &Path) -> PathBuf {
    let path = dir.join("castle.json");
    let map = json!({
        "name": "Castle",
        "tile_width": 32,
        "tile_height": 32,
        "width": 4,
        "height": 3,
        "layers": [
            {
                "id": GROUND,
                "name": "Ground",
                "width": 4,
                "height": 3,
                "cells": cells(4, 3, &[(0, 0, "terrain", 5), (3, 2, "terrain", 5), (1, 1, "terrain", 6)])
            },
            {
                "id": DECO,
                "name": "Deco",
                "hidden_in_game": true,
                "width": 4,
                "height": 3,
                "cells": cells(4, 3, &[])
            }
        ],
        "flipbooks": [
            { "source": "/Game/Torch", "layer": GROUND, "location": { "x": 1, "y": 1 } },
            { "source": "/Game/Water", "layer": GROUND, "location": { "x": 3, "y": 2 } },
            { "source": "/Game/Banner", "layer": DECO, "location": { "x": 0, "y": 2 } }
        ]
    });
    fs::write(&path, serde_json::to_string_pretty(&map).unwrap()).unwrap();
    path
}

fn write_rules(dir: &Path, row_struct: &str) -> PathBuf {
    let path = dir.join("rules.json");
    let rules = json!({
        "row_struct": row_struct,
        "rows": [
            {
                "name": "Torch",
                "tile_set": "terrain",
                "tile_index": 5,
                "flipbook": "/Game/AnimatedTorch",
                "spawn_actor": true,
                "lock_actor_relative_position": true
            },
            {
                "name": "TownOnly",
                "target_worlds": ["Town"],
                "tile_set": "terrain",
                "tile_index": 6,
                "flipbook": "/Game/Fountain"
            }
        ]
    });
    fs::write(&path, serde_json::to_string_pretty(&rules).unwrap()).unwrap();
    path
}

// ---------------------------------------------------------------------------
// mp dialogue show
// ---------------------------------------------------------------------------

#[test]
fn dialogue_show_lists_nodes() {
    let dir = TempDir::new().unwrap();
    let file = write_dialogue(dir.path());

    mp().args(["dialogue", "show"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Smith"))
        .stdout(predicate::str::contains("Welcome to my forge."))
        .stdout(predicate::str::contains("give_item"))
        .stdout(predicate::str::contains("4 nodes"));
}

#[test]
fn dialogue_show_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    mp().args(["dialogue", "show"])
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn dialogue_show_rejects_duplicate_ids() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("dup.json");
    fs::write(
        &file,
        r#"{ "data": [ { "id": 1, "text": "a" }, { "id": 1, "text": "b" } ] }"#,
    )
    .unwrap();

    mp().args(["dialogue", "show"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate node id"));
}

// ---------------------------------------------------------------------------
// mp dialogue next
// ---------------------------------------------------------------------------

#[test]
fn dialogue_next_hides_gated_nodes() {
    let dir = TempDir::new().unwrap();
    let file = write_dialogue(dir.path());

    mp().args(["dialogue", "next"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to my forge."))
        .stdout(predicate::str::contains("I need a sword."))
        .stdout(predicate::str::contains("Never mind."))
        .stdout(predicate::str::contains("The mayor sent me.").not());
}

#[test]
fn dialogue_next_with_flag() {
    let dir = TempDir::new().unwrap();
    let file = write_dialogue(dir.path());

    mp().args(["dialogue", "next", "--flag", "met_mayor"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("The mayor sent me."));
}

#[test]
fn dialogue_next_from_leaf_node() {
    let dir = TempDir::new().unwrap();
    let file = write_dialogue(dir.path());

    // Node 4 only links to a missing node.
    mp().args(["dialogue", "next", "--from", "4"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("No reachable nodes."));
}

#[test]
fn dialogue_next_unknown_node_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_dialogue(dir.path());

    mp().args(["dialogue", "next", "--from", "42"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("node not found: 42"));
}

// ---------------------------------------------------------------------------
// mp dialogue play
// ---------------------------------------------------------------------------

#[test]
fn dialogue_play_fires_events() {
    let dir = TempDir::new().unwrap();
    let file = write_dialogue(dir.path());

    mp().args(["dialogue", "play", "--choose", "0"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("greet"))
        .stdout(predicate::str::contains("I need a sword."))
        .stdout(predicate::str::contains("give_item"))
        .stdout(predicate::str::contains("sword"))
        .stdout(predicate::str::contains("end of conversation"));
}

#[test]
fn dialogue_play_without_choices_lists_options() {
    let dir = TempDir::new().unwrap();
    let file = write_dialogue(dir.path());

    mp().args(["dialogue", "play"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("[0]"))
        .stdout(predicate::str::contains("[1]"))
        .stdout(predicate::str::contains("[2]").not());
}

#[test]
fn dialogue_play_invalid_choice_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_dialogue(dir.path());

    mp().args(["dialogue", "play", "--choose", "5"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid choice: 5"));
}

#[test]
fn dialogue_play_empty_dialogue_fails() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("empty.json");
    fs::write(&file, r#"{ "data": [ { "id": -1 } ] }"#).unwrap();

    mp().args(["dialogue", "play"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("dialogue has no nodes"));
}

// ---------------------------------------------------------------------------
// mp tilemap show
// ---------------------------------------------------------------------------

#[test]
fn tilemap_show_lists_layers_and_flipbooks() {
    let dir = TempDir::new().unwrap();
    let file = write_tilemap(dir.path());

    mp().args(["tilemap", "show"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Castle"))
        .stdout(predicate::str::contains("Ground"))
        .stdout(predicate::str::contains("/Game/Banner"))
        .stdout(predicate::str::contains("2 layers, 3 flipbooks"));
}

#[test]
fn verbose_logs_loaded_files() {
    let dir = TempDir::new().unwrap();
    let map = write_tilemap(dir.path());
    let dialogue = write_dialogue(dir.path());

    mp().env_remove("RUST_LOG")
        .args(["-v", "tilemap", "show"])
        .arg(&map)
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded tile map"));

    mp().env_remove("RUST_LOG")
        .args(["dialogue", "show", "--verbose"])
        .arg(&dialogue)
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded dialogue"));

    mp().env_remove("RUST_LOG")
        .args(["tilemap", "show"])
        .arg(&map)
        .assert()
        .success()
        .stderr(predicate::str::contains("loaded tile map").not());
}

#[test]
fn tilemap_show_rejects_orphan_flipbook() {
    let dir = TempDir::new().unwrap();
    let file = write_tilemap(dir.path());
    let mut map: Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    map["layers"].as_array_mut().unwrap().pop();
    fs::write(&file, map.to_string()).unwrap();

    mp().args(["tilemap", "show"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("layer not found"));
}

// ---------------------------------------------------------------------------
// mp tilemap resize
// ---------------------------------------------------------------------------

#[test]
fn tilemap_resize_prunes_and_writes() {
    let dir = TempDir::new().unwrap();
    let file = write_tilemap(dir.path());
    let out = dir.path().join("small.json");

    mp().args(["tilemap", "resize", "--width", "2", "--height", "2", "-o"])
        .arg(&out)
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("pruned 2 flipbooks"));

    let resized: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(resized["width"], 2);
    assert_eq!(resized["flipbooks"].as_array().unwrap().len(), 1);
    assert_eq!(resized["layers"][0]["cells"].as_array().unwrap().len(), 4);

    // The input is untouched when writing elsewhere.
    let original: Value = serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(original["width"], 4);
}

#[test]
fn tilemap_resize_in_place() {
    let dir = TempDir::new().unwrap();
    let file = write_tilemap(dir.path());

    mp().args(["tilemap", "resize", "--width", "8", "--height", "8"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("pruned 0 flipbooks"));

    mp().args(["tilemap", "show"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("8x8 tiles"));
}

#[test]
fn tilemap_resize_to_zero_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_tilemap(dir.path());

    mp().args(["tilemap", "resize", "--width", "0", "--height", "3"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid map size 0x3"));
}

// ---------------------------------------------------------------------------
// mp tilemap replace
// ---------------------------------------------------------------------------

#[test]
fn tilemap_replace_reports_matches() {
    let dir = TempDir::new().unwrap();
    let file = write_tilemap(dir.path());
    let rules = write_rules(dir.path(), "Pixel2DTileReplacerRow");

    mp().args(["tilemap", "replace", "--world", "Dungeon", "--rules"])
        .arg(&rules)
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("/Game/AnimatedTorch"))
        .stdout(predicate::str::contains("actor (grouped)"))
        .stdout(predicate::str::contains("/Game/Fountain").not())
        .stdout(predicate::str::contains("2 tiles replaced"));
}

#[test]
fn tilemap_replace_targets_world() {
    let dir = TempDir::new().unwrap();
    let file = write_tilemap(dir.path());
    let rules = write_rules(dir.path(), "Pixel2DTileReplacerRow");
    let out = dir.path().join("replaced.json");

    mp().args(["tilemap", "replace", "--world", "Town", "--rules"])
        .arg(&rules)
        .arg("-o")
        .arg(&out)
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("/Game/Fountain"))
        .stdout(predicate::str::contains("3 tiles replaced"));

    let replaced: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let painted = replaced["layers"][0]["cells"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|cell| !cell["tile_set"].is_null())
        .count();
    assert_eq!(painted, 0);
}

#[test]
fn tilemap_replace_bad_table_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_tilemap(dir.path());
    let rules = write_rules(dir.path(), "SomeOtherRow");

    mp().args(["tilemap", "replace", "--world", "Town", "--rules"])
        .arg(&rules)
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a usable tile replacer table"));
}
