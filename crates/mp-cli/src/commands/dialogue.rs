//! `mp dialogue` commands.
//!
//! Leaf conditions are resolved against the `--flag`s given on the command
//! line: `flag` holds when its `name` parameter is one of them, `always` and
//! `never` are constant.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use colored::{ColoredString, Colorize};
use comfy_table::{ContentArrangement, Table};
use mp_dialogue::{
    ConditionRegistry, Dialogue, DialogueEvent, DialogueNode, DialogueSession, EventRegistry,
    LeafCondition, NodeId,
};

/// The player side of a command-line conversation: the flags it holds.
#[derive(Debug, Default)]
pub struct PlayerFlags(HashSet<String>);

impl PlayerFlags {
    fn from_args(flags: &[String]) -> Self {
        Self(flags.iter().cloned().collect())
    }

    fn has(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

fn builtin_conditions() -> ConditionRegistry<PlayerFlags, str> {
    let mut registry = ConditionRegistry::new();
    registry
        .register("flag", |leaf: &LeafCondition, player: &PlayerFlags, _: &str| {
            leaf.param_str("name").is_some_and(|name| player.has(name))
        })
        .register("always", |_: &LeafCondition, _: &PlayerFlags, _: &str| true)
        .register("never", |_: &LeafCondition, _: &PlayerFlags, _: &str| false);
    registry
}

/// Register a recorder for every event name used by `dialogue`.
fn recording_events(
    dialogue: &Dialogue,
    fired: &Rc<RefCell<Vec<DialogueEvent>>>,
) -> EventRegistry<PlayerFlags, str> {
    let mut registry = EventRegistry::new();
    let names: HashSet<&str> = dialogue
        .data
        .iter()
        .flat_map(|node| node.events.iter().map(|event| event.name.as_str()))
        .collect();
    for name in names {
        let fired = Rc::clone(fired);
        registry.register(
            name,
            move |event: &DialogueEvent, _: &PlayerFlags, _: &str| {
                fired.borrow_mut().push(event.clone());
            },
        );
    }
    registry
}

fn speaker(node: &DialogueNode) -> ColoredString {
    if node.is_player {
        "Player".cyan().bold()
    } else {
        "NPC".green().bold()
    }
}

fn print_line(node: &DialogueNode) {
    println!("  {}: {}", speaker(node), node.text);
}

fn print_option(index: usize, node: &DialogueNode) {
    println!("    [{index}] {} {}", format!("#{}", node.id).dimmed(), node.text);
}

/// `mp dialogue show`
pub fn show(path: &Path) -> Result<(), String> {
    let dialogue = super::load_dialogue(path)?;

    let title = if dialogue.name.is_empty() {
        path.display().to_string()
    } else {
        dialogue.name.clone()
    };
    println!("  {} [{}]", title.bold(), dialogue.npc_disposition.dimmed());
    if !dialogue.description.is_empty() {
        println!("  {}", dialogue.description);
    }
    println!();

    let nodes: Vec<&DialogueNode> = dialogue.data.iter().filter(|node| node.is_set()).collect();
    if nodes.is_empty() {
        println!("  No nodes.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Speaker", "Text", "Links", "Conditions", "Events"]);

    for node in &nodes {
        let speaker = if node.is_player { "Player" } else { "NPC" };
        let links = node
            .links
            .iter()
            .map(NodeId::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let events = node
            .events
            .iter()
            .map(|event| event.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            node.id.to_string(),
            speaker.to_string(),
            super::truncate(&node.text, 60),
            super::truncate(&links, 30),
            node.conditions.len().to_string(),
            super::truncate(&events, 30),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} nodes", nodes.len());

    Ok(())
}

/// `mp dialogue next`
pub fn next(path: &Path, from: Option<i32>, flags: &[String]) -> Result<(), String> {
    let dialogue = super::load_dialogue(path)?;
    let player = PlayerFlags::from_args(flags);
    let conditions = builtin_conditions();

    let node = match from {
        Some(id) => dialogue
            .node_by_id(NodeId(id))
            .filter(|node| node.is_set())
            .ok_or_else(|| format!("node not found: {id}"))?,
        None => Some(dialogue.first_node())
            .filter(|node| node.is_set())
            .ok_or("dialogue has no nodes")?,
    };

    print_line(node);
    let options = dialogue.next_nodes(node, &conditions, &player, dialogue.name.as_str());
    if options.is_empty() {
        println!("  No reachable nodes.");
        return Ok(());
    }
    for (index, option) in options.iter().enumerate() {
        print_option(index, option);
    }

    Ok(())
}

/// `mp dialogue play`
pub fn play(path: &Path, choices: &[usize], flags: &[String]) -> Result<(), String> {
    let dialogue = super::load_dialogue(path)?;
    let player = PlayerFlags::from_args(flags);
    let npc = dialogue.name.as_str();

    let fired = Rc::new(RefCell::new(Vec::new()));
    let events = recording_events(&dialogue, &fired);
    let mut session = DialogueSession::new(&dialogue, builtin_conditions(), events);

    let first = session
        .start(&player, npc)
        .ok_or("dialogue has no nodes")?;
    print_line(first);
    print_fired(&fired);

    for &choice in choices {
        let node = session
            .choose(choice, &player, npc)
            .map_err(|e| e.to_string())?;
        print_line(node);
        print_fired(&fired);
    }

    let options = session.options(&player, npc);
    if options.is_empty() {
        println!("  {}", "(end of conversation)".dimmed());
    } else {
        for (index, option) in options.iter().enumerate() {
            print_option(index, option);
        }
    }

    Ok(())
}

fn print_fired(fired: &Rc<RefCell<Vec<DialogueEvent>>>) {
    for event in fired.borrow_mut().drain(..) {
        if event.params.is_empty() {
            println!("    {} {}", "*".yellow(), event.name);
        } else {
            let params = serde_json::Value::Object(event.params).to_string();
            println!("    {} {} {}", "*".yellow(), event.name, params.dimmed());
        }
    }
}
