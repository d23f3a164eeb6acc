use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::condition::{ConditionRegistry, conditions_met};
use crate::error::{DialogueError, DialogueResult};
use crate::node::{DialogueNode, NodeId};

/// Returned by [`Dialogue::first_node`] when there are no user nodes.
static NO_NODE: DialogueNode = DialogueNode::empty();

/// A dialogue asset: an ordered collection of nodes linked by id.
///
/// The first stored node may carry the reserved id `-1`; it is the root
/// placeholder of the graph editor. All other ids are unique and non-negative
/// in practice, although only uniqueness and "not -1" are enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialogue {
    /// Display name of the conversation.
    pub name: String,
    /// Description of the NPC, used as context by writers.
    pub description: String,
    /// Disposition of the NPC towards the player.
    pub npc_disposition: String,
    /// Whether the graph editor draws idle link splines.
    pub display_idle_splines: bool,
    /// The nodes, in storage order.
    pub data: Vec<DialogueNode>,
    /// The id handed to the next node added without one.
    pub next_node_id: i32,
}

impl Dialogue {
    /// Create a dialogue holding only the root placeholder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: vec![DialogueNode::empty()],
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// The first user-created node in storage order.
    ///
    /// If the dialogue only has the root placeholder, this is an empty node
    /// with id `-1`; check [`DialogueNode::is_set`] before using it.
    pub fn first_node(&self) -> &DialogueNode {
        self.data
            .iter()
            .find(|node| node.is_set())
            .unwrap_or(&NO_NODE)
    }

    /// Find a node by id.
    pub fn node_by_id(&self, id: NodeId) -> Option<&DialogueNode> {
        self.data.iter().find(|node| node.id == id)
    }

    /// Find the storage index of a node by id.
    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.data.iter().position(|node| node.id == id)
    }

    /// The nodes reachable from `node` right now, in link order.
    ///
    /// Links to missing nodes are skipped. Targets whose conditions do not
    /// all hold are left out. Nothing is mutated and no event fires.
    pub fn next_nodes<P: ?Sized, N: ?Sized>(
        &self,
        node: &DialogueNode,
        registry: &ConditionRegistry<P, N>,
        player: &P,
        npc: &N,
    ) -> Vec<&DialogueNode> {
        node.links
            .iter()
            .filter_map(|&link| {
                let target = self.node_by_id(link);
                if target.is_none() {
                    tracing::trace!(from = %node.id, to = %link, "skipping dangling link");
                }
                target
            })
            .filter(|target| conditions_met(&target.conditions, registry, player, npc))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Add a node. An unset id is replaced by the first free id at or above
    /// [`Dialogue::next_node_id`].
    pub fn add_node(&mut self, mut node: DialogueNode) -> DialogueResult<NodeId> {
        if node.id.is_none() {
            node.id = self.free_node_id();
        }
        if self.node_by_id(node.id).is_some() {
            return Err(DialogueError::DuplicateNodeId(node.id));
        }

        let id = node.id;
        self.next_node_id = self.next_node_id.max(id.0.saturating_add(1));
        tracing::debug!(node = %id, "added dialogue node");
        self.data.push(node);
        Ok(id)
    }

    /// The smallest unused id at or above `next_node_id`, never below 1.
    fn free_node_id(&self) -> NodeId {
        let mut id = self.next_node_id.max(1);
        while self.node_by_id(NodeId(id)).is_some() {
            id = id.saturating_add(1);
        }
        NodeId(id)
    }

    /// Append a link from `from` to `to`. The target is not checked.
    pub fn link(&mut self, from: NodeId, to: NodeId) -> DialogueResult<()> {
        let node = self
            .data
            .iter_mut()
            .find(|node| node.id == from)
            .ok_or(DialogueError::NodeNotFound(from))?;
        node.links.push(to);
        Ok(())
    }

    /// Remove a node and every link pointing at it.
    pub fn remove_node(&mut self, id: NodeId) -> DialogueResult<DialogueNode> {
        let index = self
            .node_index(id)
            .ok_or(DialogueError::NodeNotFound(id))?;
        let removed = self.data.remove(index);
        for node in &mut self.data {
            node.links.retain(|link| *link != id);
        }
        tracing::debug!(node = %id, "removed dialogue node");
        Ok(removed)
    }

    /// Check that ids are unique and `-1` is only used by the root placeholder.
    pub fn validate(&self) -> DialogueResult<()> {
        let mut seen = HashSet::new();
        for (index, node) in self.data.iter().enumerate() {
            if node.id.is_none() {
                if index != 0 {
                    return Err(DialogueError::ReservedNodeId(index));
                }
                continue;
            }
            if !seen.insert(node.id) {
                return Err(DialogueError::DuplicateNodeId(node.id));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Parse and validate a dialogue from JSON. `next_node_id` is raised above
    /// every stored id.
    pub fn from_json(json: &str) -> DialogueResult<Self> {
        let mut dialogue: Dialogue = serde_json::from_str(json)?;
        dialogue.validate()?;
        let max_id = dialogue.data.iter().map(|node| node.id.0).max().unwrap_or(0);
        dialogue.next_node_id = dialogue
            .next_node_id
            .max(max_id.saturating_add(1))
            .max(1);
        Ok(dialogue)
    }

    /// Read, parse, and validate a dialogue file.
    pub fn load(path: &Path) -> DialogueResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DialogueResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Dialogue {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            npc_disposition: "Undefined".to_string(),
            display_idle_splines: true,
            data: Vec::new(),
            next_node_id: 1,
        }
    }
}
