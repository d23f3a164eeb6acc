use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::event::DialogueEvent;

/// Identifier of a node within one dialogue.
///
/// `-1` ([`NodeId::NONE`]) means "no node" and marks the root placeholder;
/// it is never handed out to a user-created node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i32);

impl NodeId {
    /// The reserved "no node" id.
    pub const NONE: NodeId = NodeId(-1);

    /// Returns true for the reserved "no node" id.
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for NodeId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

/// One line of a branching conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueNode {
    /// Unique id within the owning dialogue.
    pub id: NodeId,
    /// Whether the player speaks this line (presentation only).
    pub is_player: bool,
    /// The line shown to the player.
    pub text: String,
    /// Outgoing edges, in display order. Duplicates and self-links are allowed.
    pub links: Vec<NodeId>,
    /// Events fired when the node becomes active.
    pub events: Vec<DialogueEvent>,
    /// All of these must hold for the node to be reachable.
    pub conditions: Vec<Condition>,
    /// Position of the node in the graph editor.
    pub coordinates: (f32, f32),
    /// Sound asset played with the line.
    pub sound: Option<String>,
    /// Dialogue wave asset played with the line.
    pub dialogue_wave: Option<String>,
    /// Editor comment bubble text.
    pub bubble_comment: String,
    /// Whether the editor draws the comment bubble.
    pub draw_bubble_comment: bool,
}

impl DialogueNode {
    /// A node with the reserved id and every other field empty.
    pub const fn empty() -> Self {
        Self {
            id: NodeId::NONE,
            is_player: false,
            text: String::new(),
            links: Vec::new(),
            events: Vec::new(),
            conditions: Vec::new(),
            coordinates: (0.0, 0.0),
            sound: None,
            dialogue_wave: None,
            bubble_comment: String::new(),
            draw_bubble_comment: false,
        }
    }

    /// Create an NPC line with the given id and text.
    pub fn new(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::empty()
        }
    }

    /// Mark the line as spoken by the player.
    pub fn spoken_by_player(mut self) -> Self {
        self.is_player = true;
        self
    }

    /// Add an outgoing link.
    pub fn with_link(mut self, target: impl Into<NodeId>) -> Self {
        self.links.push(target.into());
        self
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an event.
    pub fn with_event(mut self, event: DialogueEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Returns false for the "no node" sentinel.
    pub fn is_set(&self) -> bool {
        !self.id.is_none()
    }
}

impl Default for DialogueNode {
    fn default() -> Self {
        Self::empty()
    }
}
