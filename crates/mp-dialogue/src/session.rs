//! Runtime state for a conversation in progress.

use std::collections::HashSet;

use crate::condition::ConditionRegistry;
use crate::dialogue::Dialogue;
use crate::error::{DialogueError, DialogueResult};
use crate::event::EventRegistry;
use crate::node::{DialogueNode, NodeId};

/// Plays one dialogue: tracks the active node and the nodes already visited.
///
/// The session owns the registries that give meaning to leaf conditions and
/// events. The participants are passed to every call that may evaluate a
/// condition or fire an event.
#[derive(Debug)]
pub struct DialogueSession<'d, P: ?Sized, N: ?Sized> {
    dialogue: &'d Dialogue,
    conditions: ConditionRegistry<P, N>,
    events: EventRegistry<P, N>,
    /// `NodeId::NONE` until the conversation starts.
    current: NodeId,
    /// Nodes entered so far, in order.
    history: Vec<NodeId>,
    visited: HashSet<NodeId>,
}

impl<'d, P: ?Sized, N: ?Sized> DialogueSession<'d, P, N> {
    /// Create a session that has not started yet.
    pub fn new(
        dialogue: &'d Dialogue,
        conditions: ConditionRegistry<P, N>,
        events: EventRegistry<P, N>,
    ) -> Self {
        Self {
            dialogue,
            conditions,
            events,
            current: NodeId::NONE,
            history: Vec::new(),
            visited: HashSet::new(),
        }
    }

    /// Enter the first node of the dialogue and fire its events.
    ///
    /// Returns `None` if the dialogue has no user nodes.
    pub fn start(&mut self, player: &P, npc: &N) -> Option<&'d DialogueNode> {
        self.reset();
        let first = self.dialogue.first_node();
        if !first.is_set() {
            return None;
        }
        self.enter(first, player, npc);
        Some(first)
    }

    /// The active node, if the conversation has started.
    pub fn current_node(&self) -> Option<&'d DialogueNode> {
        if self.current.is_none() {
            return None;
        }
        self.dialogue.node_by_id(self.current)
    }

    /// The nodes the conversation can move to from the active node.
    pub fn options(&self, player: &P, npc: &N) -> Vec<&'d DialogueNode> {
        match self.current_node() {
            Some(node) => self
                .dialogue
                .next_nodes(node, &self.conditions, player, npc),
            None => Vec::new(),
        }
    }

    /// Move to the option at `index` and fire its events.
    pub fn choose(&mut self, index: usize, player: &P, npc: &N) -> DialogueResult<&'d DialogueNode> {
        let target = self
            .options(player, npc)
            .get(index)
            .copied()
            .ok_or(DialogueError::InvalidChoice(index))?;
        self.enter(target, player, npc);
        Ok(target)
    }

    /// True when the active node offers no way forward.
    pub fn is_finished(&self, player: &P, npc: &N) -> bool {
        self.options(player, npc).is_empty()
    }

    /// Check if a node has been entered during this session.
    pub fn has_visited(&self, id: NodeId) -> bool {
        self.visited.contains(&id)
    }

    /// The nodes entered so far, oldest first.
    pub fn history(&self) -> &[NodeId] {
        &self.history
    }

    /// Forget the active node and the history.
    pub fn reset(&mut self) {
        self.current = NodeId::NONE;
        self.history.clear();
        self.visited.clear();
    }

    fn enter(&mut self, node: &'d DialogueNode, player: &P, npc: &N) {
        self.current = node.id;
        self.history.push(node.id);
        self.visited.insert(node.id);
        let fired = self.events.trigger_all(&node.events, player, npc);
        tracing::debug!(node = %node.id, events = fired, "entered dialogue node");
    }
}
