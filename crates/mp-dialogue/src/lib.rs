//! Branching dialogue graphs: nodes, conditions, events, and traversal.
//!
//! A [`Dialogue`] owns an ordered collection of [`DialogueNode`]s linked by
//! id. Traversal is a pure query: [`Dialogue::next_nodes`] resolves the links
//! of a node and keeps the targets whose [`Condition`]s hold. Leaf conditions
//! and node events are implemented outside this crate and plugged in through
//! a [`ConditionRegistry`] and an [`EventRegistry`]. A [`DialogueSession`]
//! tracks the active node for a running conversation.

/// Leaf predicates and AND/OR condition trees.
pub mod condition;
/// The dialogue asset and its traversal queries.
pub mod dialogue;
/// Error types for dialogue operations.
pub mod error;
/// Node events and the handler registry.
pub mod event;
/// Dialogue nodes and node identifiers.
pub mod node;
/// Runtime session tracking the active node.
pub mod session;

pub use condition::{Condition, ConditionRegistry, LeafCondition, LeafPredicate, conditions_met};
pub use dialogue::Dialogue;
pub use error::{DialogueError, DialogueResult};
pub use event::{DialogueEvent, EventHandler, EventRegistry};
pub use node::{DialogueNode, NodeId};
pub use session::DialogueSession;
