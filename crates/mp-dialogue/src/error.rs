//! Error types for dialogue operations.

use thiserror::Error;

use crate::node::NodeId;

/// Result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors that can occur while editing, loading, or playing a dialogue.
///
/// Lookups never produce these: a missing node is reported through `Option`.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// An edit referred to a node that does not exist.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Two nodes share the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    /// The reserved root id was used anywhere but the first stored node.
    #[error("node at index {0} uses the reserved id -1")]
    ReservedNodeId(usize),

    /// The session was asked for an option it does not offer.
    #[error("invalid choice: {0}")]
    InvalidChoice(usize),

    /// Reading a dialogue file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dialogue document could not be parsed or written.
    #[error("invalid dialogue document: {0}")]
    Json(#[from] serde_json::Error),
}
