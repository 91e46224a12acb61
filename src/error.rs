//! Error types for tree edits and document persistence.

use thiserror::Error;

use crate::node::NodeId;

/// Errors returned by structural tree edits.
///
/// Size violations are not represented here: geometry is clamped wherever it
/// enters the tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The operation referenced a node that is not in the tree.
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// The target cannot receive the node.
    #[error("node {parent} cannot receive children: {reason}")]
    InvalidParent { parent: NodeId, reason: &'static str },
}

/// Errors raised while reading or writing a persisted document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("document i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type TreeResult<T> = Result<T, TreeError>;
