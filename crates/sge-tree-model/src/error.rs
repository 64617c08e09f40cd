// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for tree and command operations

use crate::NodeId;
use thiserror::Error;

/// Result type alias for structural tree operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised while building or mutating the tree structure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Node not found
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    /// Parent of an insertion not found
    #[error("Parent node {0} not found")]
    ParentNotFound(NodeId),

    /// Root cannot be removed or re-parented
    #[error("The tree root cannot be removed")]
    RootRemoval,

    /// Invalid tree description
    #[error("Invalid tree description: {0}")]
    InvalidDescription(String),
}

impl TreeError {
    /// Create a new description error
    pub fn description(msg: impl Into<String>) -> Self {
        TreeError::InvalidDescription(msg.into())
    }
}

/// Why a display-state command was rejected
///
/// Rejections never mutate state and never emit notifications.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Target id does not resolve in the tree
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    /// Commands cannot target the tree root
    #[error("Command cannot target the tree root")]
    Root,

    /// Leaf-only command aimed at a node with children
    #[error("Node {node} has {children} children; command applies to leaves only")]
    NotLeaf { node: NodeId, children: usize },

    /// Activation of a loading or disabled node
    #[error("Node {0} cannot be activated in its current state")]
    NotActivatable(NodeId),
}

impl CommandError {
    /// Node the rejection refers to, if any
    pub fn node(&self) -> Option<NodeId> {
        match self {
            CommandError::NodeNotFound(id) | CommandError::NotActivatable(id) => Some(*id),
            CommandError::NotLeaf { node, .. } => Some(*node),
            CommandError::Root => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TreeError::NodeNotFound(NodeId(3)).to_string(),
            "Node n3 not found"
        );
        assert_eq!(
            CommandError::NotLeaf {
                node: NodeId(4),
                children: 2
            }
            .to_string(),
            "Node n4 has 2 children; command applies to leaves only"
        );
        assert_eq!(CommandError::Root.node(), None);
        assert_eq!(CommandError::NotActivatable(NodeId(9)).node(), Some(NodeId(9)));
    }
}
