// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tree capability trait
//!
//! The propagation engine never sees a concrete tree type. Anything that can
//! answer the structural queries below and store a [`DisplayState`] plus an
//! optional rationale per node can be tracked.

use crate::{DisplayState, NodeId, NodeKind};

/// Hierarchy and per-node state storage
///
/// # Example
///
/// ```ignore
/// use sge_tree_model::{NodeId, SceneTree};
///
/// fn print_branch(tree: &dyn SceneTree, id: NodeId) {
///     for node in tree.descendants(id) {
///         println!("{} -> {:?}", node, tree.state(node));
///     }
/// }
/// ```
pub trait SceneTree {
    /// Invisible root the whole hierarchy hangs from
    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Whether the id resolves to a node
    fn contains(&self, id: NodeId) -> bool;

    /// Parent of a node, `None` for the root and unknown ids
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Ordered direct children; empty for leaves and unknown ids
    fn children(&self, id: NodeId) -> &[NodeId];

    /// Current display state, `None` for unknown ids
    fn state(&self, id: NodeId) -> Option<DisplayState>;

    /// Store a display state; returns `false` for unknown ids
    fn set_state(&mut self, id: NodeId, state: DisplayState) -> bool;

    /// Annotation reason attached by an info/error command
    fn rationale(&self, id: NodeId) -> Option<&str>;

    /// Replace or clear the rationale; returns `false` for unknown ids
    fn set_rationale(&mut self, id: NodeId, rationale: Option<String>) -> bool;

    /// Kind of scene graph element behind the node
    fn kind(&self, _id: NodeId) -> NodeKind {
        NodeKind::Other
    }

    /// Disabled nodes reject activation
    fn is_disabled(&self, _id: NodeId) -> bool {
        false
    }

    fn is_leaf(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// Iterate all descendants (depth-first, pre-order, node itself excluded)
    fn iter_descendants(&self, id: NodeId) -> Descendants<'_, Self>
    where
        Self: Sized,
    {
        Descendants::new(self, id)
    }

    /// Flattened descendant list (depth-first, pre-order)
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Ancestors from the direct parent up to, but excluding, the root
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let root = self.root();
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == root {
                break;
            }
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    /// The node itself if it is a part, otherwise every part below it
    fn part_leaves(&self, id: NodeId) -> Vec<NodeId> {
        if self.kind(id) == NodeKind::Part {
            return vec![id];
        }
        self.descendants(id)
            .into_iter()
            .filter(|node| self.kind(*node) == NodeKind::Part)
            .collect()
    }
}

/// Iterator over the descendants of a node (depth-first, pre-order)
pub struct Descendants<'a, T: SceneTree + ?Sized> {
    tree: &'a T,
    stack: Vec<NodeId>,
}

impl<'a, T: SceneTree + ?Sized> Descendants<'a, T> {
    pub fn new(tree: &'a T, id: NodeId) -> Self {
        Self {
            tree,
            stack: tree.children(id).iter().rev().copied().collect(),
        }
    }
}

impl<'a, T: SceneTree + ?Sized> Iterator for Descendants<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Add children in reverse order so first child is processed first
        self.stack
            .extend(self.tree.children(node).iter().rev().copied());
        Some(node)
    }
}
