// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node registry implementing [`SceneTree`]
//!
//! Display state and rationale live directly on the registry's nodes, so the
//! tracker never allocates a parallel store.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use sge_tree_model::{DisplayState, MainState, NodeId, NodeKind, Result, SceneTree, TreeError};

/// Node in the tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Node ID
    pub id: NodeId,
    /// Parent node, `None` only for the root
    pub parent: Option<NodeId>,
    /// Direct children in display order
    pub children: Vec<NodeId>,
    /// Display label
    pub label: String,
    /// Kind of scene graph element
    pub kind: NodeKind,
    /// Current display state
    pub state: DisplayState,
    /// Reason attached by info/error annotations
    pub rationale: Option<String>,
    /// Disabled nodes reject activation
    pub disabled: bool,
}

impl TreeNode {
    fn new(id: NodeId, parent: Option<NodeId>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            label: label.into(),
            kind,
            state: DisplayState::default(),
            rationale: None,
            disabled: false,
        }
    }
}

/// Description of a subtree to load in one call
///
/// ```json
/// { "label": "bracket.stp", "kind": "file", "children": [
///     { "label": "Bracket", "kind": "part", "state": "loading" }
/// ] }
/// ```
///
/// Only `displayed` (any node) and `loading` (leaves) are honoured as initial
/// states; everything else is derived by the tracker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSpec {
    pub label: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<MainState>,
    #[serde(default)]
    pub pmi: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSpec>,
}

impl TreeSpec {
    pub fn new(label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            label: label.into(),
            kind,
            ..Default::default()
        }
    }

    /// Add a child description
    pub fn with_child(mut self, child: TreeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Set the initial main state
    pub fn with_state(mut self, state: MainState) -> Self {
        self.state = Some(state);
        self
    }

    /// Parse a description from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TreeError::description(e.to_string()))
    }

    /// Number of nodes described (including this one)
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeSpec::node_count).sum::<usize>()
    }
}

/// Hash-map backed tree with an invisible root at [`NodeId::ROOT`]
#[derive(Clone, Debug)]
pub struct NodeArena {
    nodes: FxHashMap<NodeId, TreeNode>,
    next_id: u32,
}

impl NodeArena {
    /// Create a tree holding only the root
    pub fn new() -> Self {
        let mut nodes = FxHashMap::default();
        nodes.insert(
            NodeId::ROOT,
            TreeNode::new(NodeId::ROOT, None, "#", NodeKind::Other),
        );
        Self { nodes, next_id: 1 }
    }

    /// Number of nodes, root excluded
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.label.as_str())
    }

    /// Append a new hidden node under `parent`
    pub fn insert(
        &mut self,
        parent: NodeId,
        label: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return Err(TreeError::ParentNotFound(parent));
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes
            .insert(id, TreeNode::new(id, Some(parent), label, kind));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Insert a described subtree under `parent`
    ///
    /// Returns the ids of every created node in pre-order; the first one is
    /// the subtree root. Initial `displayed` states and PMI/disabled flags are
    /// stored on the nodes; `loading` is left for the tracker to apply.
    pub fn insert_spec(&mut self, parent: NodeId, spec: &TreeSpec) -> Result<Vec<NodeId>> {
        let mut created = Vec::with_capacity(spec.node_count());
        self.insert_spec_inner(parent, spec, &mut created)?;
        Ok(created)
    }

    fn insert_spec_inner(
        &mut self,
        parent: NodeId,
        spec: &TreeSpec,
        created: &mut Vec<NodeId>,
    ) -> Result<()> {
        let id = self.insert(parent, spec.label.clone(), spec.kind)?;
        if let Some(node) = self.nodes.get_mut(&id) {
            if spec.state == Some(MainState::Displayed) {
                node.state = node.state.make_displayed();
            }
            node.state = node.state.make_pmi(spec.pmi);
            node.disabled = spec.disabled;
        }
        created.push(id);
        for child in &spec.children {
            self.insert_spec_inner(id, child, created)?;
        }
        Ok(())
    }

    /// Remove a node and its whole subtree
    ///
    /// Returns the removed ids in pre-order.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        if id.is_root() {
            return Err(TreeError::RootRemoval);
        }
        let parent = match self.nodes.get(&id) {
            Some(node) => node.parent,
            None => return Err(TreeError::NodeNotFound(id)),
        };
        let mut removed = vec![id];
        removed.extend(self.descendants(id));
        for node in &removed {
            self.nodes.remove(node);
        }
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != id);
        }
        Ok(removed)
    }

    /// Remove everything below the root
    pub fn clear(&mut self) {
        self.nodes.retain(|id, _| id.is_root());
        if let Some(root) = self.nodes.get_mut(&NodeId::ROOT) {
            root.children.clear();
            root.state = DisplayState::default();
            root.rationale = None;
        }
    }

    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(TreeError::NodeNotFound(id))?;
        node.disabled = disabled;
        Ok(())
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(TreeError::NodeNotFound(id))?;
        node.label = label.into();
        Ok(())
    }

    /// Case-insensitive label search
    pub fn search(&self, query: &str) -> Vec<NodeId> {
        let query_lower = query.to_lowercase();
        let mut results: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| !n.id.is_root() && n.label.to_lowercase().contains(&query_lower))
            .map(|n| n.id)
            .collect();
        results.sort();
        results
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree for NodeArena {
    fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    fn state(&self, id: NodeId) -> Option<DisplayState> {
        self.nodes.get(&id).map(|n| n.state)
    }

    fn set_state(&mut self, id: NodeId, state: DisplayState) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.state = state;
                true
            }
            None => false,
        }
    }

    fn rationale(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).and_then(|n| n.rationale.as_deref())
    }

    fn set_rationale(&mut self, id: NodeId, rationale: Option<String>) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.rationale = rationale;
                true
            }
            None => false,
        }
    }

    fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes.get(&id).map(|n| n.kind).unwrap_or_default()
    }

    fn is_disabled(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.disabled)
    }
}
