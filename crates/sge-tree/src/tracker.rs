// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Public command API
//!
//! [`StateTracker`] owns a [`SceneTree`], the displayed set and the list of
//! subscribers. Commands validate their target, run one propagation pass and
//! notify subscribers; structural hooks keep state consistent when the tree
//! changes shape.

use crate::arena::{NodeArena, TreeSpec};
use crate::config::TrackerConfig;
use crate::event::{Activation, ClickTarget, StateEvent, Trigger};
use crate::propagate::Propagator;
use crate::tracked::DisplayedSet;
use rustc_hash::FxHashSet;
use sge_tree_model::{
    AuxState, CommandError, DisplayState, GeometryState, MainState, NodeId, NodeKind, SceneTree,
    TreeError,
};

/// One node or an ordered batch of nodes
///
/// Batches are applied left to right, each node independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Targets {
    One(NodeId),
    Many(Vec<NodeId>),
}

impl From<NodeId> for Targets {
    fn from(id: NodeId) -> Self {
        Targets::One(id)
    }
}

impl From<Vec<NodeId>> for Targets {
    fn from(ids: Vec<NodeId>) -> Self {
        Targets::Many(ids)
    }
}

impl From<&[NodeId]> for Targets {
    fn from(ids: &[NodeId]) -> Self {
        Targets::Many(ids.to_vec())
    }
}

impl<const N: usize> From<[NodeId; N]> for Targets {
    fn from(ids: [NodeId; N]) -> Self {
        Targets::Many(ids.to_vec())
    }
}

/// Handle returned by [`StateTracker::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Subscriber = Box<dyn FnMut(&StateEvent)>;

/// Hierarchical display-state tracker
pub struct StateTracker<T: SceneTree> {
    tree: T,
    displayed: DisplayedSet,
    touched: FxHashSet<NodeId>,
    config: TrackerConfig,
    icons_visible: bool,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: usize,
}

impl<T: SceneTree> StateTracker<T> {
    pub fn new(tree: T) -> Self {
        Self::with_config(tree, TrackerConfig::default())
    }

    /// Create a tracker over an existing tree
    ///
    /// The displayed set is seeded from the nodes that are already displayed.
    pub fn with_config(tree: T, config: TrackerConfig) -> Self {
        let root = tree.root();
        let displayed = tree
            .descendants(root)
            .into_iter()
            .filter(|id| tree.state(*id).is_some_and(|s| s.is_displayed()))
            .collect();
        Self {
            tree,
            displayed,
            touched: FxHashSet::default(),
            icons_visible: config.state_icons,
            config,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Give the tree back, dropping all tracking data
    pub fn into_tree(self) -> T {
        self.tree
    }

    // ------------------------------------------------------------------
    // Subscribers
    // ------------------------------------------------------------------

    /// Register a notification callback
    pub fn subscribe(&mut self, f: impl FnMut(&StateEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Returns `false` if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn emit(&mut self, event: StateEvent) {
        log::debug!("emit {} for {}", event.name(), event.node());
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }

    fn propagator(&mut self) -> Propagator<'_, T> {
        let touched = if self.config.redraw_on_change {
            Some(&mut self.touched)
        } else {
            None
        };
        Propagator {
            tree: &mut self.tree,
            displayed: &mut self.displayed,
            touched,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self, id: NodeId) -> Option<DisplayState> {
        self.tree.state(id)
    }

    pub fn rationale(&self, id: NodeId) -> Option<&str> {
        self.tree.rationale(id)
    }

    fn query(&self, id: NodeId, pred: impl Fn(&DisplayState) -> bool) -> bool {
        if id == self.tree.root() {
            return false;
        }
        self.tree.state(id).is_some_and(|s| pred(&s))
    }

    /// Root and unknown ids are never displayed
    pub fn is_displayed(&self, id: NodeId) -> bool {
        self.query(id, DisplayState::is_displayed)
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.query(id, DisplayState::is_hidden)
    }

    pub fn is_loading(&self, id: NodeId) -> bool {
        self.query(id, DisplayState::is_loading)
    }

    pub fn is_partly_displayed(&self, id: NodeId) -> bool {
        self.query(id, DisplayState::is_partly_displayed)
    }

    /// Tracked-displayed set
    pub fn displayed(&self) -> &DisplayedSet {
        &self.displayed
    }

    /// Drain the nodes whose state changed since the last call
    pub fn take_touched(&mut self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.touched.drain().collect();
        ids.sort_unstable();
        ids
    }

    // ------------------------------------------------------------------
    // State icons
    // ------------------------------------------------------------------

    pub fn state_icons_visible(&self) -> bool {
        self.icons_visible
    }

    pub fn show_state_icons(&mut self) {
        self.icons_visible = true;
    }

    pub fn hide_state_icons(&mut self) {
        self.icons_visible = false;
    }

    pub fn toggle_state_icons(&mut self) {
        self.icons_visible = !self.icons_visible;
    }

    // ------------------------------------------------------------------
    // Target validation
    // ------------------------------------------------------------------

    fn resolve(&self, id: NodeId) -> Result<DisplayState, CommandError> {
        if id == self.tree.root() {
            return Err(CommandError::Root);
        }
        self.tree.state(id).ok_or(CommandError::NodeNotFound(id))
    }

    fn resolve_leaf(&self, id: NodeId) -> Result<DisplayState, CommandError> {
        let state = self.resolve(id)?;
        let children = self.tree.children(id).len();
        if children > 0 {
            return Err(CommandError::NotLeaf { node: id, children });
        }
        Ok(state)
    }

    /// Apply a fallible single-node command to every target
    ///
    /// A single target reports its own success; a batch always succeeds and
    /// only logs rejected members.
    fn for_targets(
        &mut self,
        targets: Targets,
        command: &str,
        mut op: impl FnMut(&mut Self, NodeId) -> Result<bool, CommandError>,
    ) -> bool {
        match targets {
            Targets::One(id) => match op(self, id) {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("{} rejected: {}", command, e);
                    false
                }
            },
            Targets::Many(ids) => {
                for id in ids {
                    if let Err(e) = op(self, id) {
                        log::warn!("{} rejected for {}: {}", command, id, e);
                    }
                }
                true
            }
        }
    }

    // ------------------------------------------------------------------
    // Commands (single node, detailed result)
    // ------------------------------------------------------------------

    /// Display a node and its subtree
    ///
    /// `Ok(false)` when the node was already displayed.
    pub fn try_display(
        &mut self,
        id: NodeId,
        trigger: Option<Trigger>,
    ) -> Result<bool, CommandError> {
        if self.resolve(id)?.is_displayed() {
            return Ok(false);
        }
        self.propagator().display(id);
        let displayed = self.displayed.to_sorted_vec();
        self.emit(StateEvent::Display {
            node: id,
            displayed,
            trigger,
        });
        Ok(true)
    }

    /// Hide a node and its subtree
    pub fn try_hide(&mut self, id: NodeId, trigger: Option<Trigger>) -> Result<bool, CommandError> {
        if self.resolve(id)?.is_hidden() {
            return Ok(false);
        }
        self.propagator().hide(id);
        let displayed = self.displayed.to_sorted_vec();
        self.emit(StateEvent::Hide {
            node: id,
            displayed,
            trigger,
        });
        Ok(true)
    }

    /// Mark a leaf as loading
    pub fn try_loading(
        &mut self,
        id: NodeId,
        trigger: Option<Trigger>,
    ) -> Result<bool, CommandError> {
        if self.resolve_leaf(id)?.is_loading() {
            return Ok(false);
        }
        self.propagator().loading(id);
        let displayed = self.displayed.to_sorted_vec();
        self.emit(StateEvent::Loading {
            node: id,
            displayed,
            trigger,
        });
        Ok(true)
    }

    fn annotate(
        &mut self,
        id: NodeId,
        aux: AuxState,
        rationale: &str,
    ) -> Result<bool, CommandError> {
        if self.resolve_leaf(id)?.aux == aux {
            return Ok(false);
        }
        let rationale = match aux {
            AuxState::Normal => None,
            _ if rationale.is_empty() => None,
            _ => Some(rationale.to_owned()),
        };
        let policy = self.config.annotation_policy;
        self.propagator().annotate(id, aux, rationale.clone(), policy);
        let event = match aux {
            AuxState::Error => StateEvent::Error { node: id, rationale },
            AuxState::Info => StateEvent::Info { node: id, rationale },
            AuxState::Normal => StateEvent::Normal { node: id },
        };
        self.emit(event);
        Ok(true)
    }

    /// Flag a leaf (and its ancestors) as failed; an empty rationale means
    /// no tooltip
    pub fn try_error(&mut self, id: NodeId, rationale: &str) -> Result<bool, CommandError> {
        self.annotate(id, AuxState::Error, rationale)
    }

    /// Flag a leaf (and its ancestors) with an informational note
    pub fn try_info(&mut self, id: NodeId, rationale: &str) -> Result<bool, CommandError> {
        self.annotate(id, AuxState::Info, rationale)
    }

    /// Clear the annotation of a leaf (and its ancestors)
    pub fn try_normal(&mut self, id: NodeId) -> Result<bool, CommandError> {
        self.annotate(id, AuxState::Normal, "")
    }

    /// Set or clear the PMI flag of one node
    pub fn try_pmi(&mut self, id: NodeId, value: bool) -> Result<bool, CommandError> {
        if self.resolve(id)?.is_pmi() == value {
            return Ok(false);
        }
        self.propagator().pmi(id, value);
        self.emit(StateEvent::Pmi { node: id, value });
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Commands (single node or batch)
    // ------------------------------------------------------------------

    pub fn display_node(&mut self, targets: impl Into<Targets>) -> bool {
        self.for_targets(targets.into(), "display", |t, id| t.try_display(id, None))
    }

    pub fn hide_node(&mut self, targets: impl Into<Targets>) -> bool {
        self.for_targets(targets.into(), "hide", |t, id| t.try_hide(id, None))
    }

    pub fn loading_node(&mut self, targets: impl Into<Targets>) -> bool {
        self.for_targets(targets.into(), "loading", |t, id| t.try_loading(id, None))
    }

    pub fn error_node(&mut self, targets: impl Into<Targets>, rationale: &str) -> bool {
        self.for_targets(targets.into(), "error", |t, id| t.try_error(id, rationale))
    }

    pub fn info_node(&mut self, targets: impl Into<Targets>, rationale: &str) -> bool {
        self.for_targets(targets.into(), "info", |t, id| t.try_info(id, rationale))
    }

    pub fn normal_node(&mut self, targets: impl Into<Targets>) -> bool {
        self.for_targets(targets.into(), "normal", |t, id| t.try_normal(id))
    }

    pub fn pmi_node(&mut self, targets: impl Into<Targets>, value: bool) -> bool {
        self.for_targets(targets.into(), "pmi", |t, id| t.try_pmi(id, value))
    }

    /// Translate a geometry lifecycle change into a command
    pub fn geometry_changed(&mut self, id: NodeId, state: GeometryState) -> bool {
        let trigger = Some(Trigger::Geometry { state });
        let result = match state {
            GeometryState::Loading => self.try_loading(id, trigger),
            GeometryState::Completed => self.try_display(id, trigger),
            GeometryState::Failed => self.try_error(id, ""),
        };
        match result {
            Ok(_) => true,
            Err(e) => {
                log::warn!("geometry {:?} ignored: {}", state, e);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Activation
    // ------------------------------------------------------------------

    /// Handle a click on a tree row
    ///
    /// Only the state icon toggles visibility: hidden nodes get displayed,
    /// displayed and partly displayed nodes get hidden. Loading and disabled
    /// nodes reject the toggle.
    pub fn activate(
        &mut self,
        id: NodeId,
        target: ClickTarget,
    ) -> Result<Activation, CommandError> {
        let state = self.resolve(id)?;
        match target {
            ClickTarget::Label => Ok(Activation::Select),
            ClickTarget::AuxIcon => Ok(Activation::Ignored),
            ClickTarget::PmiIcon => {
                self.emit(StateEvent::ActivatePmi { node: id });
                Ok(Activation::Pmi)
            }
            ClickTarget::StateIcon => {
                if state.is_loading() || self.tree.is_disabled(id) {
                    return Err(CommandError::NotActivatable(id));
                }
                let trigger = Some(Trigger::Click { target });
                let displayed = if state.is_hidden() {
                    self.try_display(id, trigger)?;
                    true
                } else {
                    self.try_hide(id, trigger)?;
                    false
                };
                self.emit(StateEvent::Activate { node: id, displayed });
                Ok(Activation::Toggled { displayed })
            }
        }
    }

    // ------------------------------------------------------------------
    // Structural hooks
    // ------------------------------------------------------------------

    /// The host inserted `ids` under `parent`
    ///
    /// Ids that do not resolve are skipped.
    pub fn nodes_inserted(&mut self, parent: NodeId, ids: &[NodeId]) -> Result<(), TreeError> {
        if !self.tree.contains(parent) {
            return Err(TreeError::ParentNotFound(parent));
        }
        let known: Vec<NodeId> = ids
            .iter()
            .copied()
            .filter(|id| {
                let ok = self.tree.contains(*id);
                if !ok {
                    log::warn!("inserted node {} not found, skipped", id);
                }
                ok
            })
            .collect();
        log::debug!("attach {} node(s) under {}", known.len(), parent);
        if self.config.redraw_on_change {
            self.touched.extend(known.iter().copied());
        }
        self.propagator().attach(parent, &known);
        Ok(())
    }

    /// The host removed `ids` (whole subtrees) from below `parent`
    pub fn nodes_removed(&mut self, parent: NodeId, ids: &[NodeId]) {
        log::debug!("detach {} node(s) from {}", ids.len(), parent);
        self.propagator().detach(parent, ids);
    }

    /// The host re-rendered these rows; they need a fresh projection
    pub fn nodes_redrawn(&mut self, ids: &[NodeId]) {
        self.touched
            .extend(ids.iter().copied().filter(|id| self.tree.contains(*id)));
    }
}

/// Convenience paths for trackers that own a [`NodeArena`]
impl StateTracker<NodeArena> {
    /// Insert a node and run the attach rule for it
    pub fn insert_node(
        &mut self,
        parent: NodeId,
        label: impl Into<String>,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        let id = self.tree.insert(parent, label, kind)?;
        self.nodes_inserted(parent, &[id])?;
        Ok(id)
    }

    /// Load a described subtree under `parent`
    ///
    /// Leaves described as `loading` are marked loading after insertion.
    /// Returns the id of the subtree root.
    pub fn load_tree(&mut self, parent: NodeId, spec: &TreeSpec) -> Result<NodeId, TreeError> {
        let ids = self.tree.insert_spec(parent, spec)?;
        self.nodes_inserted(parent, &ids)?;

        let mut loading = Vec::new();
        collect_loading(spec, &ids, &mut 0, &mut loading);
        for id in loading {
            if let Err(e) = self.try_loading(id, None) {
                log::warn!("initial loading state ignored: {}", e);
            }
        }
        ids.first()
            .copied()
            .ok_or_else(|| TreeError::description("empty tree description"))
    }

    /// Remove a node with its subtree
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let parent = self.tree.parent(id);
        let removed = self.tree.remove(id)?;
        if let Some(parent) = parent {
            self.nodes_removed(parent, &removed);
        }
        Ok(removed)
    }

    /// Remove every node below the root
    pub fn clear(&mut self) {
        self.tree.clear();
        self.displayed.clear();
        self.touched.clear();
    }

    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) -> Result<(), TreeError> {
        self.tree.set_disabled(id, disabled)?;
        self.touched.insert(id);
        Ok(())
    }
}

/// Walk a description in the same pre-order `insert_spec` used
fn collect_loading(spec: &TreeSpec, ids: &[NodeId], cursor: &mut usize, out: &mut Vec<NodeId>) {
    let Some(&id) = ids.get(*cursor) else {
        return;
    };
    *cursor += 1;
    if spec.children.is_empty() && spec.state == Some(MainState::Loading) {
        out.push(id);
    }
    for child in &spec.children {
        collect_loading(child, ids, cursor, out);
    }
}
