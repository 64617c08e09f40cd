// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Propagation engine
//!
//! Each procedure updates one node, cascades down where the event requires
//! it, and then walks the ancestor chain toward the root. Ancestor walks
//! never include the root itself.

use crate::config::AnnotationPolicy;
use crate::tracked::DisplayedSet;
use rustc_hash::FxHashSet;
use sge_tree_model::{AuxState, DisplayState, MainState, NodeId, SceneTree};

/// Borrowed view over everything a propagation pass mutates
pub(crate) struct Propagator<'a, T: SceneTree> {
    pub tree: &'a mut T,
    pub displayed: &'a mut DisplayedSet,
    /// Nodes whose state changed, `None` when redraw tracking is off
    pub touched: Option<&'a mut FxHashSet<NodeId>>,
}

impl<'a, T: SceneTree> Propagator<'a, T> {
    fn current(&self, id: NodeId) -> DisplayState {
        self.tree.state(id).unwrap_or_default()
    }

    fn touch(&mut self, id: NodeId) {
        if let Some(touched) = self.touched.as_deref_mut() {
            touched.insert(id);
        }
    }

    /// Store a new state; returns whether it differs from the old one
    fn store(&mut self, id: NodeId, state: DisplayState) -> bool {
        let old = self.tree.state(id);
        if old == Some(state) {
            return false;
        }
        if !self.tree.set_state(id, state) {
            log::warn!("Cannot store state for unknown node {}", id);
            return false;
        }
        self.touch(id);
        true
    }

    /// Replace the main axis and keep the displayed set in step with it
    fn set_main(&mut self, id: NodeId, main: MainState) -> bool {
        let state = self.current(id).with_main(main);
        if main == MainState::Displayed {
            self.displayed.insert(id);
        } else {
            self.displayed.remove(id);
        }
        self.store(id, state)
    }

    /// Set `main` on the node and every descendant
    fn cascade(&mut self, id: NodeId, main: MainState) -> usize {
        let mut count = 1;
        self.set_main(id, main);
        for node in self.tree.descendants(id) {
            self.set_main(node, main);
            count += 1;
        }
        count
    }

    /// Main state implied by the immediate children (display rule)
    ///
    /// All displayed wins; otherwise a loading child wins; otherwise any
    /// displayed or partly displayed child gives partly displayed; otherwise
    /// hidden. `None` for nodes without children.
    fn aggregate(&self, id: NodeId) -> Option<MainState> {
        let children = self.tree.children(id);
        if children.is_empty() {
            return None;
        }
        let mut displayed_count = 0;
        let mut has_partly = false;
        for child in children {
            let state = self.current(*child);
            if state.is_loading() {
                return Some(MainState::Loading);
            }
            if state.is_displayed() {
                displayed_count += 1;
            }
            has_partly = has_partly || state.is_partly_displayed();
        }
        Some(if displayed_count == children.len() {
            MainState::Displayed
        } else if displayed_count > 0 || has_partly {
            MainState::PartlyDisplayed
        } else {
            MainState::Hidden
        })
    }

    fn all_children(&self, id: NodeId, pred: impl Fn(&DisplayState) -> bool) -> bool {
        self.tree
            .children(id)
            .iter()
            .all(|child| pred(&self.current(*child)))
    }

    /// Re-aggregate `start` and its ancestors, stopping at the first level
    /// whose state does not change
    fn settle_upward(&mut self, start: NodeId) {
        let root = self.tree.root();
        let mut current = Some(start);
        while let Some(id) = current {
            if id == root {
                break;
            }
            let Some(main) = self.aggregate(id) else {
                break;
            };
            if self.current(id).main == main {
                break;
            }
            log::trace!("settle {} -> {}", id, main.label());
            self.set_main(id, main);
            current = self.tree.parent(id);
        }
    }

    /// New nodes were inserted under `parent`
    pub fn attach(&mut self, parent: NodeId, inserted: &[NodeId]) {
        let root = self.tree.root();
        let parent_displayed = parent != root && self.current(parent).is_displayed();

        // apply down
        if parent_displayed {
            for id in inserted {
                self.cascade(*id, MainState::Displayed);
            }
        } else {
            for id in inserted {
                if self.current(*id).is_displayed() {
                    self.cascade(*id, MainState::Displayed);
                }
            }
        }

        // apply up, starting from the parents of every leaf below `parent`
        let mut seen = FxHashSet::default();
        let mut leaf_parents = Vec::new();
        for node in self.tree.descendants(parent) {
            if self.tree.is_leaf(node) {
                if let Some(p) = self.tree.parent(node) {
                    if seen.insert(p) {
                        leaf_parents.push(p);
                    }
                }
            }
        }
        // only the inserted subtrees and the chain above them get re-aggregated
        let mut chain: FxHashSet<NodeId> = FxHashSet::default();
        chain.insert(parent);
        chain.extend(self.tree.ancestors(parent));
        for id in inserted {
            chain.insert(*id);
            chain.extend(self.tree.descendants(*id));
        }

        for start in leaf_parents {
            let mut current = Some(start);
            while let Some(id) = current {
                if id == root {
                    break;
                }
                if self.all_children(id, DisplayState::is_displayed) {
                    self.set_main(id, MainState::Displayed);
                    current = self.tree.parent(id);
                } else {
                    if chain.contains(&id) {
                        self.settle_upward(id);
                    }
                    break;
                }
            }
        }
    }

    /// Nodes were removed from below `parent`
    pub fn detach(&mut self, parent: NodeId, removed: &[NodeId]) {
        for id in removed {
            self.displayed.remove(*id);
            if let Some(touched) = self.touched.as_deref_mut() {
                touched.remove(id);
            }
        }
        self.settle_upward(parent);
    }

    /// Show a node: cascade down, then recompute every ancestor
    pub fn display(&mut self, id: NodeId) {
        let count = self.cascade(id, MainState::Displayed);
        log::debug!("display {}: {} node(s) displayed", id, count);

        for ancestor in self.tree.ancestors(id) {
            if let Some(main) = self.aggregate(ancestor) {
                log::trace!("display: ancestor {} -> {}", ancestor, main.label());
                self.set_main(ancestor, main);
            }
        }
    }

    /// Hide a node: cascade down, then hide or partly display ancestors
    pub fn hide(&mut self, id: NodeId) {
        let count = self.cascade(id, MainState::Hidden);
        log::debug!("hide {}: {} node(s) hidden", id, count);

        for ancestor in self.tree.ancestors(id) {
            self.displayed.remove(ancestor);
            let state = self.current(ancestor);
            if self.all_children(ancestor, DisplayState::is_hidden) {
                self.set_main(ancestor, MainState::Hidden);
            } else if state.is_displayed() {
                self.set_main(ancestor, MainState::PartlyDisplayed);
            }
        }
    }

    /// Mark a leaf loading; loading always wins on the way up
    pub fn loading(&mut self, id: NodeId) {
        self.set_main(id, MainState::Loading);
        let ancestors = self.tree.ancestors(id);
        log::debug!("loading {}: {} ancestor(s)", id, ancestors.len());
        for ancestor in ancestors {
            self.set_main(ancestor, MainState::Loading);
        }
    }

    /// Set the auxiliary axis on a leaf and propagate it upward
    pub fn annotate(
        &mut self,
        id: NodeId,
        aux: AuxState,
        rationale: Option<String>,
        policy: AnnotationPolicy,
    ) {
        let state = self.current(id).with_aux(aux);
        self.store(id, state);
        self.tree.set_rationale(id, rationale.clone());
        self.touch(id);

        let ancestors = self.tree.ancestors(id);
        log::debug!(
            "{} {}: {} ancestor(s), {:?}",
            aux.label(),
            id,
            ancestors.len(),
            policy
        );
        for ancestor in ancestors {
            let (aux, rationale) = match policy {
                AnnotationPolicy::Broadcast => (aux, rationale.clone()),
                AnnotationPolicy::Reconcile => self.reconcile(ancestor),
            };
            let state = self.current(ancestor).with_aux(aux);
            self.store(ancestor, state);
            self.tree.set_rationale(ancestor, rationale);
            self.touch(ancestor);
        }
    }

    /// Auxiliary state implied by the immediate children
    fn reconcile(&self, id: NodeId) -> (AuxState, Option<String>) {
        let children = self.tree.children(id);
        let pick = |aux: AuxState| {
            children
                .iter()
                .find(|child| self.current(**child).aux == aux)
                .map(|child| self.tree.rationale(*child).map(str::to_owned))
        };
        if let Some(rationale) = pick(AuxState::Error) {
            (AuxState::Error, rationale)
        } else if let Some(rationale) = pick(AuxState::Info) {
            (AuxState::Info, rationale)
        } else {
            (AuxState::Normal, None)
        }
    }

    /// Flip the PMI flag of a single node
    pub fn pmi(&mut self, id: NodeId, value: bool) {
        let state = self.current(id).make_pmi(value);
        self.store(id, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::NodeArena;
    use sge_tree_model::NodeKind;

    struct Fixture {
        tree: NodeArena,
        displayed: DisplayedSet,
        touched: FxHashSet<NodeId>,
    }

    impl Fixture {
        /// root -> a -> {b -> {d, e}, c}
        fn new() -> (Self, [NodeId; 5]) {
            let mut tree = NodeArena::new();
            let a = tree.insert(NodeId::ROOT, "a", NodeKind::Assembly).unwrap();
            let b = tree.insert(a, "b", NodeKind::Assembly).unwrap();
            let c = tree.insert(a, "c", NodeKind::Part).unwrap();
            let d = tree.insert(b, "d", NodeKind::Part).unwrap();
            let e = tree.insert(b, "e", NodeKind::Part).unwrap();
            (
                Self {
                    tree,
                    displayed: DisplayedSet::new(),
                    touched: FxHashSet::default(),
                },
                [a, b, c, d, e],
            )
        }

        fn run(&mut self, f: impl FnOnce(&mut Propagator<'_, NodeArena>)) {
            let mut p = Propagator {
                tree: &mut self.tree,
                displayed: &mut self.displayed,
                touched: Some(&mut self.touched),
            };
            f(&mut p);
        }

        fn main(&self, id: NodeId) -> MainState {
            self.tree.state(id).unwrap().main
        }
    }

    #[test]
    fn test_display_leaf_partly_displays_ancestors() {
        let (mut fx, [a, b, c, d, _e]) = Fixture::new();
        fx.run(|p| p.display(d));
        assert_eq!(fx.main(d), MainState::Displayed);
        assert_eq!(fx.main(b), MainState::PartlyDisplayed);
        assert_eq!(fx.main(a), MainState::PartlyDisplayed);
        assert_eq!(fx.main(c), MainState::Hidden);
        assert_eq!(fx.displayed.to_sorted_vec(), vec![d]);
        assert!(fx.touched.contains(&a) && fx.touched.contains(&b) && fx.touched.contains(&d));
    }

    #[test]
    fn test_display_branch_cascades() {
        let (mut fx, [a, b, c, d, e]) = Fixture::new();
        fx.run(|p| p.display(b));
        assert_eq!(fx.main(d), MainState::Displayed);
        assert_eq!(fx.main(e), MainState::Displayed);
        assert_eq!(fx.main(a), MainState::PartlyDisplayed);
        fx.run(|p| p.display(c));
        assert_eq!(fx.main(a), MainState::Displayed);
        assert_eq!(fx.displayed.len(), 5);
    }

    #[test]
    fn test_display_with_loading_sibling() {
        let (mut fx, [a, b, _c, d, e]) = Fixture::new();
        fx.run(|p| p.loading(e));
        fx.run(|p| p.display(d));
        assert_eq!(fx.main(b), MainState::Loading);
        assert_eq!(fx.main(a), MainState::Loading);
        assert!(!fx.displayed.contains(b));
    }

    #[test]
    fn test_hide_keeps_partly_or_hides() {
        let (mut fx, [a, b, c, d, e]) = Fixture::new();
        fx.run(|p| p.display(a));
        fx.run(|p| p.hide(d));
        assert_eq!(fx.main(b), MainState::PartlyDisplayed);
        assert_eq!(fx.main(a), MainState::PartlyDisplayed);
        assert!(!fx.displayed.contains(a));
        assert!(!fx.displayed.contains(b));

        fx.run(|p| p.hide(e));
        assert_eq!(fx.main(b), MainState::Hidden);
        // c still displayed, a was already partly displayed
        assert_eq!(fx.main(a), MainState::PartlyDisplayed);

        fx.run(|p| p.hide(c));
        assert_eq!(fx.main(a), MainState::Hidden);
        assert!(fx.displayed.is_empty());
    }

    #[test]
    fn test_loading_wins_upward() {
        let (mut fx, [a, b, c, d, _e]) = Fixture::new();
        fx.run(|p| p.display(a));
        fx.run(|p| p.loading(d));
        assert_eq!(fx.main(d), MainState::Loading);
        assert_eq!(fx.main(b), MainState::Loading);
        assert_eq!(fx.main(a), MainState::Loading);
        assert_eq!(fx.main(c), MainState::Displayed);
        assert!(!fx.displayed.contains(a));
        assert!(!fx.displayed.contains(d));
    }

    #[test]
    fn test_annotate_broadcast_last_writer_wins() {
        let (mut fx, [a, b, c, d, _e]) = Fixture::new();
        let policy = AnnotationPolicy::Broadcast;
        fx.run(|p| p.annotate(d, AuxState::Error, Some("bad".into()), policy));
        assert!(fx.tree.state(b).unwrap().is_error());
        assert_eq!(fx.tree.rationale(a), Some("bad"));

        fx.run(|p| p.annotate(c, AuxState::Normal, None, policy));
        // sibling branch clears the error on the shared ancestor
        assert!(fx.tree.state(a).unwrap().is_normal());
        assert!(fx.tree.state(b).unwrap().is_error());
        assert_eq!(fx.tree.rationale(a), None);
    }

    #[test]
    fn test_annotate_reconcile() {
        let (mut fx, [a, b, c, d, _e]) = Fixture::new();
        let policy = AnnotationPolicy::Reconcile;
        fx.run(|p| p.annotate(d, AuxState::Error, Some("bad".into()), policy));
        fx.run(|p| p.annotate(c, AuxState::Info, Some("note".into()), policy));
        assert!(fx.tree.state(a).unwrap().is_error());
        assert_eq!(fx.tree.rationale(a), Some("bad"));

        fx.run(|p| p.annotate(d, AuxState::Normal, None, policy));
        assert!(fx.tree.state(b).unwrap().is_normal());
        assert!(fx.tree.state(a).unwrap().is_info());
        assert_eq!(fx.tree.rationale(a), Some("note"));
    }

    #[test]
    fn test_attach_under_displayed_parent() {
        let (mut fx, [a, b, _c, _d, _e]) = Fixture::new();
        fx.run(|p| p.display(a));
        let f = fx.tree.insert(b, "f", NodeKind::Part).unwrap();
        fx.run(|p| p.attach(b, &[f]));
        assert_eq!(fx.main(f), MainState::Displayed);
        assert!(fx.displayed.contains(f));
        assert_eq!(fx.main(b), MainState::Displayed);
    }

    #[test]
    fn test_attach_prior_displayed_subtree_climbs() {
        let (mut fx, [a, _b, c, _d, _e]) = Fixture::new();
        // c displayed, b hidden; insert a displayed leaf under c
        fx.run(|p| p.display(c));
        let g = fx.tree.insert(c, "g", NodeKind::Part).unwrap();
        fx.run(|p| p.attach(c, &[g]));
        assert_eq!(fx.main(g), MainState::Displayed);
        assert_eq!(fx.main(c), MainState::Displayed);
        assert_eq!(fx.main(a), MainState::PartlyDisplayed);
    }

    #[test]
    fn test_attach_displayed_node_under_hidden_parent() {
        let (mut fx, [a, b, _c, _d, _e]) = Fixture::new();
        let h = fx.tree.insert(b, "h", NodeKind::Assembly).unwrap();
        let i = fx.tree.insert(h, "i", NodeKind::Part).unwrap();
        let state = fx.tree.state(h).unwrap().make_displayed();
        fx.tree.set_state(h, state);
        fx.run(|p| p.attach(b, &[h, i]));
        assert_eq!(fx.main(i), MainState::Displayed);
        assert!(fx.displayed.contains(h) && fx.displayed.contains(i));
        // b has hidden siblings of h, so it settles to partly displayed
        assert_eq!(fx.main(b), MainState::PartlyDisplayed);
        assert_eq!(fx.main(a), MainState::PartlyDisplayed);
    }

    #[test]
    fn test_attach_leaves_unrelated_branch_alone() {
        let (mut fx, [a, b, c, d, e]) = Fixture::new();
        // a stays loading after c is displayed and b hidden
        fx.run(|p| p.loading(d));
        fx.run(|p| p.display(c));
        fx.run(|p| p.hide(b));
        assert_eq!(fx.main(a), MainState::Loading);
        assert_eq!(fx.main(e), MainState::Hidden);

        fx.touched.clear();
        let x = fx.tree.insert(NodeId::ROOT, "x", NodeKind::Part).unwrap();
        fx.run(|p| p.attach(NodeId::ROOT, &[x]));
        assert_eq!(fx.main(a), MainState::Loading);
        assert_eq!(fx.main(b), MainState::Hidden);
        assert!(!fx.touched.contains(&a));
    }

    #[test]
    fn test_detach_resettles_parent() {
        let (mut fx, [a, b, _c, d, e]) = Fixture::new();
        fx.run(|p| p.display(d));
        fx.run(|p| p.display(a));
        fx.run(|p| p.hide(e));
        assert_eq!(fx.main(b), MainState::PartlyDisplayed);
        let removed = fx.tree.remove(e).unwrap();
        fx.run(|p| p.detach(b, &removed));
        assert_eq!(fx.main(b), MainState::Displayed);
        assert_eq!(fx.main(a), MainState::Displayed);
        assert!(fx.displayed.contains(a));
    }

    #[test]
    fn test_pmi_does_not_propagate() {
        let (mut fx, [a, b, _c, d, _e]) = Fixture::new();
        fx.run(|p| p.pmi(d, true));
        assert!(fx.tree.state(d).unwrap().is_pmi());
        assert!(!fx.tree.state(b).unwrap().is_pmi());
        assert!(!fx.tree.state(a).unwrap().is_pmi());
    }
}
