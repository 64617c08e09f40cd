// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Applying projections to rendered rows
//!
//! [`RenderTarget`] abstracts one row element. Applying a projection first
//! strips every state class and optional icon, so rendering the same state
//! twice leaves the row exactly as rendering it once.

use crate::classes::ClassNames;
use crate::projection::{project_node, Icon, IconSlot, Projection};
use sge_tree::StateTracker;
use sge_tree_model::{NodeId, SceneTree};
use std::collections::{BTreeMap, BTreeSet};

/// A rendered tree row (or the tree container)
pub trait RenderTarget {
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
    /// Create or update the icon in `slot`
    fn set_icon(&mut self, slot: IconSlot, class: &str, tooltip: Option<&str>);
    fn remove_icon(&mut self, slot: IconSlot);
}

/// Render a projection onto a row
pub fn apply(target: &mut impl RenderTarget, projection: &Projection, names: &ClassNames) {
    for class in names.state_classes() {
        target.remove_class(class);
    }
    for class in projection.class_names(names) {
        target.add_class(class);
    }
    set_optional_icon(target, IconSlot::Aux, projection.aux_icon.as_ref(), names);
    set_optional_icon(target, IconSlot::Pmi, projection.pmi_icon.as_ref(), names);
    let state_icon = &projection.state_icon;
    target.set_icon(
        IconSlot::State,
        &state_icon.class_attr(names),
        state_icon.tooltip.as_deref(),
    );
}

fn set_optional_icon(
    target: &mut impl RenderTarget,
    slot: IconSlot,
    icon: Option<&Icon>,
    names: &ClassNames,
) {
    match icon {
        Some(icon) => target.set_icon(slot, &icon.class_attr(names), icon.tooltip.as_deref()),
        None => target.remove_icon(slot),
    }
}

/// Remove every state class and icon from a row
pub fn strip(target: &mut impl RenderTarget, names: &ClassNames) {
    for class in names.state_classes() {
        target.remove_class(class);
    }
    for slot in [IconSlot::State, IconSlot::Aux, IconSlot::Pmi] {
        target.remove_icon(slot);
    }
}

/// Show or hide the state icons of a whole tree
pub fn apply_icon_visibility(container: &mut impl RenderTarget, visible: bool, names: &ClassNames) {
    if visible {
        container.remove_class(&names.no_state_icons);
    } else {
        container.add_class(&names.no_state_icons);
    }
}

/// In-memory row, used by headless hosts and tests
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryElement {
    pub classes: BTreeSet<String>,
    /// Icon class attribute and tooltip per slot
    pub icons: BTreeMap<IconSlot, (String, Option<String>)>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn tooltip(&self, slot: IconSlot) -> Option<&str> {
        self.icons.get(&slot).and_then(|(_, t)| t.as_deref())
    }
}

impl RenderTarget for MemoryElement {
    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_owned());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    fn set_icon(&mut self, slot: IconSlot, class: &str, tooltip: Option<&str>) {
        self.icons
            .insert(slot, (class.to_owned(), tooltip.map(str::to_owned)));
    }

    fn remove_icon(&mut self, slot: IconSlot) {
        self.icons.remove(&slot);
    }
}

/// Projects tracker state onto rows
#[derive(Clone, Debug, Default)]
pub struct TreeRenderer {
    names: ClassNames,
}

impl TreeRenderer {
    pub fn new(names: ClassNames) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &ClassNames {
        &self.names
    }

    /// Render one node; `false` for the root and unknown ids
    pub fn render<T: SceneTree>(
        &self,
        tree: &T,
        id: NodeId,
        target: &mut impl RenderTarget,
    ) -> bool {
        if id == tree.root() {
            return false;
        }
        match project_node(tree, id) {
            Some(projection) => {
                apply(target, &projection, &self.names);
                true
            }
            None => false,
        }
    }

    /// Re-render every node whose state changed since the last sync
    ///
    /// `resolve` maps a node to its row; nodes without a row are skipped.
    /// Returns the number of rows rendered.
    pub fn sync<T, E, F>(&self, tracker: &mut StateTracker<T>, mut resolve: F) -> usize
    where
        T: SceneTree,
        E: RenderTarget,
        F: FnMut(NodeId) -> Option<E>,
    {
        let touched = tracker.take_touched();
        let mut rendered = 0;
        for id in touched {
            let Some(mut row) = resolve(id) else {
                log::trace!("no row for {}", id);
                continue;
            };
            if self.render(tracker.tree(), id, &mut row) {
                rendered += 1;
            }
        }
        log::debug!("synced {} row(s)", rendered);
        rendered
    }
}
