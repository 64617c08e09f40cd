// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracked-displayed set

use rustc_hash::FxHashSet;
use sge_tree_model::NodeId;

/// Ids of every node currently in the `Displayed` main state
///
/// Updated incrementally by the propagation engine; uniqueness holds by
/// construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayedSet {
    ids: FxHashSet<NodeId>,
}

impl DisplayedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not tracked yet
    pub fn insert(&mut self, id: NodeId) -> bool {
        self.ids.insert(id)
    }

    /// Returns `true` if the id was tracked
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Snapshot in ascending id order
    pub fn to_sorted_vec(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Extend<NodeId> for DisplayedSet {
    fn extend<I: IntoIterator<Item = NodeId>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl FromIterator<NodeId> for DisplayedSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_duplicate_free() {
        let mut set = DisplayedSet::new();
        assert!(set.insert(NodeId(3)));
        assert!(!set.insert(NodeId(3)));
        set.extend([NodeId(1), NodeId(3), NodeId(2)]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.to_sorted_vec(), vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_remove() {
        let mut set: DisplayedSet = [NodeId(1), NodeId(2)].into_iter().collect();
        assert!(set.remove(NodeId(1)));
        assert!(!set.remove(NodeId(1)));
        assert!(!set.contains(NodeId(1)));
        assert!(set.contains(NodeId(2)));
        set.clear();
        assert!(set.is_empty());
    }
}
