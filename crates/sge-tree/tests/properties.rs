// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Randomised checks over generated trees and command sequences

use proptest::prelude::*;
use sge_tree::{NodeArena, StateTracker};
use sge_tree_model::{DisplayState, NodeId, NodeKind, SceneTree};

#[derive(Clone, Debug)]
enum Command {
    Display(usize),
    Hide(usize),
    Loading(usize),
    Error(usize),
    Normal(usize),
}

/// Node `i` hangs under an earlier node picked by `parents[i]`
fn build(parents: &[usize]) -> (StateTracker<NodeArena>, Vec<NodeId>) {
    let mut tracker = StateTracker::new(NodeArena::new());
    let mut ids = vec![NodeId::ROOT];
    for (i, pick) in parents.iter().enumerate() {
        let parent = ids[pick % (i + 1)];
        let id = tracker
            .insert_node(parent, format!("n{i}"), NodeKind::Part)
            .unwrap();
        ids.push(id);
    }
    ids.remove(0);
    (tracker, ids)
}

fn tree_shape() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..64, 1..24)
}

fn visibility_commands() -> impl Strategy<Value = Vec<Command>> {
    prop::collection::vec(
        prop_oneof![
            (0usize..64).prop_map(Command::Display),
            (0usize..64).prop_map(Command::Hide),
        ],
        0..32,
    )
}

fn any_commands() -> impl Strategy<Value = Vec<Command>> {
    prop::collection::vec(
        prop_oneof![
            (0usize..64).prop_map(Command::Display),
            (0usize..64).prop_map(Command::Hide),
            (0usize..64).prop_map(Command::Loading),
            (0usize..64).prop_map(Command::Error),
            (0usize..64).prop_map(Command::Normal),
        ],
        0..32,
    )
}

fn apply(tracker: &mut StateTracker<NodeArena>, ids: &[NodeId], command: &Command) {
    let pick = |i: usize| ids[i % ids.len()];
    match command {
        Command::Display(i) => {
            tracker.display_node(pick(*i));
        }
        Command::Hide(i) => {
            tracker.hide_node(pick(*i));
        }
        Command::Loading(i) => {
            tracker.loading_node(pick(*i));
        }
        Command::Error(i) => {
            tracker.error_node(pick(*i), "failed");
        }
        Command::Normal(i) => {
            tracker.normal_node(pick(*i));
        }
    }
}

fn exactly_one(flags: &[bool]) -> bool {
    flags.iter().filter(|f| **f).count() == 1
}

proptest! {
    #[test]
    fn test_states_stay_exclusive_and_tracked(shape in tree_shape(), commands in any_commands()) {
        let (mut tracker, ids) = build(&shape);
        for command in &commands {
            apply(&mut tracker, &ids, command);
        }
        for id in &ids {
            let s: DisplayState = tracker.state(*id).unwrap();
            prop_assert!(exactly_one(&[
                s.is_hidden(),
                s.is_partly_displayed(),
                s.is_loading(),
                s.is_displayed(),
            ]));
            prop_assert!(exactly_one(&[s.is_normal(), s.is_info(), s.is_error()]));
            prop_assert_eq!(tracker.displayed().contains(*id), s.is_displayed());
        }
        prop_assert!(!tracker.displayed().contains(NodeId::ROOT));
    }

    #[test]
    fn test_display_covers_subtree(
        shape in tree_shape(),
        commands in visibility_commands(),
        target in 0usize..64,
    ) {
        let (mut tracker, ids) = build(&shape);
        for command in &commands {
            apply(&mut tracker, &ids, command);
        }
        let node = ids[target % ids.len()];
        tracker.display_node(node);
        prop_assert!(tracker.is_displayed(node));
        for id in tracker.tree().descendants(node) {
            prop_assert!(tracker.is_displayed(id));
            prop_assert!(tracker.displayed().contains(id));
        }
    }

    #[test]
    fn test_hide_clears_subtree(
        shape in tree_shape(),
        commands in any_commands(),
        target in 0usize..64,
    ) {
        let (mut tracker, ids) = build(&shape);
        for command in &commands {
            apply(&mut tracker, &ids, command);
        }
        let node = ids[target % ids.len()];
        tracker.hide_node(node);
        prop_assert!(tracker.is_hidden(node));
        for id in tracker.tree().descendants(node) {
            prop_assert!(tracker.is_hidden(id));
            prop_assert!(!tracker.displayed().contains(id));
        }
    }

    #[test]
    fn test_ancestors_follow_children(shape in tree_shape(), commands in visibility_commands()) {
        let (mut tracker, ids) = build(&shape);
        for command in &commands {
            apply(&mut tracker, &ids, command);
        }
        for id in &ids {
            let children = tracker.tree().children(*id);
            if children.is_empty() {
                continue;
            }
            let all_displayed = children.iter().all(|c| tracker.is_displayed(*c));
            let all_hidden = children.iter().all(|c| tracker.is_hidden(*c));
            prop_assert_eq!(tracker.is_displayed(*id), all_displayed);
            prop_assert_eq!(tracker.is_hidden(*id), all_hidden);
        }
    }

    #[test]
    fn test_loading_reaches_top(
        shape in tree_shape(),
        commands in any_commands(),
        target in 0usize..64,
    ) {
        let (mut tracker, ids) = build(&shape);
        for command in &commands {
            apply(&mut tracker, &ids, command);
        }
        let leaves: Vec<NodeId> = ids
            .iter()
            .copied()
            .filter(|id| tracker.tree().is_leaf(*id))
            .collect();
        let leaf = leaves[target % leaves.len()];
        tracker.loading_node(leaf);
        prop_assert!(tracker.is_loading(leaf));
        for id in tracker.tree().ancestors(leaf) {
            prop_assert!(tracker.is_loading(id));
        }
    }
}
