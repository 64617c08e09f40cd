// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end walkthroughs of the tracker on small assemblies

use sge_tree::{
    Activation, AnnotationPolicy, ClickTarget, NodeArena, StateEvent, StateTracker,
    TrackerConfig, TreeSpec,
};
use sge_tree_model::{GeometryState, MainState, NodeId, NodeKind, SceneTree};
use std::cell::RefCell;
use std::rc::Rc;

/// A{B, C}
fn assembly() -> (StateTracker<NodeArena>, NodeId, NodeId, NodeId) {
    let mut tracker = StateTracker::new(NodeArena::new());
    let a = tracker
        .insert_node(NodeId::ROOT, "A", NodeKind::Assembly)
        .unwrap();
    let b = tracker.insert_node(a, "B", NodeKind::Part).unwrap();
    let c = tracker.insert_node(a, "C", NodeKind::Part).unwrap();
    (tracker, a, b, c)
}

#[test]
fn test_display_hide_walkthrough() {
    let (mut tracker, a, b, c) = assembly();

    assert!(tracker.display_node(b));
    assert!(tracker.is_displayed(b));
    assert!(tracker.is_partly_displayed(a));
    assert!(tracker.is_hidden(c));
    assert_eq!(tracker.displayed().to_sorted_vec(), vec![b]);

    assert!(tracker.display_node(c));
    assert!(tracker.is_displayed(c));
    assert!(tracker.is_displayed(a));
    assert_eq!(tracker.displayed().to_sorted_vec(), vec![a, b, c]);

    assert!(tracker.hide_node(b));
    assert!(tracker.is_hidden(b));
    assert!(tracker.is_partly_displayed(a));
    assert_eq!(tracker.displayed().to_sorted_vec(), vec![c]);
}

#[test]
fn test_loading_leaf() {
    let mut tracker = StateTracker::new(NodeArena::new());
    let a = tracker
        .insert_node(NodeId::ROOT, "A", NodeKind::Assembly)
        .unwrap();
    let l = tracker.insert_node(a, "L", NodeKind::Part).unwrap();
    tracker.display_node(a);
    assert_eq!(tracker.displayed().len(), 2);

    assert!(tracker.loading_node(l));
    assert!(tracker.is_loading(l));
    assert!(tracker.is_loading(a));
    assert!(tracker.displayed().is_empty());
}

#[test]
fn test_error_reaches_top() {
    let mut tracker = StateTracker::new(NodeArena::new());
    let top = tracker
        .insert_node(NodeId::ROOT, "Top", NodeKind::File)
        .unwrap();
    let p = tracker.insert_node(top, "P", NodeKind::Assembly).unwrap();
    let l = tracker.insert_node(p, "L", NodeKind::Part).unwrap();

    assert!(tracker.error_node(l, "load failed"));
    for id in [l, p, top] {
        assert!(tracker.state(id).unwrap().is_error());
        assert_eq!(tracker.rationale(id), Some("load failed"));
    }
    // the root is never annotated
    assert!(tracker.state(NodeId::ROOT).unwrap().is_normal());
}

#[test]
fn test_insert_under_displayed_node() {
    let (mut tracker, a, b, _c) = assembly();
    tracker.display_node(a);
    let before = tracker.state(a);

    let d = tracker.insert_node(a, "D", NodeKind::Part).unwrap();
    assert!(tracker.is_displayed(d));
    assert!(tracker.displayed().contains(d));
    assert_eq!(tracker.state(a), before);

    // nested insert keeps cascading
    let e = tracker.insert_node(b, "E", NodeKind::Part).unwrap();
    assert!(tracker.is_displayed(e));
    assert!(tracker.is_displayed(b));
}

#[test]
fn test_leaf_only_guard_leaves_state_untouched() {
    let (mut tracker, a, b, _c) = assembly();
    tracker.display_node(b);
    let before = tracker.state(a);
    let events = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&events);
    tracker.subscribe(move |_| *sink.borrow_mut() += 1);

    assert!(!tracker.loading_node(a));
    assert!(!tracker.error_node(a, "x"));
    assert!(!tracker.info_node(a, "x"));
    assert!(!tracker.normal_node(a));
    assert_eq!(tracker.state(a), before);
    assert_eq!(tracker.rationale(a), None);
    assert_eq!(*events.borrow(), 0);
}

#[test]
fn test_root_guard() {
    let (mut tracker, a, b, c) = assembly();
    assert!(!tracker.display_node(NodeId::ROOT));
    assert!(!tracker.hide_node(NodeId::ROOT));
    for id in [a, b, c] {
        assert!(tracker.is_hidden(id));
    }
    assert!(tracker.displayed().is_empty());
}

#[test]
fn test_notifications_in_emission_order() {
    let (mut tracker, a, b, c) = assembly();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    tracker.subscribe(move |e: &StateEvent| sink.borrow_mut().push((e.name(), e.node())));

    tracker.display_node(vec![b, c]);
    tracker.loading_node(b);
    tracker.info_node(c, "cached");
    tracker.pmi_node(a, true);

    assert_eq!(
        *log.borrow(),
        vec![
            ("display", b),
            ("display", c),
            ("loading", b),
            ("info", c),
            ("pmi", a),
        ]
    );
}

#[test]
fn test_sibling_normal_clears_shared_ancestor() {
    let (mut tracker, a, b, c) = assembly();
    tracker.error_node(b, "bad mesh");
    tracker.normal_node(c);
    // normal on c was already normal: no change, ancestor keeps the error
    assert!(tracker.state(a).unwrap().is_error());

    tracker.info_node(c, "note");
    tracker.normal_node(c);
    assert!(tracker.state(a).unwrap().is_normal());
    assert!(tracker.state(b).unwrap().is_error());
}

#[test]
fn test_reconcile_policy_keeps_sibling_error() {
    let config = TrackerConfig {
        annotation_policy: AnnotationPolicy::Reconcile,
        ..Default::default()
    };
    let mut tracker = StateTracker::with_config(NodeArena::new(), config);
    let a = tracker
        .insert_node(NodeId::ROOT, "A", NodeKind::Assembly)
        .unwrap();
    let b = tracker.insert_node(a, "B", NodeKind::Part).unwrap();
    let c = tracker.insert_node(a, "C", NodeKind::Part).unwrap();

    tracker.error_node(b, "bad mesh");
    tracker.info_node(c, "note");
    tracker.normal_node(c);
    assert!(tracker.state(a).unwrap().is_error());
    assert_eq!(tracker.rationale(a), Some("bad mesh"));

    tracker.normal_node(b);
    assert!(tracker.state(a).unwrap().is_normal());
}

#[test]
fn test_viewer_loading_flow() {
    let json = r#"{
        "label": "gearbox.stp",
        "kind": "file",
        "children": [
            { "label": "Housing", "kind": "part", "state": "loading" },
            { "label": "Shafts", "kind": "assembly", "children": [
                { "label": "Input shaft", "kind": "part", "state": "loading" },
                { "label": "Output shaft", "kind": "part", "state": "loading", "pmi": true }
            ] }
        ]
    }"#;
    let spec = TreeSpec::from_json(json).unwrap();
    let mut tracker = StateTracker::new(NodeArena::new());
    let file = tracker.load_tree(NodeId::ROOT, &spec).unwrap();

    let parts = tracker.tree().part_leaves(file);
    assert_eq!(parts.len(), 3);
    assert!(tracker.is_loading(file));

    for part in &parts {
        assert!(tracker.geometry_changed(*part, GeometryState::Completed));
    }
    assert!(tracker.is_displayed(file));
    assert_eq!(tracker.displayed().len(), 5);

    let output = parts[2];
    assert!(tracker.state(output).unwrap().is_pmi());
    assert_eq!(
        tracker.activate(output, ClickTarget::StateIcon),
        Ok(Activation::Toggled { displayed: false })
    );
    assert!(tracker.is_partly_displayed(file));
    assert_eq!(
        tracker.state(tracker.tree().parent(output).unwrap()).unwrap().main,
        MainState::PartlyDisplayed
    );
}

#[test]
fn test_failed_geometry_keeps_others_loading() {
    let spec = TreeSpec::new("asm", NodeKind::Assembly)
        .with_child(TreeSpec::new("bolt", NodeKind::Part).with_state(MainState::Loading))
        .with_child(TreeSpec::new("cracked", NodeKind::Part).with_state(MainState::Loading));
    let mut tracker = StateTracker::new(NodeArena::new());
    let asm = tracker.load_tree(NodeId::ROOT, &spec).unwrap();
    let ok = tracker.tree().search("bolt")[0];
    let broken = tracker.tree().search("cracked")[0];

    tracker.geometry_changed(broken, GeometryState::Failed);
    assert!(tracker.state(asm).unwrap().is_error());
    assert!(tracker.is_loading(asm));

    tracker.geometry_changed(ok, GeometryState::Completed);
    // the broken part is still loading
    assert!(tracker.is_loading(asm));
    tracker.hide_node(broken);
    assert!(tracker.is_loading(asm));
    // a full hide/display round recomputes the assembly
    tracker.hide_node(ok);
    assert!(tracker.is_hidden(asm));
    tracker.display_node(ok);
    assert!(tracker.is_partly_displayed(asm));
}
