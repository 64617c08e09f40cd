// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # SGE-Tree WebAssembly bindings
//!
//! Exposes the display-state tracker to JavaScript as `SgeTree`.
//!
//! ```javascript
//! import init, { SgeTree } from 'sge-tree-wasm';
//!
//! await init();
//! const tree = new SgeTree('{"annotationPolicy": "broadcast"}');
//! const file = tree.loadTree(0, JSON.stringify(description));
//! tree.bind('#scene-tree');
//! tree.onEvent((e) => console.log(e.type, e.node, e.displayed));
//! tree.geometryChanged(partId, 'completed');
//! ```
//!
//! Node ids are plain numbers; `0` is the invisible root. Commands take an
//! array of ids: one element behaves as a single-node command, more elements
//! as a batch.

mod debug;

pub use debug::{init_debug_from_url, is_debug, set_debug};

use serde::{Deserialize, Serialize};
use sge_tree::{
    AnnotationPolicy, ClickTarget, NodeArena, StateTracker, SubscriptionId, Targets,
    TrackerConfig, TreeSpec,
};
use sge_tree_dom::web::DomSync;
use sge_tree_dom::{project_node, ClassNames, TreeRenderer};
use sge_tree_model::{GeometryState, NodeId, NodeKind, SceneTree};
use std::fmt::Display;
use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    init_debug_from_url();
    debug::init_logging();
}

/// Version of the bindings
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn targets(ids: Vec<u32>) -> Targets {
    match ids.as_slice() {
        [id] => Targets::One(NodeId(*id)),
        _ => Targets::Many(ids.into_iter().map(NodeId).collect()),
    }
}

fn ids_out(ids: impl IntoIterator<Item = NodeId>) -> Vec<u32> {
    ids.into_iter().map(|id| id.0).collect()
}

/// Constructor options: tracker settings plus class name overrides
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ViewerConfig {
    #[serde(flatten)]
    tracker: TrackerConfig,
    class_names: ClassNames,
}

/// Display-state tracker bound to an optional tree container
#[wasm_bindgen]
pub struct SgeTree {
    tracker: StateTracker<NodeArena>,
    renderer: TreeRenderer,
    dom: Option<DomSync>,
    subscriptions: Vec<(u32, SubscriptionId)>,
    next_handle: u32,
}

#[wasm_bindgen]
impl SgeTree {
    /// Create a tracker from an optional JSON configuration
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<SgeTree, JsValue> {
        let config: ViewerConfig = match config.as_deref() {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(json).map_err(to_js)?,
            _ => ViewerConfig::default(),
        };
        log::debug!(
            "new tracker, annotation policy {:?}",
            config.tracker.annotation_policy
        );
        Ok(SgeTree {
            tracker: StateTracker::with_config(NodeArena::new(), config.tracker),
            renderer: TreeRenderer::new(config.class_names),
            dom: None,
            subscriptions: Vec::new(),
            next_handle: 1,
        })
    }

    /// Bind to the tree container matching `selector` and render all rows
    pub fn bind(&mut self, selector: &str) -> Result<usize, JsValue> {
        let dom = DomSync::from_selector(selector, self.renderer.clone()).map_err(to_js)?;
        dom.apply_icon_visibility(self.tracker.state_icons_visible());
        let rendered = dom.render_all(&self.tracker);
        self.tracker.take_touched();
        self.dom = Some(dom);
        Ok(rendered)
    }

    pub fn unbind(&mut self) {
        self.dom = None;
    }

    /// Render rows whose state changed; returns the number of rows touched
    pub fn sync(&mut self) -> usize {
        match &self.dom {
            Some(dom) => dom.sync(&mut self.tracker),
            None => 0,
        }
    }

    /// Render every bound row regardless of changes
    #[wasm_bindgen(js_name = renderAll)]
    pub fn render_all(&mut self) -> usize {
        match &self.dom {
            Some(dom) => dom.render_all(&self.tracker),
            None => 0,
        }
    }

    fn after_change(&mut self, changed: bool) -> bool {
        if self.tracker.config().redraw_on_change {
            self.sync();
        }
        changed
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Create a node under `parent` (`0` for a top level node)
    #[wasm_bindgen(js_name = createNode)]
    pub fn create_node(&mut self, parent: u32, label: &str, kind: &str) -> Result<u32, JsValue> {
        let kind = kind.parse::<NodeKind>().unwrap_or_default();
        let id = self
            .tracker
            .insert_node(NodeId(parent), label, kind)
            .map_err(to_js)?;
        self.after_change(true);
        Ok(id.0)
    }

    /// Load a JSON tree description under `parent`; returns the new subtree root
    #[wasm_bindgen(js_name = loadTree)]
    pub fn load_tree(&mut self, parent: u32, json: &str) -> Result<u32, JsValue> {
        let spec = TreeSpec::from_json(json).map_err(to_js)?;
        let id = self
            .tracker
            .load_tree(NodeId(parent), &spec)
            .map_err(to_js)?;
        self.after_change(true);
        Ok(id.0)
    }

    /// Delete a node with its subtree; returns the removed ids
    #[wasm_bindgen(js_name = deleteNode)]
    pub fn delete_node(&mut self, id: u32) -> Result<Vec<u32>, JsValue> {
        let removed = self.tracker.remove_node(NodeId(id)).map_err(to_js)?;
        self.after_change(true);
        Ok(ids_out(removed))
    }

    /// Remove every node; bound rows lose their state classes and icons
    pub fn clear(&mut self) {
        self.tracker.clear();
        if let Some(dom) = &self.dom {
            let reset = dom.reset_all();
            log::debug!("clear: reset {} row(s)", reset);
        }
    }

    /// The host re-rendered these rows
    #[wasm_bindgen(js_name = nodesRedrawn)]
    pub fn nodes_redrawn(&mut self, ids: Vec<u32>) -> usize {
        let ids: Vec<NodeId> = ids.into_iter().map(NodeId).collect();
        self.tracker.nodes_redrawn(&ids);
        self.sync()
    }

    #[wasm_bindgen(js_name = setDisabled)]
    pub fn set_disabled(&mut self, id: u32, disabled: bool) -> Result<(), JsValue> {
        self.tracker
            .set_disabled(NodeId(id), disabled)
            .map_err(to_js)?;
        self.after_change(true);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = displayNode)]
    pub fn display_node(&mut self, ids: Vec<u32>) -> bool {
        let ok = self.tracker.display_node(targets(ids));
        self.after_change(ok)
    }

    #[wasm_bindgen(js_name = hideNode)]
    pub fn hide_node(&mut self, ids: Vec<u32>) -> bool {
        let ok = self.tracker.hide_node(targets(ids));
        self.after_change(ok)
    }

    #[wasm_bindgen(js_name = loadingNode)]
    pub fn loading_node(&mut self, ids: Vec<u32>) -> bool {
        let ok = self.tracker.loading_node(targets(ids));
        self.after_change(ok)
    }

    #[wasm_bindgen(js_name = errorNode)]
    pub fn error_node(&mut self, ids: Vec<u32>, rationale: Option<String>) -> bool {
        let ok = self
            .tracker
            .error_node(targets(ids), rationale.as_deref().unwrap_or(""));
        self.after_change(ok)
    }

    #[wasm_bindgen(js_name = infoNode)]
    pub fn info_node(&mut self, ids: Vec<u32>, rationale: Option<String>) -> bool {
        let ok = self
            .tracker
            .info_node(targets(ids), rationale.as_deref().unwrap_or(""));
        self.after_change(ok)
    }

    #[wasm_bindgen(js_name = normalNode)]
    pub fn normal_node(&mut self, ids: Vec<u32>) -> bool {
        let ok = self.tracker.normal_node(targets(ids));
        self.after_change(ok)
    }

    #[wasm_bindgen(js_name = pmiNode)]
    pub fn pmi_node(&mut self, ids: Vec<u32>, value: bool) -> bool {
        let ok = self.tracker.pmi_node(targets(ids), value);
        self.after_change(ok)
    }

    /// Map a geometry lifecycle state (`loading`, `completed`, `failed`)
    #[wasm_bindgen(js_name = geometryChanged)]
    pub fn geometry_changed(&mut self, id: u32, state: JsValue) -> Result<bool, JsValue> {
        let state: GeometryState = serde_wasm_bindgen::from_value(state)?;
        let ok = self.tracker.geometry_changed(NodeId(id), state);
        Ok(self.after_change(ok))
    }

    /// Handle a click on a row part (`stateIcon`, `auxIcon`, `pmiIcon`, `label`)
    pub fn activate(&mut self, id: u32, target: JsValue) -> Result<JsValue, JsValue> {
        let target: ClickTarget = serde_wasm_bindgen::from_value(target)?;
        let activation = self.tracker.activate(NodeId(id), target).map_err(to_js)?;
        self.after_change(true);
        Ok(serde_wasm_bindgen::to_value(&activation)?)
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// Register a callback receiving every notification; returns a handle
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: js_sys::Function) -> u32 {
        let subscription = self.tracker.subscribe(move |event| {
            let value = match serde_wasm_bindgen::to_value(event) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("cannot convert {} notification: {}", event.name(), e);
                    return;
                }
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                log::warn!("notification callback failed: {:?}", e);
            }
        });
        let handle = self.next_handle;
        self.next_handle += 1;
        self.subscriptions.push((handle, subscription));
        handle
    }

    #[wasm_bindgen(js_name = offEvent)]
    pub fn off_event(&mut self, handle: u32) -> bool {
        let Some(pos) = self.subscriptions.iter().position(|(h, _)| *h == handle) else {
            return false;
        };
        let (_, subscription) = self.subscriptions.remove(pos);
        self.tracker.unsubscribe(subscription)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = isDisplayed)]
    pub fn is_displayed(&self, id: u32) -> bool {
        self.tracker.is_displayed(NodeId(id))
    }

    #[wasm_bindgen(js_name = isHidden)]
    pub fn is_hidden(&self, id: u32) -> bool {
        self.tracker.is_hidden(NodeId(id))
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self, id: u32) -> bool {
        self.tracker.is_loading(NodeId(id))
    }

    #[wasm_bindgen(js_name = isPartlyDisplayed)]
    pub fn is_partly_displayed(&self, id: u32) -> bool {
        self.tracker.is_partly_displayed(NodeId(id))
    }

    /// Full state of a node as `{ main, aux, pmi }`, `undefined` if unknown
    pub fn state(&self, id: u32) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.tracker.state(NodeId(id)))?)
    }

    pub fn rationale(&self, id: u32) -> Option<String> {
        self.tracker.rationale(NodeId(id)).map(str::to_owned)
    }

    /// Ids of every displayed node, ascending
    pub fn displayed(&self) -> Vec<u32> {
        ids_out(self.tracker.displayed().to_sorted_vec())
    }

    /// Part nodes at or below `id`
    #[wasm_bindgen(js_name = partLeaves)]
    pub fn part_leaves(&self, id: u32) -> Vec<u32> {
        ids_out(self.tracker.tree().part_leaves(NodeId(id)))
    }

    pub fn children(&self, id: u32) -> Vec<u32> {
        ids_out(self.tracker.tree().children(NodeId(id)).iter().copied())
    }

    pub fn label(&self, id: u32) -> Option<String> {
        self.tracker.tree().label(NodeId(id)).map(str::to_owned)
    }

    pub fn search(&self, query: &str) -> Vec<u32> {
        ids_out(self.tracker.tree().search(query))
    }

    /// Classes and icons a custom renderer should show for a node
    pub fn projection(&self, id: u32) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&project_node(
            self.tracker.tree(),
            NodeId(id),
        ))?)
    }

    #[wasm_bindgen(getter, js_name = nodeCount)]
    pub fn node_count(&self) -> usize {
        self.tracker.tree().len()
    }

    #[wasm_bindgen(getter, js_name = reconcileAnnotations)]
    pub fn reconcile_annotations(&self) -> bool {
        self.tracker.config().annotation_policy == AnnotationPolicy::Reconcile
    }

    // ------------------------------------------------------------------
    // State icons
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = showStateIcons)]
    pub fn show_state_icons(&mut self) {
        self.tracker.show_state_icons();
        self.apply_icon_visibility();
    }

    #[wasm_bindgen(js_name = hideStateIcons)]
    pub fn hide_state_icons(&mut self) {
        self.tracker.hide_state_icons();
        self.apply_icon_visibility();
    }

    #[wasm_bindgen(js_name = toggleStateIcons)]
    pub fn toggle_state_icons(&mut self) {
        self.tracker.toggle_state_icons();
        self.apply_icon_visibility();
    }

    #[wasm_bindgen(getter, js_name = stateIconsVisible)]
    pub fn state_icons_visible(&self) -> bool {
        self.tracker.state_icons_visible()
    }

    fn apply_icon_visibility(&self) {
        if let Some(dom) = &self.dom {
            dom.apply_icon_visibility(self.tracker.state_icons_visible());
        }
    }
}
