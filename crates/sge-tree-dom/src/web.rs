// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Browser DOM rows
//!
//! Rows are found through a `data-node-id` attribute holding the numeric node
//! id. Icons are `<i>` children tagged with `data-sge-icon`, so they can be
//! found again regardless of the configured class names.
//!
//! ```css
//! .jstree-no-state-icons .jstree-sge-state { display: none; }
//! ```

use crate::error::{DomError, Result};
use crate::projection::IconSlot;
use crate::render::{apply_icon_visibility, strip, RenderTarget, TreeRenderer};
use sge_tree::StateTracker;
use sge_tree_model::{NodeId, SceneTree};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

/// Attribute holding the node id on each row
pub const NODE_ID_ATTR: &str = "data-node-id";
const ICON_ATTR: &str = "data-sge-icon";

fn js_err(e: wasm_bindgen::JsValue) -> DomError {
    DomError::Js(format!("{:?}", e))
}

/// A row element
#[derive(Clone, Debug)]
pub struct DomElement {
    element: Element,
}

impl DomElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    fn icon(&self, slot: IconSlot) -> Option<Element> {
        let selector = format!(":scope > i[{}=\"{}\"]", ICON_ATTR, slot.as_str());
        self.element.query_selector(&selector).ok().flatten()
    }

    fn create_icon(&self, slot: IconSlot) -> Result<Element> {
        let document = self.element.owner_document().ok_or(DomError::NoDocument)?;
        let icon = document.create_element("i").map_err(js_err)?;
        icon.set_attribute("role", "presentation").map_err(js_err)?;
        icon.set_attribute(ICON_ATTR, slot.as_str()).map_err(js_err)?;
        // the state icon leads the row
        if slot == IconSlot::State {
            self.element
                .insert_before(&icon, self.element.first_child().as_ref())
                .map_err(js_err)?;
        } else {
            self.element.append_child(&icon).map_err(js_err)?;
        }
        Ok(icon)
    }

    fn try_set_icon(&self, slot: IconSlot, class: &str, tooltip: Option<&str>) -> Result<()> {
        let icon = match self.icon(slot) {
            Some(icon) => icon,
            None => self.create_icon(slot)?,
        };
        icon.set_class_name(class);
        match tooltip {
            Some(text) => icon.set_attribute("title", text).map_err(js_err)?,
            None => icon.remove_attribute("title").map_err(js_err)?,
        }
        Ok(())
    }
}

impl RenderTarget for DomElement {
    fn add_class(&mut self, class: &str) {
        if let Err(e) = self.element.class_list().add_1(class).map_err(js_err) {
            log::warn!("cannot add class {}: {}", class, e);
        }
    }

    fn remove_class(&mut self, class: &str) {
        if let Err(e) = self.element.class_list().remove_1(class).map_err(js_err) {
            log::warn!("cannot remove class {}: {}", class, e);
        }
    }

    fn set_icon(&mut self, slot: IconSlot, class: &str, tooltip: Option<&str>) {
        if let Err(e) = self.try_set_icon(slot, class, tooltip) {
            log::warn!("cannot render {} icon: {}", slot.as_str(), e);
        }
    }

    fn remove_icon(&mut self, slot: IconSlot) {
        if let Some(icon) = self.icon(slot) {
            icon.remove();
        }
    }
}

/// Keeps the rows under one tree container in step with a tracker
pub struct DomSync {
    container: Element,
    renderer: TreeRenderer,
}

impl DomSync {
    pub fn new(container: Element, renderer: TreeRenderer) -> Self {
        Self {
            container,
            renderer,
        }
    }

    /// Bind to the first element matching `selector` in the page document
    pub fn from_selector(selector: &str, renderer: TreeRenderer) -> Result<Self> {
        let container = document()?
            .query_selector(selector)
            .map_err(js_err)?
            .ok_or_else(|| DomError::ElementNotFound(selector.to_owned()))?;
        Ok(Self::new(container, renderer))
    }

    pub fn renderer(&self) -> &TreeRenderer {
        &self.renderer
    }

    /// Row of a node, if it is currently rendered
    pub fn row(&self, id: NodeId) -> Option<DomElement> {
        let selector = format!("[{}=\"{}\"]", NODE_ID_ATTR, id.0);
        self.container
            .query_selector(&selector)
            .ok()
            .flatten()
            .map(DomElement::new)
    }

    /// Render the rows of every changed node
    pub fn sync<T: SceneTree>(&self, tracker: &mut StateTracker<T>) -> usize {
        self.renderer.sync(tracker, |id| self.row(id))
    }

    /// Every row under the container with its node id
    fn rows(&self) -> Vec<(NodeId, DomElement)> {
        let selector = format!("[{}]", NODE_ID_ATTR);
        let Ok(rows) = self.container.query_selector_all(&selector) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(rows.length() as usize);
        for i in 0..rows.length() {
            let Some(element) = rows.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let Some(id) = element
                .get_attribute(NODE_ID_ATTR)
                .and_then(|v| v.parse::<u32>().ok())
            else {
                continue;
            };
            out.push((NodeId(id), DomElement::new(element)));
        }
        out
    }

    /// Render every row under the container, changed or not
    pub fn render_all<T: SceneTree>(&self, tracker: &StateTracker<T>) -> usize {
        let mut rendered = 0;
        for (id, mut row) in self.rows() {
            if self.renderer.render(tracker.tree(), id, &mut row) {
                rendered += 1;
            }
        }
        rendered
    }

    /// Strip state classes and icons from every row under the container
    pub fn reset_all(&self) -> usize {
        let mut rows = self.rows();
        for (_, row) in rows.iter_mut() {
            strip(row, self.renderer.names());
        }
        rows.len()
    }

    /// Mirror the tracker's state icon visibility on the container
    pub fn apply_icon_visibility(&self, visible: bool) {
        let mut container = DomElement::new(self.container.clone());
        apply_icon_visibility(&mut container, visible, self.renderer.names());
    }
}

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(DomError::NoDocument)
}
