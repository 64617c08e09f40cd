// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Visual projection of display states
//!
//! Maps each node's [`DisplayState`](sge_tree_model::DisplayState) to row
//! classes and icons, and applies them to rendered rows. The mapping is pure;
//! only [`RenderTarget`] implementations touch a document.
//!
//! Enable the `web` feature for [`web::DomSync`], which drives real browser
//! elements through `web-sys`.
//!
//! ```
//! use sge_tree_dom::{project, ClassNames};
//! use sge_tree_model::DisplayState;
//!
//! let p = project(DisplayState::DISPLAYED.make_pmi(true), None, false);
//! assert_eq!(
//!     p.class_names(&ClassNames::default()),
//!     vec!["jstree-displayed", "jstree-pmi"]
//! );
//! ```

pub mod classes;
pub mod error;
pub mod projection;
pub mod render;
#[cfg(feature = "web")]
pub mod web;

pub use classes::{ClassNames, PMI_TOOLTIP};
pub use error::{DomError, Result};
pub use projection::{project, project_node, Icon, IconSlot, Projection, StateClass};
pub use render::{
    apply, apply_icon_visibility, strip, MemoryElement, RenderTarget, TreeRenderer,
};
