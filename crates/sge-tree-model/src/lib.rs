// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SGE-Tree Model - display-state encoding and tree capability traits
//!
//! This crate provides the shared vocabulary for tracking the display state
//! of a scene graph tree: which nodes are hidden, partly displayed, loading or
//! displayed, and which carry an info/error annotation or PMI data.
//!
//! # Architecture
//!
//! - [`DisplayState`] - Composite per-node state (main axis, auxiliary axis, PMI flag)
//! - [`NodeId`] / [`NodeKind`] - Node identity and the kind of scene graph element behind it
//! - [`SceneTree`] - Capability set any concrete tree must provide so the
//!   propagation engine can walk it and store state on its nodes
//! - [`TreeError`] / [`CommandError`] - Error taxonomy
//!
//! # Example
//!
//! ```
//! use sge_tree_model::{DisplayState, MainState};
//!
//! let state = DisplayState::default().make_displayed().make_error();
//! assert_eq!(state.main, MainState::Displayed);
//! assert!(state.is_error());
//!
//! let hidden = state.make_hidden();
//! assert!(hidden.is_hidden());
//! assert!(hidden.is_error());
//! ```

pub mod error;
pub mod state;
pub mod tree;
pub mod types;

// Re-export all public types
pub use error::*;
pub use state::*;
pub use tree::*;
pub use types::*;
