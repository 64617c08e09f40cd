// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SGE-Tree - hierarchical display-state tracker
//!
//! Keeps the display state of every node in a scene graph tree consistent
//! while nodes are shown, hidden, loaded, annotated and inserted.
//!
//! # Architecture
//!
//! - [`NodeArena`] - Concrete tree that stores state on its own nodes
//! - [`StateTracker`] - Command API, structural hooks and notifications
//! - [`DisplayedSet`] - Incrementally maintained set of displayed nodes
//! - [`StateEvent`] - Notification emitted for every successful change
//! - [`TrackerConfig`] - Annotation policy and state icon defaults
//!
//! # Example
//!
//! ```
//! use sge_tree::{NodeArena, StateTracker};
//! use sge_tree_model::{NodeId, NodeKind};
//!
//! let mut tracker = StateTracker::new(NodeArena::new());
//! let asm = tracker.insert_node(NodeId::ROOT, "Assembly", NodeKind::Assembly).unwrap();
//! let bolt = tracker.insert_node(asm, "Bolt", NodeKind::Part).unwrap();
//! let nut = tracker.insert_node(asm, "Nut", NodeKind::Part).unwrap();
//!
//! assert!(tracker.display_node(bolt));
//! assert!(tracker.is_partly_displayed(asm));
//!
//! tracker.display_node(nut);
//! assert!(tracker.is_displayed(asm));
//! ```

pub mod arena;
pub mod config;
pub mod event;
mod propagate;
pub mod tracked;
pub mod tracker;

pub use arena::{NodeArena, TreeNode, TreeSpec};
pub use config::{AnnotationPolicy, ConfigError, TrackerConfig};
pub use event::{Activation, ClickTarget, StateEvent, Trigger};
pub use tracked::DisplayedSet;
pub use tracker::{StateTracker, SubscriptionId, Targets};
