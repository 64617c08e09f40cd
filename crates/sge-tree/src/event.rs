// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Notifications and input triggers

use serde::{Deserialize, Serialize};
use sge_tree_model::{GeometryState, NodeId};

/// Part of a rendered tree row that received a click
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClickTarget {
    /// Visibility toggle icon
    StateIcon,
    /// Info/error icon (shows the rationale, never toggles)
    AuxIcon,
    /// PMI icon
    PmiIcon,
    /// Row label (selection, handled by the host)
    Label,
}

/// Raw input that caused a command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum Trigger {
    /// User click on a tree row
    Click { target: ClickTarget },
    /// Geometry lifecycle change reported by the scene library
    Geometry { state: GeometryState },
}

/// Notification emitted after every successful state change
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StateEvent {
    Display {
        node: NodeId,
        displayed: Vec<NodeId>,
        trigger: Option<Trigger>,
    },
    Hide {
        node: NodeId,
        displayed: Vec<NodeId>,
        trigger: Option<Trigger>,
    },
    Loading {
        node: NodeId,
        displayed: Vec<NodeId>,
        trigger: Option<Trigger>,
    },
    Error {
        node: NodeId,
        rationale: Option<String>,
    },
    Info {
        node: NodeId,
        rationale: Option<String>,
    },
    Normal {
        node: NodeId,
    },
    Pmi {
        node: NodeId,
        value: bool,
    },
    /// Visibility toggled through the state icon
    Activate {
        node: NodeId,
        displayed: bool,
    },
    /// PMI icon clicked
    ActivatePmi {
        node: NodeId,
    },
}

impl StateEvent {
    /// Node the notification is about
    pub fn node(&self) -> NodeId {
        match self {
            StateEvent::Display { node, .. }
            | StateEvent::Hide { node, .. }
            | StateEvent::Loading { node, .. }
            | StateEvent::Error { node, .. }
            | StateEvent::Info { node, .. }
            | StateEvent::Normal { node }
            | StateEvent::Pmi { node, .. }
            | StateEvent::Activate { node, .. }
            | StateEvent::ActivatePmi { node } => *node,
        }
    }

    /// Event name as used by hosts (`display`, `hide`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            StateEvent::Display { .. } => "display",
            StateEvent::Hide { .. } => "hide",
            StateEvent::Loading { .. } => "loading",
            StateEvent::Error { .. } => "error",
            StateEvent::Info { .. } => "info",
            StateEvent::Normal { .. } => "normal",
            StateEvent::Pmi { .. } => "pmi",
            StateEvent::Activate { .. } => "activate",
            StateEvent::ActivatePmi { .. } => "activatePmi",
        }
    }
}

/// Outcome of a click on a tree row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Activation {
    /// Visibility was toggled
    Toggled { displayed: bool },
    /// PMI icon was clicked
    Pmi,
    /// Label click, left to the host's selection handling
    Select,
    /// Click on the annotation icon; nothing changes
    Ignored,
}
