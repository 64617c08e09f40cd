// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node identity and kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe node identifier
///
/// `NodeId(0)` is reserved for the invisible tree root.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Identifier of the invisible tree root
    pub const ROOT: NodeId = NodeId(0);

    /// Whether this is the root identifier
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("#")
        } else {
            write!(f, "n{}", self.0)
        }
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}

impl From<NodeId> for u32 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0 as u64
    }
}

/// Kind of scene graph element a tree node stands for
///
/// Hosts use the kind to pick an icon and to find the part leaves whose
/// scene nodes receive the actual visibility change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Root item of a loaded file
    File,
    /// Assembly (has instances/parts below it)
    Assembly,
    /// Placement of a part or assembly
    Instance,
    /// Part with a geometric representation
    Part,
    /// PMI group
    Pmi,
    /// Single PMI element
    PmiElement,
    /// Anything else
    #[default]
    Other,
}

impl NodeKind {
    /// Get icon class for UI
    pub fn icon_class(&self) -> &'static str {
        match self {
            NodeKind::File => "icon-file",
            NodeKind::Assembly => "icon-assembly",
            NodeKind::Instance => "icon-instance",
            NodeKind::Part => "icon-part",
            NodeKind::Pmi => "icon-pmi",
            NodeKind::PmiElement => "icon-pmi-element",
            NodeKind::Other => "icon-other",
        }
    }

    /// Name used in tree descriptions
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Assembly => "assembly",
            NodeKind::Instance => "instance",
            NodeKind::Part => "part",
            NodeKind::Pmi => "pmi",
            NodeKind::PmiElement => "pmi-element",
            NodeKind::Other => "other",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = std::convert::Infallible;

    /// Unknown names map to [`NodeKind::Other`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "file" => NodeKind::File,
            "assembly" => NodeKind::Assembly,
            "instance" => NodeKind::Instance,
            "part" => NodeKind::Part,
            "pmi" => NodeKind::Pmi,
            "pmi-element" | "pmi_element" => NodeKind::PmiElement,
            _ => NodeKind::Other,
        })
    }
}

/// Geometry load lifecycle reported by the scene library
///
/// Each state maps onto one tracker command: `Loading` → loading,
/// `Completed` → display, `Failed` → error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeometryState {
    Loading,
    Completed,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::ROOT.to_string(), "#");
        assert_eq!(NodeId(12).to_string(), "n12");
        assert!(NodeId(0).is_root());
        assert!(!NodeId(1).is_root());
    }

    #[test]
    fn test_node_kind_roundtrip_names() {
        for kind in [
            NodeKind::File,
            NodeKind::Assembly,
            NodeKind::Instance,
            NodeKind::Part,
            NodeKind::Pmi,
            NodeKind::PmiElement,
            NodeKind::Other,
        ] {
            assert_eq!(kind.as_str().parse::<NodeKind>().unwrap(), kind);
        }
        assert_eq!("PART".parse::<NodeKind>().unwrap(), NodeKind::Part);
        assert_eq!("gizmo".parse::<NodeKind>().unwrap(), NodeKind::Other);
    }

    #[test]
    fn test_node_kind_serde() {
        let json = serde_json::to_string(&NodeKind::PmiElement).unwrap();
        assert_eq!(json, "\"pmi-element\"");
        let id: NodeId = serde_json::from_str("7").unwrap();
        assert_eq!(id, NodeId(7));
    }
}
