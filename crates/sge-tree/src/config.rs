// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tracker configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid tracker configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// How info/error/normal annotations reach the ancestors of a leaf
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationPolicy {
    /// Every ancestor takes the leaf's annotation and rationale
    /// (last writer wins, siblings are not consulted)
    #[default]
    Broadcast,
    /// Every ancestor is recomputed from its immediate children:
    /// any error wins over any info, otherwise normal
    Reconcile,
}

/// Tracker settings
///
/// ```
/// use sge_tree::{AnnotationPolicy, TrackerConfig};
///
/// let config = TrackerConfig::from_json(r#"{ "annotationPolicy": "reconcile" }"#).unwrap();
/// assert_eq!(config.annotation_policy, AnnotationPolicy::Reconcile);
/// assert!(config.state_icons);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    pub annotation_policy: AnnotationPolicy,
    /// Whether state icons start out visible
    pub state_icons: bool,
    /// Collect changed nodes for incremental DOM sync
    pub redraw_on_change: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            annotation_policy: AnnotationPolicy::Broadcast,
            state_icons: true,
            redraw_on_change: true,
        }
    }
}

impl TrackerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
