// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSS class names used by the projection

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tooltip shown on every PMI icon
pub const PMI_TOOLTIP: &str = "Current item has PMI data.";

/// Class names written to rows, icons and the tree container
///
/// Defaults match the stock jstree theme. Any subset can be overridden from
/// JSON:
///
/// ```
/// use sge_tree_dom::ClassNames;
///
/// let names = ClassNames::from_json(r#"{ "displayed": "is-visible" }"#).unwrap();
/// assert_eq!(names.displayed, "is-visible");
/// assert_eq!(names.error, "jstree-error");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    pub displayed: String,
    pub partly_displayed: String,
    pub loading: String,
    pub info: String,
    pub error: String,
    pub pmi: String,
    /// Shared by every icon element
    pub icon: String,
    pub state_icon: String,
    pub state_icon_disabled: String,
    pub aux_icon: String,
    pub pmi_icon: String,
    /// Set on the tree container while state icons are hidden
    pub no_state_icons: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            displayed: "jstree-displayed".into(),
            partly_displayed: "jstree-partly-displayed".into(),
            loading: "jstree-sge-loading".into(),
            info: "jstree-info".into(),
            error: "jstree-error".into(),
            pmi: "jstree-pmi".into(),
            icon: "jstree-icon".into(),
            state_icon: "jstree-sge-state".into(),
            state_icon_disabled: "jstree-sge-state-disabled".into(),
            aux_icon: "jstree-sge-additional-state".into(),
            pmi_icon: "jstree-pmi-icon".into(),
            no_state_icons: "jstree-no-state-icons".into(),
        }
    }
}

impl ClassNames {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every row class the projection may set
    pub fn state_classes(&self) -> [&str; 6] {
        [
            self.displayed.as_str(),
            self.partly_displayed.as_str(),
            self.loading.as_str(),
            self.info.as_str(),
            self.error.as_str(),
            self.pmi.as_str(),
        ]
    }
}
