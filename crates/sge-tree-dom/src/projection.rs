// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure mapping from node state to row classes and icons

use crate::classes::{ClassNames, PMI_TOOLTIP};
use serde::Serialize;
use sge_tree_model::{AuxState, DisplayState, MainState, NodeId, SceneTree};
use smallvec::SmallVec;

/// Row class set by one state flag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StateClass {
    Displayed,
    PartlyDisplayed,
    Loading,
    Info,
    Error,
    Pmi,
}

impl StateClass {
    pub fn name<'a>(&self, names: &'a ClassNames) -> &'a str {
        match self {
            StateClass::Displayed => names.displayed.as_str(),
            StateClass::PartlyDisplayed => names.partly_displayed.as_str(),
            StateClass::Loading => names.loading.as_str(),
            StateClass::Info => names.info.as_str(),
            StateClass::Error => names.error.as_str(),
            StateClass::Pmi => names.pmi.as_str(),
        }
    }
}

/// Icon position inside a row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IconSlot {
    /// Visibility toggle, always first in the row
    State,
    /// Info/error marker
    Aux,
    Pmi,
}

impl IconSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconSlot::State => "state",
            IconSlot::Aux => "aux",
            IconSlot::Pmi => "pmi",
        }
    }
}

/// One icon to render
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub slot: IconSlot,
    /// Marks a disabled state icon
    pub disabled: bool,
    pub tooltip: Option<String>,
}

impl Icon {
    /// Full class attribute for this icon
    pub fn class_attr(&self, names: &ClassNames) -> String {
        let specific = match self.slot {
            IconSlot::State => &names.state_icon,
            IconSlot::Aux => &names.aux_icon,
            IconSlot::Pmi => &names.pmi_icon,
        };
        let mut class = format!("{} {}", names.icon, specific);
        if self.disabled {
            class.push(' ');
            class.push_str(&names.state_icon_disabled);
        }
        class
    }
}

/// Everything a row shows for one node state
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// One entry per set flag; hidden/normal/no-PMI contribute nothing
    pub classes: SmallVec<[StateClass; 3]>,
    pub state_icon: Icon,
    /// Present for info and error states
    pub aux_icon: Option<Icon>,
    /// Present when the node carries PMI
    pub pmi_icon: Option<Icon>,
}

impl Projection {
    /// Class names in flag order
    pub fn class_names<'a>(&self, names: &'a ClassNames) -> Vec<&'a str> {
        self.classes.iter().map(|c| c.name(names)).collect()
    }

    /// All icons in row order
    pub fn icons(&self) -> impl Iterator<Item = &Icon> {
        std::iter::once(&self.state_icon)
            .chain(self.aux_icon.as_ref())
            .chain(self.pmi_icon.as_ref())
    }
}

/// Project a state; an empty rationale produces no tooltip
pub fn project(state: DisplayState, rationale: Option<&str>, disabled: bool) -> Projection {
    let mut classes = SmallVec::new();
    match state.main {
        MainState::Displayed => classes.push(StateClass::Displayed),
        MainState::PartlyDisplayed => classes.push(StateClass::PartlyDisplayed),
        MainState::Loading => classes.push(StateClass::Loading),
        MainState::Hidden => {}
    }
    let aux_icon = match state.aux {
        AuxState::Normal => None,
        AuxState::Info | AuxState::Error => {
            classes.push(if state.is_error() {
                StateClass::Error
            } else {
                StateClass::Info
            });
            Some(Icon {
                slot: IconSlot::Aux,
                disabled: false,
                tooltip: rationale.filter(|r| !r.is_empty()).map(str::to_owned),
            })
        }
    };
    let pmi_icon = state.is_pmi().then(|| {
        classes.push(StateClass::Pmi);
        Icon {
            slot: IconSlot::Pmi,
            disabled: false,
            tooltip: Some(PMI_TOOLTIP.to_owned()),
        }
    });
    Projection {
        classes,
        state_icon: Icon {
            slot: IconSlot::State,
            disabled,
            tooltip: None,
        },
        aux_icon,
        pmi_icon,
    }
}

/// Project a node of a tree; `None` for unknown ids
pub fn project_node<T: SceneTree>(tree: &T, id: NodeId) -> Option<Projection> {
    let state = tree.state(id)?;
    Some(project(state, tree.rationale(id), tree.is_disabled(id)))
}
