// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display-state encoding
//!
//! A node's state has two independent, mutually exclusive axes plus a flag:
//!
//! ```text
//! main axis:       Hidden | PartlyDisplayed | Loading | Displayed
//! auxiliary axis:  Normal | Info | Error
//! pmi:             bool
//! ```
//!
//! Leaf lifecycle:
//!
//! ```text
//! Hidden -> Loading -> Displayed
//!                  \-> Displayed + Error
//! Displayed -> Hidden
//! ```
//!
//! Every `make_*` constructor replaces exactly one axis and leaves the other
//! axis and the PMI flag untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility / load progress of a node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MainState {
    /// Node and all its descendants are hidden
    #[default]
    Hidden,
    /// Some descendants are displayed, some are not
    PartlyDisplayed,
    /// Node (or a descendant) is waiting for its content
    Loading,
    /// Node and all its descendants are displayed
    Displayed,
}

impl MainState {
    pub fn label(&self) -> &'static str {
        match self {
            MainState::Hidden => "hidden",
            MainState::PartlyDisplayed => "partly displayed",
            MainState::Loading => "loading",
            MainState::Displayed => "displayed",
        }
    }
}

/// Annotation overlay, independent of visibility
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuxState {
    #[default]
    Normal,
    Info,
    Error,
}

impl AuxState {
    pub fn label(&self) -> &'static str {
        match self {
            AuxState::Normal => "normal",
            AuxState::Info => "info",
            AuxState::Error => "error",
        }
    }
}

/// Composite display state of one tree node
///
/// The rationale attached to `Info`/`Error` lives beside the state on the
/// node itself so that `DisplayState` stays `Copy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub main: MainState,
    pub aux: AuxState,
    #[serde(default)]
    pub pmi: bool,
}

impl DisplayState {
    /// Hidden / Normal / no PMI
    pub const HIDDEN: DisplayState = DisplayState {
        main: MainState::Hidden,
        aux: AuxState::Normal,
        pmi: false,
    };

    /// Displayed / Normal / no PMI
    pub const DISPLAYED: DisplayState = DisplayState {
        main: MainState::Displayed,
        aux: AuxState::Normal,
        pmi: false,
    };

    pub fn new(main: MainState, aux: AuxState) -> Self {
        Self {
            main,
            aux,
            pmi: false,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.main == MainState::Hidden
    }

    pub fn is_partly_displayed(&self) -> bool {
        self.main == MainState::PartlyDisplayed
    }

    pub fn is_loading(&self) -> bool {
        self.main == MainState::Loading
    }

    pub fn is_displayed(&self) -> bool {
        self.main == MainState::Displayed
    }

    pub fn is_info(&self) -> bool {
        self.aux == AuxState::Info
    }

    pub fn is_error(&self) -> bool {
        self.aux == AuxState::Error
    }

    pub fn is_normal(&self) -> bool {
        self.aux == AuxState::Normal
    }

    pub fn is_pmi(&self) -> bool {
        self.pmi
    }

    /// Replace the main axis
    pub fn with_main(self, main: MainState) -> Self {
        Self { main, ..self }
    }

    /// Replace the auxiliary axis
    pub fn with_aux(self, aux: AuxState) -> Self {
        Self { aux, ..self }
    }

    pub fn make_hidden(self) -> Self {
        self.with_main(MainState::Hidden)
    }

    pub fn make_partly_displayed(self) -> Self {
        self.with_main(MainState::PartlyDisplayed)
    }

    pub fn make_loading(self) -> Self {
        self.with_main(MainState::Loading)
    }

    pub fn make_displayed(self) -> Self {
        self.with_main(MainState::Displayed)
    }

    pub fn make_info(self) -> Self {
        self.with_aux(AuxState::Info)
    }

    pub fn make_error(self) -> Self {
        self.with_aux(AuxState::Error)
    }

    pub fn make_normal(self) -> Self {
        self.with_aux(AuxState::Normal)
    }

    pub fn make_pmi(self, pmi: bool) -> Self {
        Self { pmi, ..self }
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.main.label())?;
        if !self.is_normal() {
            write!(f, "+{}", self.aux.label())?;
        }
        if self.pmi {
            f.write_str("+pmi")?;
        }
        Ok(())
    }
}
