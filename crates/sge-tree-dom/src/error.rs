// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Invalid class name configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No document available")]
    NoDocument,

    #[error("No element matches '{0}'")]
    ElementNotFound(String),

    #[error("DOM call failed: {0}")]
    Js(String),
}
