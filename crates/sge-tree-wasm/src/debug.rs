// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Debug switch and console logging

use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;

/// Global debug mode flag (set from URL parameter ?debug=1)
static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

pub fn is_debug() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

/// Switch debug logging at runtime
#[wasm_bindgen(js_name = setDebug)]
pub fn set_debug(enabled: bool) {
    DEBUG_MODE.store(enabled, Ordering::Relaxed);
    log::set_max_level(max_level());
}

fn max_level() -> log::LevelFilter {
    if is_debug() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    }
}

/// Read the debug flag from the page URL
pub fn init_debug_from_url() {
    if let Some(window) = web_sys::window() {
        if let Ok(search) = window.location().search() {
            if search.contains("debug=1") || search.contains("debug=true") {
                DEBUG_MODE.store(true, Ordering::Relaxed);
                web_sys::console::log_1(&"[SGE-Tree] Debug mode enabled via URL".into());
            }
        }
    }
}

/// Route `log` records to the browser console
pub fn init_logging() {
    // a second init only fails because a logger is already set
    if console_log::init_with_level(log::Level::Trace).is_ok() {
        log::set_max_level(max_level());
    }
}
