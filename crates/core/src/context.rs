// SPDX-License-Identifier: MIT

//! `AppContext`: the single well-defined location for process-wide state
//! (spec §9 Design Notes — replaces the source's global `app_config` and
//! `ws_context`), threaded through every subsystem's
//! `launch()`/`check_ready()`/`land()` entry point.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub process_start: Instant,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            process_start: Instant::now(),
        }
    }
}
