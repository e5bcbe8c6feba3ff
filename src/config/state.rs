//! Application state module
//! Shared, read-only state handed to every connection task

use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::routing::Router;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Route table, fixed after startup
    pub router: Router,
    /// Currently open connections, used for the `max_connections` cap
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub const fn new(config: Config, router: Router) -> Self {
        Self {
            config,
            router,
            active_connections: AtomicUsize::new(0),
        }
    }
}
