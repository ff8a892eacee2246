// Application state module
// Shared state passed into every request handler

use std::sync::Arc;

use crate::store::PolygonStore;

use super::types::Config;

/// Application state
///
/// Holds the loaded configuration and the injected store handle. This
/// is the only state shared across requests: no cache, no sessions, no
/// in-memory spatial index. The store's connection pool does all the
/// coordination.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn PolygonStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn PolygonStore>) -> Self {
        Self { config, store }
    }
}
