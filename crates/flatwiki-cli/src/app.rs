//! Application state management.

use flatwiki_core::{Config, QueryEngine};
use std::path::Path;
use tracing::info;

/// Shared application state.
pub struct App {
    /// The query engine, built once and lent to every command
    pub engine: QueryEngine,
}

impl App {
    /// Create a new application instance.
    pub fn new(config: &Config, store: Option<&Path>) -> Self {
        let engine = QueryEngine::from_config(config, store);

        info!(
            root = %engine.store().root().display(),
            available = engine.store().is_available(),
            "Application initialized"
        );

        App { engine }
    }
}
