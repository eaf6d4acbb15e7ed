//! Shared application state threaded through every handler.

use std::sync::Arc;
use std::time::Instant;

use cache_engine::SharedCache;

use crate::config::ServerConfig;

/// The state every axum handler receives via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// The shared cache engine handle.
    pub cache: SharedCache,
    /// The resolved server configuration.
    pub config: Arc<ServerConfig>,
    /// When the process started, for `/health` uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Builds application state from a resolved configuration.
    pub fn new(config: ServerConfig) -> Self {
        let engine_config = config.engine.clone();
        Self {
            cache: SharedCache::new(engine_config),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Seconds elapsed since process start.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
