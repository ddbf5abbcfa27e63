use std::sync::Arc;
use std::time::Duration;

use newsdesk_core::cache::TtlCache;
use newsdesk_db::models::ai_prompt::AiPrompt;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: newsdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// AI prompts keyed by section. Local to this process; any prompt
    /// write clears it.
    pub prompt_cache: Arc<TtlCache<AiPrompt>>,
}

impl AppState {
    pub fn new(pool: newsdesk_db::DbPool, config: ServerConfig) -> Self {
        let ttl = Duration::from_secs(config.prompt_cache_ttl_secs);
        Self {
            pool,
            config: Arc::new(config),
            prompt_cache: Arc::new(TtlCache::with_system_clock(ttl)),
        }
    }
}
