//! Liveness probe, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    /// Live entries in this process's prompt cache.
    pub cached_prompts: usize,
}

/// GET /health. Answers 503 while the database is down so load balancers
/// take the instance out of rotation.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let database_up = match newsdesk_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::error!(error = %err, "Health check could not reach the database");
            false
        }
    };
    state.prompt_cache.purge_expired();

    let report = HealthReport {
        status: if database_up { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if database_up { "up" } else { "down" },
        cached_prompts: state.prompt_cache.len(),
    };
    let code = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
