//! Public article routes mounted at `/articles`.

use axum::routing::get;
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// ```text
/// GET /        -> list_articles
/// GET /{slug}  -> get_article
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(articles::list_articles))
        .route("/{slug}", get(articles::get_article))
}
