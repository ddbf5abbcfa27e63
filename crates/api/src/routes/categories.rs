use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Public category routes mounted at `/categories`.
///
/// ```text
/// GET /        -> list_categories
/// GET /{slug}  -> get_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list_categories))
        .route("/{slug}", get(categories::get_category))
}
