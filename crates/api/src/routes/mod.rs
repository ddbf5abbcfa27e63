pub mod admin;
pub mod articles;
pub mod categories;
pub mod health;
pub mod preferences;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /articles                                          list published (public)
/// /articles/{slug}                                   get published, preview when anonymous
/// /categories                                        list (public)
/// /categories/{slug}                                 get one (public)
///
/// /me/preferences                                    get, update (requires auth)
///
/// /admin/articles                                    list, create (admin only)
/// /admin/articles/{id}                               get, update, delete
/// /admin/articles/{id}/categories                    replace categories (PUT)
///
/// /admin/categories                                  create
/// /admin/categories/{id}                             update, delete
///
/// /admin/ai-prompts                                  list, create
/// /admin/ai-prompts/{id}                             get, update, delete
/// /admin/ai-prompts/{id}/versions                    version history
/// /admin/ai-prompts/{id}/versions/{version_id}       one archived version
/// /admin/ai-prompts/{id}/versions/{version_id}/restore  restore (POST)
/// /admin/ai-prompts/section/{section}                cached lookup by section
///
/// /admin/email-templates                             list
/// /admin/email-templates/{key}                       get, upsert (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/articles", articles::router())
        .nest("/categories", categories::router())
        .nest("/me/preferences", preferences::router())
        .nest("/admin", admin::router())
}
