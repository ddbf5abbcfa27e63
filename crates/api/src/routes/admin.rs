//! Admin dashboard routes mounted at `/admin`. Every handler requires the
//! `admin` role through the `RequireAdmin` extractor.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{ai_prompts, articles, categories, email_templates};
use crate::state::AppState;

/// ```text
/// GET    /articles                                       -> list_admin_articles
/// POST   /articles                                       -> create_article
/// GET    /articles/{id}                                  -> get_admin_article
/// PUT    /articles/{id}                                  -> update_article
/// DELETE /articles/{id}                                  -> delete_article
/// PUT    /articles/{id}/categories                       -> replace_article_categories
///
/// POST   /categories                                     -> create_category
/// PUT    /categories/{id}                                -> update_category
/// DELETE /categories/{id}                                -> delete_category
///
/// GET    /ai-prompts                                     -> list_prompts
/// POST   /ai-prompts                                     -> create_prompt
/// GET    /ai-prompts/section/{section}                   -> get_prompt_for_section
/// GET    /ai-prompts/{id}                                -> get_prompt
/// PUT    /ai-prompts/{id}                                -> update_prompt
/// DELETE /ai-prompts/{id}                                -> delete_prompt
/// GET    /ai-prompts/{id}/versions                       -> list_versions
/// GET    /ai-prompts/{id}/versions/{version_id}          -> get_version
/// POST   /ai-prompts/{id}/versions/{version_id}/restore  -> restore_version
///
/// GET    /email-templates                                -> list_templates
/// GET    /email-templates/{key}                          -> get_template
/// PUT    /email-templates/{key}                          -> upsert_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Articles
        .route(
            "/articles",
            get(articles::list_admin_articles).post(articles::create_article),
        )
        .route(
            "/articles/{id}",
            get(articles::get_admin_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route(
            "/articles/{id}/categories",
            put(articles::replace_article_categories),
        )
        // Categories
        .route("/categories", post(categories::create_category))
        .route(
            "/categories/{id}",
            put(categories::update_category).delete(categories::delete_category),
        )
        // AI prompts
        .route(
            "/ai-prompts",
            get(ai_prompts::list_prompts).post(ai_prompts::create_prompt),
        )
        .route(
            "/ai-prompts/section/{section}",
            get(ai_prompts::get_prompt_for_section),
        )
        .route(
            "/ai-prompts/{id}",
            get(ai_prompts::get_prompt)
                .put(ai_prompts::update_prompt)
                .delete(ai_prompts::delete_prompt),
        )
        .route("/ai-prompts/{id}/versions", get(ai_prompts::list_versions))
        .route(
            "/ai-prompts/{id}/versions/{version_id}",
            get(ai_prompts::get_version),
        )
        .route(
            "/ai-prompts/{id}/versions/{version_id}/restore",
            post(ai_prompts::restore_version),
        )
        // Email templates
        .route("/email-templates", get(email_templates::list_templates))
        .route(
            "/email-templates/{key}",
            get(email_templates::get_template).put(email_templates::upsert_template),
        )
}
