mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, get, get_auth, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["database"], "up");
    assert_eq!(json["cached_prompts"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_counts_cached_prompts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app.clone(),
        "/api/v1/admin/ai-prompts",
        &admin_token(),
        json!({"name": "Oppsummering", "model": "gemini-1.5-pro", "section": "summaries", "prompt": "Oppsummer."}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    get_auth(app.clone(), "/api/v1/admin/ai-prompts/section/summaries", &admin_token()).await;

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["cached_prompts"], 1);
}
