mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, get_auth, put_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_upsert_and_fetch_template(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        "/api/v1/admin/email-templates/weekly_digest",
        &admin_token(),
        json!({
            "subject": "Uka som gikk",
            "preview_text": "De viktigste sakene",
            "content": {"heading": "Ukens saker", "intro": "Her er utvalget", "max_articles": 5, "extra": true}
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["key"], "weekly_digest");
    assert_eq!(json["data"]["is_active"], true);
    assert!(json["data"]["content"].get("extra").is_none());

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/email-templates/weekly_digest", &admin_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"]["max_articles"], 5);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_content_must_match_key(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        "/api/v1/admin/email-templates/password_reset",
        &admin_token(),
        json!({"subject": "Nytt passord", "content": {"heading": "Hei"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_key_and_missing_template(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/email-templates/newsletter", &admin_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/admin/email-templates/welcome", &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
