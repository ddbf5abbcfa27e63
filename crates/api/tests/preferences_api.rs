mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, get, get_auth, post_json, put_json, user_token};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_defaults_before_first_save(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = user_token(Uuid::new_v4());
    let response = get_auth(app, "/api/v1/me/preferences", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["categories"]["mode"], "all");
    assert_eq!(json["data"]["email_frequency"], "weekly");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_selected_categories_are_resolved(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let fond = body_json(
        post_json(app, "/api/v1/admin/categories", &admin_token(), json!({"name": "Fond"})).await,
    )
    .await;
    let token = user_token(Uuid::new_v4());

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        "/api/v1/me/preferences",
        &token,
        json!({"all_categories": false, "categories": ["fond"], "email_frequency": "immediate"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/me/preferences", &token).await).await;
    assert_eq!(json["data"]["categories"]["mode"], "selected");
    assert_eq!(json["data"]["categories"]["category_ids"], json!([fond["data"]["id"]]));
    assert_eq!(json["data"]["email_frequency"], "immediate");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_subscription_category_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = user_token(Uuid::new_v4());
    let response = put_json(
        app,
        "/api/v1/me/preferences",
        &token,
        json!({"all_categories": false, "categories": ["Kryptovaluta"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["unknown"], json!(["Kryptovaluta"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_preferences_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/me/preferences").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
