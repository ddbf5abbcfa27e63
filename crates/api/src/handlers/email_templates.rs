//! Handlers for email template management.
//!
//! Template bodies are stored as JSON; each write is decoded against the
//! typed contract for its key before it is saved.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use newsdesk_core::email_template::{validate_envelope, EmailTemplateContent, EmailTemplateKey};
use newsdesk_db::models::email_template::UpsertEmailTemplate;
use newsdesk_db::repositories::EmailTemplateRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /admin/email-templates
// ---------------------------------------------------------------------------

pub async fn list_templates(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let templates = EmailTemplateRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: templates }))
}

// ---------------------------------------------------------------------------
// GET /admin/email-templates/{key}
// ---------------------------------------------------------------------------

pub async fn get_template(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key = EmailTemplateKey::from_str_db(&key)?;
    let template = EmailTemplateRepo::find_by_key(&state.pool, key)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Email template '{}' not found", key.as_str()))
        })?;
    Ok(Json(DataResponse { data: template }))
}

// ---------------------------------------------------------------------------
// PUT /admin/email-templates/{key}
// ---------------------------------------------------------------------------

/// Create or replace the template for `key`.
pub async fn upsert_template(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(mut body): Json<UpsertEmailTemplate>,
) -> AppResult<impl IntoResponse> {
    let key = EmailTemplateKey::from_str_db(&key)?;
    validate_envelope(&body.subject, body.preview_text.as_deref())?;

    // Store the canonical shape: unknown fields dropped, defaults filled in.
    body.content = EmailTemplateContent::parse(key, &body.content)?.to_value();

    let template = EmailTemplateRepo::upsert(&state.pool, key, &body).await?;

    tracing::info!(
        key = key.as_str(),
        is_active = template.is_active,
        user_id = %admin.user_id,
        "Email template saved"
    );

    Ok(Json(DataResponse { data: template }))
}
