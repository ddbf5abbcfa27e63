//! Mapping from domain and database failures to JSON error responses.
//!
//! Every error body carries `error` (a message safe to show) and `code` (a
//! stable machine-readable tag). Unknown-category rejections also list the
//! offending inputs under `unknown`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use newsdesk_core::error::CoreError;
use serde_json::{json, Value};

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// PostgreSQL SQLSTATE codes the API reacts to.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Lookups by slug, section or template key, where there is no id to
    /// put in [`CoreError::NotFound`].
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// What a failure looks like on the wire.
struct Rendered {
    status: StatusCode,
    code: &'static str,
    message: String,
    unknown: Option<Vec<String>>,
}

impl Rendered {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            unknown: None,
        }
    }

    fn internal(detail: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", INTERNAL_MESSAGE)
    }
}

impl AppError {
    fn render(&self) -> Rendered {
        match self {
            AppError::Core(core) => render_core(core),
            AppError::Database(err) => render_sqlx(err),
            AppError::NotFound(msg) => Rendered::new(StatusCode::NOT_FOUND, "NOT_FOUND", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rendered = self.render();
        let mut body = json!({
            "error": rendered.message,
            "code": rendered.code,
        });
        if let (Some(unknown), Value::Object(map)) = (rendered.unknown, &mut body) {
            map.insert("unknown".to_string(), json!(unknown));
        }
        (rendered.status, Json(body)).into_response()
    }
}

fn render_core(err: &CoreError) -> Rendered {
    match err {
        CoreError::NotFound { entity, id } => Rendered::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            Rendered::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg)
        }
        CoreError::UnknownCategories(unknown) => Rendered {
            unknown: Some(unknown.clone()),
            ..Rendered::new(StatusCode::BAD_REQUEST, "UNKNOWN_CATEGORIES", err.to_string())
        },
        CoreError::Unauthorized(msg) => Rendered::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
        CoreError::Forbidden(msg) => Rendered::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg),
    }
}

/// `RowNotFound` is 404. Unique violations on `uq_*` constraints are 409,
/// foreign-key and check violations are 400. Anything else is logged and
/// answered with a generic 500.
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return Rendered::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => db_err,
        other => return Rendered::internal(other),
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match db_err.code().as_deref() {
        Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => Rendered::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            duplicate_message(constraint),
        ),
        Some(FOREIGN_KEY_VIOLATION) => Rendered::new(
            StatusCode::BAD_REQUEST,
            "REFERENCE_NOT_FOUND",
            "A referenced record does not exist",
        ),
        Some(CHECK_VIOLATION) => Rendered::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value rejected by {constraint}"),
        ),
        _ => Rendered::internal(db_err),
    }
}

fn duplicate_message(constraint: &str) -> String {
    let what = match constraint {
        "uq_articles_slug" => "An article with this slug",
        "uq_categories_slug" => "A category with this slug",
        "uq_categories_name_lower" => "A category with this name",
        "uq_ai_prompts_name" => "An AI prompt with this name",
        "uq_ai_prompt_versions_prompt_version" => "This prompt version",
        "uq_email_templates_key" => "A template for this key",
        _ => return format!("Duplicate value violates {constraint}"),
    };
    format!("{what} already exists")
}
