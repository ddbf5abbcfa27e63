//! Handlers for categories.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use newsdesk_core::article::{slugify, validate_slug};
use newsdesk_core::category::{validate_category_description, validate_category_name};
use newsdesk_core::error::CoreError;
use newsdesk_core::types::DbId;
use newsdesk_db::models::category::{CreateCategory, UpdateCategory};
use newsdesk_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating a category. The slug is derived from the
/// name when omitted.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

fn validate_fields(
    name: Option<&str>,
    slug: Option<&str>,
    description: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(name) = name {
        validate_category_name(name)?;
    }
    if let Some(slug) = slug {
        validate_slug(slug)?;
    }
    if let Some(description) = description {
        validate_category_description(description)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /categories
// ---------------------------------------------------------------------------

pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

// ---------------------------------------------------------------------------
// GET /categories/{slug}
// ---------------------------------------------------------------------------

pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category '{slug}' not found")))?;
    Ok(Json(DataResponse { data: category }))
}

// ---------------------------------------------------------------------------
// POST /admin/categories
// ---------------------------------------------------------------------------

pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> AppResult<impl IntoResponse> {
    let slug = body.slug.unwrap_or_else(|| slugify(&body.name));
    validate_fields(Some(&body.name), Some(&slug), body.description.as_deref())?;

    let input = CreateCategory {
        name: body.name,
        slug,
        description: body.description,
    };
    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        category_id = %category.id,
        name = %category.name,
        user_id = %admin.user_id,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

// ---------------------------------------------------------------------------
// PUT /admin/categories/{id}
// ---------------------------------------------------------------------------

pub async fn update_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    validate_fields(
        body.name.as_deref(),
        body.slug.as_deref(),
        body.description.as_deref(),
    )?;

    let category = CategoryRepo::update(&state.pool, id, &body)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    tracing::info!(category_id = %id, user_id = %admin.user_id, "Category updated");
    Ok(Json(DataResponse { data: category }))
}

// ---------------------------------------------------------------------------
// DELETE /admin/categories/{id}
// ---------------------------------------------------------------------------

/// Delete a category. Articles keep existing; only their membership goes.
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CategoryRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }

    tracing::info!(category_id = %id, user_id = %admin.user_id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
