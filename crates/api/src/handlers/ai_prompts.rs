//! Handlers for AI prompt management and version history.
//!
//! Every successful write clears the per-process prompt cache so the next
//! section lookup reads the new state.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use newsdesk_core::error::CoreError;
use newsdesk_core::prompt_versioning::{self, PromptFields};
use newsdesk_core::types::DbId;
use newsdesk_db::models::ai_prompt::{AiPrompt, UpdateAiPrompt};
use newsdesk_db::repositories::AiPromptRepo;
use newsdesk_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_prompt_exists(pool: &DbPool, id: DbId) -> AppResult<AiPrompt> {
    AiPromptRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AiPrompt",
            id,
        }))
}

// ---------------------------------------------------------------------------
// GET /admin/ai-prompts
// ---------------------------------------------------------------------------

pub async fn list_prompts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let prompts = AiPromptRepo::list(&state.pool).await?;
    tracing::debug!(count = prompts.len(), "Listed AI prompts");
    Ok(Json(DataResponse { data: prompts }))
}

// ---------------------------------------------------------------------------
// POST /admin/ai-prompts
// ---------------------------------------------------------------------------

/// Create a prompt at version 1.0.
pub async fn create_prompt(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<PromptFields>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;

    let prompt = AiPromptRepo::create(&state.pool, &body).await?;
    state.prompt_cache.clear();

    tracing::info!(
        prompt_id = %prompt.id,
        section = %prompt.section,
        user_id = %admin.user_id,
        "AI prompt created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: prompt })))
}

// ---------------------------------------------------------------------------
// GET /admin/ai-prompts/{id}
// ---------------------------------------------------------------------------

pub async fn get_prompt(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = ensure_prompt_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: prompt }))
}

// ---------------------------------------------------------------------------
// PUT /admin/ai-prompts/{id}
// ---------------------------------------------------------------------------

/// Update a prompt. A change to any tracked field archives the previous
/// state and bumps the version; an update that changes nothing is a no-op.
pub async fn update_prompt(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateAiPrompt>,
) -> AppResult<impl IntoResponse> {
    let patch = body.patch();
    patch.validate()?;
    if let Some(description) = &body.change_description {
        prompt_versioning::validate_change_description(description)?;
    }

    let prompt = AiPromptRepo::update(&state.pool, id, &patch, body.change_description.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AiPrompt",
            id,
        }))?;
    state.prompt_cache.clear();

    tracing::info!(
        prompt_id = %id,
        version = %prompt.version,
        user_id = %admin.user_id,
        "AI prompt updated"
    );

    Ok(Json(DataResponse { data: prompt }))
}

// ---------------------------------------------------------------------------
// DELETE /admin/ai-prompts/{id}
// ---------------------------------------------------------------------------

/// Delete a prompt together with its version history.
pub async fn delete_prompt(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AiPromptRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "AiPrompt",
            id,
        }));
    }
    state.prompt_cache.clear();

    tracing::info!(prompt_id = %id, user_id = %admin.user_id, "AI prompt deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /admin/ai-prompts/{id}/versions
// ---------------------------------------------------------------------------

/// Archived versions of a prompt, newest first.
pub async fn list_versions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_prompt_exists(&state.pool, id).await?;
    let versions = AiPromptRepo::list_versions(&state.pool, id).await?;

    tracing::debug!(count = versions.len(), prompt_id = %id, "Listed AI prompt versions");
    Ok(Json(DataResponse { data: versions }))
}

// ---------------------------------------------------------------------------
// GET /admin/ai-prompts/{id}/versions/{version_id}
// ---------------------------------------------------------------------------

pub async fn get_version(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let version = AiPromptRepo::find_version(&state.pool, id, version_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AiPromptVersion",
            id: version_id,
        }))?;
    Ok(Json(DataResponse { data: version }))
}

// ---------------------------------------------------------------------------
// POST /admin/ai-prompts/{id}/versions/{version_id}/restore
// ---------------------------------------------------------------------------

/// Re-apply an archived version as a new version.
pub async fn restore_version(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, version_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_prompt_exists(&state.pool, id).await?;

    let prompt = AiPromptRepo::restore(&state.pool, id, version_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AiPromptVersion",
            id: version_id,
        }))?;
    state.prompt_cache.clear();

    tracing::info!(
        prompt_id = %id,
        restored_version_id = %version_id,
        version = %prompt.version,
        user_id = %admin.user_id,
        "AI prompt version restored"
    );

    Ok(Json(DataResponse { data: prompt }))
}

// ---------------------------------------------------------------------------
// GET /admin/ai-prompts/section/{section}
// ---------------------------------------------------------------------------

/// The prompt configured for a section, served from the TTL cache when warm.
///
/// A miss is stored only if no prompt write cleared the cache while the row
/// was being read.
pub async fn get_prompt_for_section(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> AppResult<impl IntoResponse> {
    if let Some(prompt) = state.prompt_cache.get(&section) {
        tracing::debug!(section = %section, "AI prompt cache hit");
        return Ok(Json(DataResponse { data: prompt }));
    }

    let generation = state.prompt_cache.generation();
    let prompt = AiPromptRepo::find_by_section(&state.pool, &section)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No AI prompt for section '{section}'")))?;
    if !state
        .prompt_cache
        .insert_if_generation(generation, section.clone(), prompt.clone())
    {
        tracing::debug!(section = %section, "AI prompt changed during load, not cached");
    }

    tracing::debug!(section = %section, "AI prompt cache miss");
    Ok(Json(DataResponse { data: prompt }))
}
