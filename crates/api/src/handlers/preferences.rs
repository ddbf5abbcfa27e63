//! Handlers for the signed-in reader's own preferences.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use newsdesk_core::preferences::{CategorySubscription, EmailFrequency, ReaderPreferences};
use newsdesk_db::repositories::{CategoryRepo, UserPreferencesRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /me/preferences`.
///
/// With `all_categories` unset or `true` the `categories` list is ignored;
/// otherwise every entry (name or id) must resolve.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    #[serde(default = "default_all_categories")]
    pub all_categories: bool,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub email_frequency: EmailFrequency,
}

fn default_all_categories() -> bool {
    true
}

// ---------------------------------------------------------------------------
// GET /me/preferences
// ---------------------------------------------------------------------------

/// The caller's preferences; defaults if nothing was saved yet.
pub async fn get_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let prefs = UserPreferencesRepo::find(&state.pool, auth.user_id)
        .await?
        .map(|row| row.reader_preferences())
        .unwrap_or_default();
    Ok(Json(DataResponse { data: prefs }))
}

// ---------------------------------------------------------------------------
// PUT /me/preferences
// ---------------------------------------------------------------------------

pub async fn update_preferences(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<UpdatePreferencesRequest>,
) -> AppResult<impl IntoResponse> {
    let categories = if body.all_categories {
        CategorySubscription::All
    } else {
        let ids = CategoryRepo::resolve(&state.pool, &body.categories)
            .await?
            .into_ids()?;
        CategorySubscription::Selected(ids)
    };

    let prefs = ReaderPreferences {
        categories,
        email_frequency: body.email_frequency,
    };
    let saved = UserPreferencesRepo::upsert(&state.pool, auth.user_id, &prefs).await?;

    tracing::info!(
        user_id = %auth.user_id,
        email_frequency = saved.email_frequency.as_str(),
        all_categories = saved.all_categories,
        "Preferences saved"
    );

    Ok(Json(DataResponse {
        data: saved.reader_preferences(),
    }))
}
