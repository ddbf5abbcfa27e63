//! Editor-only access.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use newsdesk_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Extractor for the `/admin` surface: an authenticated user holding the
/// `admin` role. Readers get 403, anonymous callers 401.
///
/// ```ignore
/// async fn publish(RequireAdmin(editor): RequireAdmin) -> AppResult<StatusCode> {
///     tracing::info!(user_id = %editor.user_id, "publishing");
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!(
                user_id = %user.user_id,
                role = %user.role,
                path = %parts.uri.path(),
                "Admin route refused"
            );
            return Err(AppError::Core(CoreError::Forbidden(
                "Editor access required".into(),
            )));
        }
        Ok(Self(user))
    }
}
