//! Repository for the `user_preferences` table.

use newsdesk_core::preferences::ReaderPreferences;
use newsdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::user_preferences::UserPreferences;

/// Column list for user_preferences queries.
const COLUMNS: &str =
    "user_id, all_categories, category_ids, email_frequency, created_at, updated_at";

/// Provides read and upsert operations for per-user preferences.
pub struct UserPreferencesRepo;

impl UserPreferencesRepo {
    /// Stored preferences for a user, or `None` if the user never saved any.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserPreferences>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreferences>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or overwrite a user's preferences.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        prefs: &ReaderPreferences,
    ) -> Result<UserPreferences, sqlx::Error> {
        let (all_categories, category_ids) = prefs.categories.to_parts();
        let query = format!(
            "INSERT INTO user_preferences (user_id, all_categories, category_ids, email_frequency)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                all_categories  = EXCLUDED.all_categories,
                category_ids    = EXCLUDED.category_ids,
                email_frequency = EXCLUDED.email_frequency,
                updated_at      = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreferences>(&query)
            .bind(user_id)
            .bind(all_categories)
            .bind(category_ids)
            .bind(prefs.email_frequency.as_str())
            .fetch_one(pool)
            .await
    }
}
