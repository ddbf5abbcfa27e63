//! Per-user notification preferences.

use newsdesk_core::preferences::{CategorySubscription, EmailFrequency, ReaderPreferences};
use newsdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: DbId,
    pub all_categories: bool,
    pub category_ids: Vec<DbId>,
    #[sqlx(try_from = "String")]
    pub email_frequency: EmailFrequency,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserPreferences {
    pub fn reader_preferences(&self) -> ReaderPreferences {
        ReaderPreferences {
            categories: CategorySubscription::from_parts(
                self.all_categories,
                self.category_ids.clone(),
            ),
            email_frequency: self.email_frequency,
        }
    }
}
