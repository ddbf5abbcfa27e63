//! Email template model and DTOs.

use newsdesk_core::email_template::EmailTemplateKey;
use newsdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `email_templates` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: DbId,
    #[sqlx(try_from = "String")]
    pub key: EmailTemplateKey,
    pub subject: String,
    pub preview_text: Option<String>,
    pub content: serde_json::Value,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full replacement of a template's editable fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertEmailTemplate {
    pub subject: String,
    pub preview_text: Option<String>,
    pub content: serde_json::Value,
    pub is_active: Option<bool>,
}
