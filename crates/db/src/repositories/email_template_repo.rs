//! Repository for the `email_templates` table.

use newsdesk_core::email_template::EmailTemplateKey;
use sqlx::PgPool;

use crate::models::email_template::{EmailTemplate, UpsertEmailTemplate};

/// Column list for email_templates queries.
const COLUMNS: &str =
    "id, key, subject, preview_text, content, is_active, created_at, updated_at";

/// Provides read and upsert operations for email templates.
pub struct EmailTemplateRepo;

impl EmailTemplateRepo {
    /// List all stored templates ordered by key.
    pub async fn list(pool: &PgPool) -> Result<Vec<EmailTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_templates ORDER BY key");
        sqlx::query_as::<_, EmailTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_key(
        pool: &PgPool,
        key: EmailTemplateKey,
    ) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_templates WHERE key = $1");
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(key.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the template for `key`. A missing `is_active`
    /// keeps the stored flag, or activates a new template.
    pub async fn upsert(
        pool: &PgPool,
        key: EmailTemplateKey,
        input: &UpsertEmailTemplate,
    ) -> Result<EmailTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_templates (key, subject, preview_text, content, is_active)
             VALUES ($1, $2, $3, $4, COALESCE($5, true))
             ON CONFLICT (key) DO UPDATE SET
                subject      = EXCLUDED.subject,
                preview_text = EXCLUDED.preview_text,
                content      = EXCLUDED.content,
                is_active    = COALESCE($5, email_templates.is_active),
                updated_at   = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(key.as_str())
            .bind(&input.subject)
            .bind(&input.preview_text)
            .bind(&input.content)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }
}
