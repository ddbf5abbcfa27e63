//! Repository for `ai_prompts` and their archived `ai_prompt_versions`.
//!
//! Writes that change a prompt go through [`AiPromptRepo::update`] or
//! [`AiPromptRepo::restore`]. Both lock the prompt row, archive its current
//! state under the current version number and bump the live version, all
//! inside one transaction, so two concurrent editors can never archive the
//! same version twice.

use newsdesk_core::prompt_versioning::{self, PromptFields, PromptPatch, VersionNumber};
use newsdesk_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::ai_prompt::{AiPrompt, AiPromptVersion};

/// Column list for ai_prompts queries.
const COLUMNS: &str = "id, name, model, section, prompt, version, created_at, updated_at";

/// Column list for ai_prompt_versions queries.
const VERSION_COLUMNS: &str =
    "id, prompt_id, version, name, model, section, prompt, change_description, created_at";

/// Provides CRUD and versioning operations for AI prompts.
pub struct AiPromptRepo;

impl AiPromptRepo {
    // -----------------------------------------------------------------------
    // Prompts
    // -----------------------------------------------------------------------

    /// Insert a new prompt at the initial version.
    pub async fn create(pool: &PgPool, input: &PromptFields) -> Result<AiPrompt, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_prompts (name, model, section, prompt, version)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiPrompt>(&query)
            .bind(&input.name)
            .bind(&input.model)
            .bind(&input.section)
            .bind(&input.prompt)
            .bind(VersionNumber::INITIAL.to_string())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AiPrompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_prompts WHERE id = $1");
        sqlx::query_as::<_, AiPrompt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The prompt configured for a site section. When several prompts share
    /// a section the most recently updated one wins.
    pub async fn find_by_section(
        pool: &PgPool,
        section: &str,
    ) -> Result<Option<AiPrompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ai_prompts
             WHERE section = $1
             ORDER BY updated_at DESC, id
             LIMIT 1"
        );
        sqlx::query_as::<_, AiPrompt>(&query)
            .bind(section)
            .fetch_optional(pool)
            .await
    }

    /// List all prompts ordered by section, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<AiPrompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_prompts ORDER BY section, name");
        sqlx::query_as::<_, AiPrompt>(&query).fetch_all(pool).await
    }

    /// Delete a prompt and its history. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ai_prompts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Versioned writes
    // -----------------------------------------------------------------------

    /// Apply `patch` to a prompt.
    ///
    /// If no tracked field actually changes, the prompt is returned as is
    /// and no version is written. Otherwise the prior state is archived with
    /// `change_description` (or a generated one such as `Updated prompt`)
    /// and the live version is bumped. Returns `None` if the prompt does not
    /// exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &PromptPatch,
        change_description: Option<&str>,
    ) -> Result<Option<AiPrompt>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock(&mut *tx, id).await? else {
            return Ok(None);
        };

        let next = patch.apply(&current.fields());
        let changed = prompt_versioning::changed_fields(&current.fields(), &next);
        if changed.is_empty() {
            tx.commit().await?;
            return Ok(Some(current));
        }

        let description = change_description
            .map(str::to_string)
            .unwrap_or_else(|| prompt_versioning::change_description(&changed));
        Self::archive(&mut *tx, &current, &description).await?;
        let updated = Self::write_next_version(&mut *tx, &current, &next).await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Re-apply an archived version to its prompt.
    ///
    /// The current state is archived with `Restored from version X` before
    /// the archived fields are written back under a new version number.
    /// Returns `None` if the prompt or the version does not exist, or the
    /// version belongs to another prompt.
    pub async fn restore(
        pool: &PgPool,
        prompt_id: DbId,
        version_id: DbId,
    ) -> Result<Option<AiPrompt>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock(&mut *tx, prompt_id).await? else {
            return Ok(None);
        };

        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM ai_prompt_versions
             WHERE id = $1 AND prompt_id = $2"
        );
        let source = sqlx::query_as::<_, AiPromptVersion>(&query)
            .bind(version_id)
            .bind(prompt_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(source) = source else {
            return Ok(None);
        };

        let description = prompt_versioning::restore_description(source.version);
        Self::archive(&mut *tx, &current, &description).await?;
        let restored = Self::write_next_version(&mut *tx, &current, &source.fields()).await?;

        tx.commit().await?;
        Ok(Some(restored))
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Archived versions of a prompt, newest first.
    pub async fn list_versions(
        pool: &PgPool,
        prompt_id: DbId,
    ) -> Result<Vec<AiPromptVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM ai_prompt_versions
             WHERE prompt_id = $1
             ORDER BY split_part(version, '.', 1)::int DESC,
                      split_part(version, '.', 2)::int DESC"
        );
        sqlx::query_as::<_, AiPromptVersion>(&query)
            .bind(prompt_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_version(
        pool: &PgPool,
        prompt_id: DbId,
        version_id: DbId,
    ) -> Result<Option<AiPromptVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM ai_prompt_versions
             WHERE id = $1 AND prompt_id = $2"
        );
        sqlx::query_as::<_, AiPromptVersion>(&query)
            .bind(version_id)
            .bind(prompt_id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Load a prompt with `FOR UPDATE`, serializing concurrent writers.
    async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<AiPrompt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_prompts WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, AiPrompt>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Snapshot `current` into the history table under its own version.
    async fn archive(
        conn: &mut PgConnection,
        current: &AiPrompt,
        change_description: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO ai_prompt_versions
                (prompt_id, version, name, model, section, prompt, change_description)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(current.id)
        .bind(current.version.to_string())
        .bind(&current.name)
        .bind(&current.model)
        .bind(&current.section)
        .bind(&current.prompt)
        .bind(change_description)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Write `fields` as the live state with the next minor version.
    async fn write_next_version(
        conn: &mut PgConnection,
        current: &AiPrompt,
        fields: &PromptFields,
    ) -> Result<AiPrompt, sqlx::Error> {
        let query = format!(
            "UPDATE ai_prompts SET
                name       = $1,
                model      = $2,
                section    = $3,
                prompt     = $4,
                version    = $5,
                updated_at = now()
             WHERE id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiPrompt>(&query)
            .bind(&fields.name)
            .bind(&fields.model)
            .bind(&fields.section)
            .bind(&fields.prompt)
            .bind(current.version.next_minor().to_string())
            .bind(current.id)
            .fetch_one(&mut *conn)
            .await
    }
}
