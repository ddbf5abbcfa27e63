//! AI prompt and prompt version models.

use newsdesk_core::prompt_versioning::{PromptFields, PromptPatch, VersionNumber};
use newsdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A row from the `ai_prompts` table: the live state of a prompt.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AiPrompt {
    pub id: DbId,
    pub name: String,
    pub model: String,
    pub section: String,
    pub prompt: String,
    #[sqlx(try_from = "String")]
    pub version: VersionNumber,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AiPrompt {
    /// The tracked fields, as archived in a version row.
    pub fn fields(&self) -> PromptFields {
        PromptFields {
            name: self.name.clone(),
            model: self.model.clone(),
            section: self.section.clone(),
            prompt: self.prompt.clone(),
        }
    }
}

/// A row from the `ai_prompt_versions` table. Never updated once written.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AiPromptVersion {
    pub id: DbId,
    pub prompt_id: DbId,
    #[sqlx(try_from = "String")]
    pub version: VersionNumber,
    pub name: String,
    pub model: String,
    pub section: String,
    pub prompt: String,
    pub change_description: Option<String>,
    pub created_at: Timestamp,
}

impl AiPromptVersion {
    pub fn fields(&self) -> PromptFields {
        PromptFields {
            name: self.name.clone(),
            model: self.model.clone(),
            section: self.section.clone(),
            prompt: self.prompt.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Request body for updating a prompt. Unset fields keep their value; the
/// optional description is stored on the archived version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAiPrompt {
    pub name: Option<String>,
    pub model: Option<String>,
    pub section: Option<String>,
    pub prompt: Option<String>,
    pub change_description: Option<String>,
}

impl UpdateAiPrompt {
    pub fn patch(&self) -> PromptPatch {
        PromptPatch {
            name: self.name.clone(),
            model: self.model.clone(),
            section: self.section.clone(),
            prompt: self.prompt.clone(),
        }
    }
}
