//! AI prompt versioning.
//!
//! A prompt keeps its live state plus an append-only history. Every update
//! that changes a tracked field first archives the prior state under the
//! prompt's current version number, then bumps the live version by one
//! minor step (`1.0` -> `1.1` -> `1.2`). Restoring re-applies an archived
//! state through the same path, with a change description naming the
//! source version.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for a prompt name in characters.
pub const MAX_PROMPT_NAME_LENGTH: usize = 200;

/// Maximum length for a prompt section in characters.
pub const MAX_SECTION_LENGTH: usize = 200;

/// Maximum length for prompt text in characters.
pub const MAX_PROMPT_TEXT_LENGTH: usize = 20_000;

/// Maximum length for a version change description in characters.
pub const MAX_CHANGE_DESCRIPTION_LENGTH: usize = 1_000;

// ---------------------------------------------------------------------------
// Version numbers
// ---------------------------------------------------------------------------

/// Dotted `major.minor` prompt version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VersionNumber {
    pub major: u32,
    pub minor: u32,
}

impl VersionNumber {
    /// Version assigned to newly created prompts.
    pub const INITIAL: Self = Self { major: 1, minor: 0 };

    pub fn next_minor(self) -> Self {
        Self {
            major: self.major,
            minor: self.minor + 1,
        }
    }
}

impl Default for VersionNumber {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for VersionNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::Validation(format!("Invalid version number '{s}'"));
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for VersionNumber {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VersionNumber> for String {
    fn from(value: VersionNumber) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// AI providers
// ---------------------------------------------------------------------------

/// LLM vendor a prompt's model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Google,
    Perplexity,
}

impl AiProvider {
    /// Infer the provider from a model identifier such as `gpt-4o` or
    /// `claude-3-5-sonnet-latest`.
    pub fn for_model(model: &str) -> Result<Self, CoreError> {
        let model = model.trim().to_ascii_lowercase();
        let provider = if model.starts_with("gpt-")
            || model.starts_with("o1")
            || model.starts_with("o3")
            || model.starts_with("o4")
        {
            Self::OpenAi
        } else if model.starts_with("claude-") {
            Self::Anthropic
        } else if model.starts_with("gemini-") {
            Self::Google
        } else if model.starts_with("sonar") {
            Self::Perplexity
        } else {
            return Err(CoreError::Validation(format!(
                "Unsupported model '{model}'. Expected a gpt-, o1/o3/o4, claude-, gemini- or sonar model"
            )));
        };
        Ok(provider)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Perplexity => "perplexity",
        }
    }
}

// ---------------------------------------------------------------------------
// Tracked fields
// ---------------------------------------------------------------------------

/// The versioned state of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFields {
    pub name: String,
    pub model: String,
    pub section: String,
    pub prompt: String,
}

/// A partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromptPatch {
    pub name: Option<String>,
    pub model: Option<String>,
    pub section: Option<String>,
    pub prompt: Option<String>,
}

/// A tracked field of [`PromptFields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptField {
    Name,
    Model,
    Section,
    Prompt,
}

impl PromptField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Model => "model",
            Self::Section => "section",
            Self::Prompt => "prompt",
        }
    }
}

impl PromptPatch {
    /// Merge the patch over `current`.
    pub fn apply(&self, current: &PromptFields) -> PromptFields {
        PromptFields {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            model: self.model.clone().unwrap_or_else(|| current.model.clone()),
            section: self.section.clone().unwrap_or_else(|| current.section.clone()),
            prompt: self.prompt.clone().unwrap_or_else(|| current.prompt.clone()),
        }
    }

    /// Validate only the fields the patch sets.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            validate_prompt_name(name)?;
        }
        if let Some(model) = &self.model {
            AiProvider::for_model(model)?;
        }
        if let Some(section) = &self.section {
            validate_section(section)?;
        }
        if let Some(prompt) = &self.prompt {
            validate_prompt_text(prompt)?;
        }
        Ok(())
    }
}

impl From<PromptFields> for PromptPatch {
    fn from(fields: PromptFields) -> Self {
        Self {
            name: Some(fields.name),
            model: Some(fields.model),
            section: Some(fields.section),
            prompt: Some(fields.prompt),
        }
    }
}

impl PromptFields {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_prompt_name(&self.name)?;
        AiProvider::for_model(&self.model)?;
        validate_section(&self.section)?;
        validate_prompt_text(&self.prompt)
    }
}

/// Tracked fields that differ between `old` and `new`, in declaration order.
pub fn changed_fields(old: &PromptFields, new: &PromptFields) -> Vec<PromptField> {
    [
        (PromptField::Name, old.name != new.name),
        (PromptField::Model, old.model != new.model),
        (PromptField::Section, old.section != new.section),
        (PromptField::Prompt, old.prompt != new.prompt),
    ]
    .into_iter()
    .filter_map(|(field, changed)| changed.then_some(field))
    .collect()
}

/// Default change description for an update, e.g. `Updated model, prompt`.
pub fn change_description(changed: &[PromptField]) -> String {
    let names: Vec<&str> = changed.iter().map(PromptField::as_str).collect();
    format!("Updated {}", names.join(", "))
}

/// Change description recorded when restoring an archived version.
pub fn restore_description(source: VersionNumber) -> String {
    format!("Restored from version {source}")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_prompt_name(name: &str) -> Result<(), CoreError> {
    require_text("Prompt name", name, MAX_PROMPT_NAME_LENGTH)
}

pub fn validate_section(section: &str) -> Result<(), CoreError> {
    require_text("Prompt section", section, MAX_SECTION_LENGTH)
}

pub fn validate_prompt_text(prompt: &str) -> Result<(), CoreError> {
    require_text("Prompt text", prompt, MAX_PROMPT_TEXT_LENGTH)
}

/// Validate change description: length check only.
pub fn validate_change_description(description: &str) -> Result<(), CoreError> {
    let len = description.chars().count();
    if len > MAX_CHANGE_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Change description exceeds maximum length of \
             {MAX_CHANGE_DESCRIPTION_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

fn require_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> PromptFields {
        PromptFields {
            name: "Article writer".into(),
            model: "gpt-4o".into(),
            section: "article".into(),
            prompt: "Write an article about {topic}".into(),
        }
    }

    // -- VersionNumber --

    #[test]
    fn version_parses_and_prints() {
        let v: VersionNumber = "1.12".parse().unwrap();
        assert_eq!(v, VersionNumber { major: 1, minor: 12 });
        assert_eq!(v.to_string(), "1.12");
    }

    #[test]
    fn malformed_versions_are_rejected() {
        for bad in ["", "1", "1.", ".1", "a.b", "1.2.3"] {
            assert!(bad.parse::<VersionNumber>().is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn next_minor_increments_by_one() {
        let v = VersionNumber::INITIAL.next_minor().next_minor();
        assert_eq!(v.to_string(), "1.2");
    }

    #[test]
    fn minor_versions_order_numerically() {
        let nine: VersionNumber = "1.9".parse().unwrap();
        let ten: VersionNumber = "1.10".parse().unwrap();
        assert!(ten > nine);
    }

    #[test]
    fn version_serializes_as_string() {
        let json = serde_json::to_string(&VersionNumber::INITIAL).unwrap();
        assert_eq!(json, "\"1.0\"");
        let back: VersionNumber = serde_json::from_str("\"2.3\"").unwrap();
        assert_eq!(back, VersionNumber { major: 2, minor: 3 });
    }

    // -- AiProvider --

    #[test]
    fn provider_is_inferred_from_model() {
        assert_eq!(AiProvider::for_model("gpt-4o").unwrap(), AiProvider::OpenAi);
        assert_eq!(AiProvider::for_model("o3-mini").unwrap(), AiProvider::OpenAi);
        assert_eq!(
            AiProvider::for_model("claude-3-5-sonnet-latest").unwrap(),
            AiProvider::Anthropic
        );
        assert_eq!(AiProvider::for_model("gemini-1.5-pro").unwrap(), AiProvider::Google);
        assert_eq!(AiProvider::for_model("sonar-pro").unwrap(), AiProvider::Perplexity);
    }

    #[test]
    fn unknown_model_is_rejected() {
        assert!(AiProvider::for_model("llama-3").is_err());
    }

    // -- patches and change detection --

    #[test]
    fn patch_merges_over_current() {
        let patch = PromptPatch {
            prompt: Some("New text".into()),
            ..Default::default()
        };
        let merged = patch.apply(&fields());
        assert_eq!(merged.prompt, "New text");
        assert_eq!(merged.name, "Article writer");
    }

    #[test]
    fn unchanged_patch_has_no_changed_fields() {
        let patch = PromptPatch {
            name: Some("Article writer".into()),
            ..Default::default()
        };
        assert!(changed_fields(&fields(), &patch.apply(&fields())).is_empty());
    }

    #[test]
    fn changed_fields_are_reported_in_order() {
        let patch = PromptPatch {
            prompt: Some("Other".into()),
            model: Some("claude-3-haiku".into()),
            ..Default::default()
        };
        let changed = changed_fields(&fields(), &patch.apply(&fields()));
        assert_eq!(changed, vec![PromptField::Model, PromptField::Prompt]);
        assert_eq!(change_description(&changed), "Updated model, prompt");
    }

    #[test]
    fn restore_description_names_source_version() {
        assert_eq!(
            restore_description(VersionNumber::INITIAL),
            "Restored from version 1.0"
        );
    }

    // -- validation --

    #[test]
    fn full_fields_validate() {
        assert!(fields().validate().is_ok());
    }

    #[test]
    fn empty_prompt_text_is_rejected() {
        let err = validate_prompt_text("  ").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn patch_validation_checks_only_set_fields() {
        assert!(PromptPatch::default().validate().is_ok());
        let bad = PromptPatch {
            model: Some("mystery".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn long_change_description_is_rejected() {
        let long = "c".repeat(MAX_CHANGE_DESCRIPTION_LENGTH + 1);
        assert!(validate_change_description(&long).is_err());
    }
}
