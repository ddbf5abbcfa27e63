//! Article status, slugs and field validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for an article title in characters.
pub const MAX_TITLE_LENGTH: usize = 300;

/// Maximum length for a slug in characters.
pub const MAX_SLUG_LENGTH: usize = 200;

/// Maximum length for the meta description used by search engines.
pub const MAX_META_DESCRIPTION_LENGTH: usize = 320;

/// Maximum length for an article summary.
pub const MAX_SUMMARY_LENGTH: usize = 1_000;

// ---------------------------------------------------------------------------
// Article status
// ---------------------------------------------------------------------------

/// Publication state of an article. Public routes only ever see `Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            _ => Err(CoreError::Validation(format!(
                "Invalid article status '{s}'. Must be one of: draft, published, archived"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl TryFrom<String> for ArticleStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_db(&value)
    }
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Derive a URL-safe slug from a title or name.
///
/// Lowercases, transliterates common Nordic and Latin diacritics, and
/// collapses every run of other characters into a single `-`.
///
/// # Examples
///
/// ```
/// use newsdesk_core::article::slugify;
///
/// assert_eq!(slugify("Slik sparer du p\u{e5} str\u{f8}m!"), "slik-sparer-du-pa-strom");
/// assert_eq!(slugify("  Hello -- World  "), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let mapped: Option<&str> = match c {
            'a'..='z' | '0'..='9' => None,
            '\u{e6}' => Some("ae"),
            '\u{f8}' | '\u{f6}' | '\u{f3}' | '\u{f2}' | '\u{f4}' => Some("o"),
            '\u{e5}' | '\u{e4}' | '\u{e1}' | '\u{e0}' | '\u{e2}' => Some("a"),
            '\u{e9}' | '\u{e8}' | '\u{ea}' | '\u{eb}' => Some("e"),
            '\u{fc}' | '\u{fa}' | '\u{f9}' | '\u{fb}' => Some("u"),
            '\u{ed}' | '\u{ec}' | '\u{ee}' | '\u{ef}' => Some("i"),
            '\u{df}' => Some("ss"),
            '\u{f1}' => Some("n"),
            '\u{e7}' => Some("c"),
            _ => {
                pending_dash = true;
                continue;
            }
        };

        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;

        match mapped {
            Some(s) => slug.push_str(s),
            None => slug.push(c),
        }
    }

    if slug.chars().count() > MAX_SLUG_LENGTH {
        slug = slug.chars().take(MAX_SLUG_LENGTH).collect();
        slug.truncate(slug.trim_end_matches('-').len());
    }
    slug
}

/// Validate a caller-supplied slug: lowercase ASCII words joined by single dashes.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    let well_formed = !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    if well_formed {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single dashes"
        )))
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate an article title: must be non-empty and within length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Article title must not be empty".to_string(),
        ));
    }
    check_length("Article title", title, MAX_TITLE_LENGTH)
}

/// Validate the article body: must be non-empty.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Article content must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_summary(summary: &str) -> Result<(), CoreError> {
    check_length("Summary", summary, MAX_SUMMARY_LENGTH)
}

pub fn validate_meta_description(meta: &str) -> Result<(), CoreError> {
    check_length("Meta description", meta, MAX_META_DESCRIPTION_LENGTH)
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
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
