//! Category reference resolution.
//!
//! Admin requests name categories either by id or by display name. A batch
//! is in *id mode* when every entry is UUID-shaped, otherwise it is in *name
//! mode* and matched case-insensitively. Anything that does not resolve is
//! reported back as `unknown`; callers reject the whole batch in that case.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a category name.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Maximum length of a category description.
pub const MAX_CATEGORY_DESCRIPTION_LENGTH: usize = 1_000;

/// 8-4-4-4-12 hex groups, any case.
static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid regex")
});

/// Whether `value` has the canonical hyphenated UUID shape.
pub fn is_uuid(value: &str) -> bool {
    UUID_RE.is_match(value)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A batch of category references after trimming and classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRefs {
    /// Nothing to resolve.
    Empty,
    /// Every entry is UUID-shaped. Pairs are `(original input, parsed id)`.
    Ids(Vec<(String, DbId)>),
    /// At least one entry is not a UUID; all entries are treated as names.
    Names(Vec<String>),
}

/// Trim the inputs, drop blanks, and decide between id and name mode.
pub fn classify<S: AsRef<str>>(inputs: &[S]) -> CategoryRefs {
    let cleaned: Vec<String> = inputs
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if cleaned.is_empty() {
        return CategoryRefs::Empty;
    }

    if cleaned.iter().all(|s| is_uuid(s)) {
        let ids = cleaned
            .into_iter()
            .filter_map(|s| DbId::parse_str(&s).ok().map(|id| (s, id)))
            .collect();
        CategoryRefs::Ids(ids)
    } else {
        CategoryRefs::Names(cleaned)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of resolving a batch of category references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryResolution {
    /// Resolved ids, de-duplicated, in input order.
    pub ids: Vec<DbId>,
    /// Inputs that matched nothing, as given.
    pub unknown: Vec<String>,
}

impl CategoryResolution {
    pub fn is_complete(&self) -> bool {
        self.unknown.is_empty()
    }

    /// The resolved ids, or [`CoreError::UnknownCategories`] if anything
    /// failed to resolve.
    pub fn into_ids(self) -> Result<Vec<DbId>, CoreError> {
        if self.unknown.is_empty() {
            Ok(self.ids)
        } else {
            Err(CoreError::UnknownCategories(self.unknown))
        }
    }

    fn push(&mut self, seen: &mut HashSet<DbId>, input: String, id: Option<DbId>) {
        match id {
            Some(id) => {
                if seen.insert(id) {
                    self.ids.push(id);
                }
            }
            None => self.unknown.push(input),
        }
    }
}

/// Resolve names against the full category table, ignoring case.
pub fn resolve_names<'a>(
    names: Vec<String>,
    known: impl IntoIterator<Item = (DbId, &'a str)>,
) -> CategoryResolution {
    let by_name: HashMap<String, DbId> = known
        .into_iter()
        .map(|(id, name)| (name.trim().to_lowercase(), id))
        .collect();

    let mut resolution = CategoryResolution::default();
    let mut seen = HashSet::new();
    for name in names {
        let id = by_name.get(&name.to_lowercase()).copied();
        resolution.push(&mut seen, name, id);
    }
    resolution
}

/// Resolve parsed ids against the set of ids that exist.
pub fn resolve_ids(ids: Vec<(String, DbId)>, existing: &HashSet<DbId>) -> CategoryResolution {
    let mut resolution = CategoryResolution::default();
    let mut seen = HashSet::new();
    for (input, id) in ids {
        let found = existing.contains(&id).then_some(id);
        resolution.push(&mut seen, input, found);
    }
    resolution
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a category name: non-empty, bounded, and not UUID-shaped (a
/// UUID-shaped name could never be resolved by name).
pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Category name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Category name exceeds maximum length of {MAX_CATEGORY_NAME_LENGTH} characters"
        )));
    }
    if is_uuid(trimmed) {
        return Err(CoreError::Validation(
            "Category name must not look like an id".to_string(),
        ));
    }
    Ok(())
}

/// Validate an optional category description.
pub fn validate_category_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_CATEGORY_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Category description exceeds maximum length of \
             {MAX_CATEGORY_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    // -- is_uuid --

    #[test]
    fn uuid_shape_is_case_insensitive() {
        assert!(is_uuid("0b6f1a52-3c1e-4c7d-9a55-0f6a2b9c1d2e"));
        assert!(is_uuid("0B6F1A52-3C1E-4C7D-9A55-0F6A2B9C1D2E"));
    }

    #[test]
    fn non_uuid_shapes_are_rejected() {
        assert!(!is_uuid("Investering"));
        assert!(!is_uuid("0b6f1a523c1e4c7d9a550f6a2b9c1d2e"));
        assert!(!is_uuid(" 0b6f1a52-3c1e-4c7d-9a55-0f6a2b9c1d2e"));
        assert!(!is_uuid("0b6f1a52-3c1e-4c7d-9a55-0f6a2b9c1d2g"));
    }

    // -- classify --

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(classify(&["", "   "]), CategoryRefs::Empty);
        assert_eq!(classify::<&str>(&[]), CategoryRefs::Empty);
    }

    #[test]
    fn all_uuids_is_id_mode() {
        let id = Uuid::new_v4();
        let refs = classify(&[format!(" {id} ")]);
        assert_eq!(refs, CategoryRefs::Ids(vec![(id.to_string(), id)]));
    }

    #[test]
    fn mixed_input_is_name_mode() {
        let id = Uuid::new_v4().to_string();
        let refs = classify(&[id.clone(), "Sparing".to_string()]);
        assert_eq!(refs, CategoryRefs::Names(vec![id, "Sparing".to_string()]));
    }

    // -- resolve_names --

    #[test]
    fn known_and_unknown_names_are_split() {
        let investering = Uuid::new_v4();
        let resolution = resolve_names(
            vec!["Investering".to_string(), "Unknown Cat".to_string()],
            [(investering, "Investering")],
        );
        assert_eq!(resolution.ids, vec![investering]);
        assert_eq!(resolution.unknown, vec!["Unknown Cat".to_string()]);
        assert!(!resolution.is_complete());
    }

    #[test]
    fn names_match_ignoring_case_and_deduplicate() {
        let sparing = Uuid::new_v4();
        let lan = Uuid::new_v4();
        let resolution = resolve_names(
            vec!["sparing".into(), "L\u{c5}N".into(), "SPARING".into()],
            [(sparing, "Sparing"), (lan, "L\u{e5}n")],
        );
        assert_eq!(resolution.ids, vec![sparing, lan]);
        assert!(resolution.is_complete());
    }

    // -- resolve_ids --

    #[test]
    fn missing_ids_are_unknown() {
        let present = Uuid::new_v4();
        let missing = Uuid::new_v4();
        let existing: HashSet<DbId> = [present].into();
        let resolution = resolve_ids(
            vec![(present.to_string(), present), (missing.to_string(), missing)],
            &existing,
        );
        assert_eq!(resolution.ids, vec![present]);
        assert_eq!(resolution.unknown, vec![missing.to_string()]);
    }

    // -- into_ids --

    #[test]
    fn incomplete_resolution_is_rejected_as_a_whole() {
        let resolution = CategoryResolution {
            ids: vec![Uuid::new_v4()],
            unknown: vec!["Nope".into()],
        };
        assert_matches!(
            resolution.into_ids(),
            Err(CoreError::UnknownCategories(names)) if names == vec!["Nope".to_string()]
        );
    }

    #[test]
    fn complete_resolution_yields_ids() {
        let id = Uuid::new_v4();
        let resolution = CategoryResolution {
            ids: vec![id],
            unknown: vec![],
        };
        assert_eq!(resolution.into_ids().unwrap(), vec![id]);
    }

    // -- validation --

    #[test]
    fn category_name_rules() {
        assert!(validate_category_name("Aksjer").is_ok());
        assert!(validate_category_name("  ").is_err());
        assert!(validate_category_name(&"x".repeat(MAX_CATEGORY_NAME_LENGTH + 1)).is_err());
        assert!(validate_category_name(&Uuid::new_v4().to_string()).is_err());
    }
}
