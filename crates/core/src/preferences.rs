//! Reader email preferences and subscription matching.
//!
//! The service only stores preferences. The matching helpers
//! ([`EmailFrequency::is_subscribed`],
//! [`ReaderPreferences::wants_immediate_notification`],
//! [`ReaderPreferences::wants_in_digest`]) are the public interface for the
//! notification and digest jobs, which run outside this workspace and link
//! `newsdesk-core` to decide who gets which email.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Email frequency
// ---------------------------------------------------------------------------

/// How often a reader wants article emails. `Never` is the unsubscribed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailFrequency {
    Immediate,
    Daily,
    #[default]
    Weekly,
    Never,
}

impl EmailFrequency {
    /// Parse a frequency string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "immediate" => Ok(Self::Immediate),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "never" => Ok(Self::Never),
            _ => Err(CoreError::Validation(format!(
                "Invalid email frequency '{s}'. Must be one of: immediate, daily, weekly, never"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Never => "never",
        }
    }

    /// False only for `Never`; notification jobs skip these readers entirely.
    pub fn is_subscribed(&self) -> bool {
        !matches!(self, Self::Never)
    }
}

impl TryFrom<String> for EmailFrequency {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_db(&value)
    }
}

// ---------------------------------------------------------------------------
// Category subscription
// ---------------------------------------------------------------------------

/// Which categories a reader follows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "category_ids", rename_all = "snake_case")]
pub enum CategorySubscription {
    #[default]
    All,
    Selected(Vec<DbId>),
}

impl CategorySubscription {
    /// Build from the stored `(all_categories, category_ids)` pair. An
    /// explicit list is ignored while the all-categories flag is set.
    pub fn from_parts(all_categories: bool, category_ids: Vec<DbId>) -> Self {
        if all_categories {
            Self::All
        } else {
            Self::Selected(category_ids)
        }
    }

    /// Split into the stored `(all_categories, category_ids)` pair.
    pub fn to_parts(&self) -> (bool, Vec<DbId>) {
        match self {
            Self::All => (true, Vec::new()),
            Self::Selected(ids) => (false, ids.clone()),
        }
    }

    /// Whether an article tagged with `article_categories` is covered.
    pub fn matches(&self, article_categories: &[DbId]) -> bool {
        match self {
            Self::All => true,
            Self::Selected(ids) => article_categories.iter().any(|c| ids.contains(c)),
        }
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// A reader's notification settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderPreferences {
    pub categories: CategorySubscription,
    pub email_frequency: EmailFrequency,
}

impl ReaderPreferences {
    /// True when a newly published article should be emailed right away.
    pub fn wants_immediate_notification(&self, article_categories: &[DbId]) -> bool {
        self.email_frequency == EmailFrequency::Immediate
            && self.categories.matches(article_categories)
    }

    /// True when the article belongs in this reader's periodic digest.
    pub fn wants_in_digest(&self, article_categories: &[DbId]) -> bool {
        matches!(
            self.email_frequency,
            EmailFrequency::Daily | EmailFrequency::Weekly
        ) && self.categories.matches(article_categories)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn frequency_round_trips() {
        for f in [
            EmailFrequency::Immediate,
            EmailFrequency::Daily,
            EmailFrequency::Weekly,
            EmailFrequency::Never,
        ] {
            assert_eq!(EmailFrequency::from_str_db(f.as_str()).unwrap(), f);
        }
        assert!(EmailFrequency::from_str_db("hourly").is_err());
    }

    #[test]
    fn never_is_unsubscribed() {
        assert!(!EmailFrequency::Never.is_subscribed());
        assert!(EmailFrequency::Weekly.is_subscribed());
    }

    #[test]
    fn all_flag_wins_over_list() {
        let id = Uuid::new_v4();
        assert_eq!(
            CategorySubscription::from_parts(true, vec![id]),
            CategorySubscription::All
        );
        assert_eq!(
            CategorySubscription::from_parts(false, vec![id]),
            CategorySubscription::Selected(vec![id])
        );
    }

    #[test]
    fn selected_subscription_matches_any_shared_category() {
        let followed = Uuid::new_v4();
        let other = Uuid::new_v4();
        let sub = CategorySubscription::Selected(vec![followed]);
        assert!(sub.matches(&[other, followed]));
        assert!(!sub.matches(&[other]));
        assert!(!sub.matches(&[]));
    }

    #[test]
    fn immediate_notification_requires_frequency_and_match() {
        let cat = Uuid::new_v4();
        let prefs = ReaderPreferences {
            categories: CategorySubscription::Selected(vec![cat]),
            email_frequency: EmailFrequency::Immediate,
        };
        assert!(prefs.wants_immediate_notification(&[cat]));
        assert!(!prefs.wants_in_digest(&[cat]));

        let weekly = ReaderPreferences {
            email_frequency: EmailFrequency::Weekly,
            ..prefs
        };
        assert!(!weekly.wants_immediate_notification(&[cat]));
        assert!(weekly.wants_in_digest(&[cat]));
    }

    #[test]
    fn unsubscribed_reader_gets_nothing() {
        let prefs = ReaderPreferences {
            categories: CategorySubscription::All,
            email_frequency: EmailFrequency::Never,
        };
        assert!(!prefs.wants_immediate_notification(&[]));
        assert!(!prefs.wants_in_digest(&[]));
    }

    #[test]
    fn subscription_serializes_with_mode_tag() {
        let json = serde_json::to_value(CategorySubscription::All).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "all"}));
    }
}
