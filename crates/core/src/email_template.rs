//! Email template keys and their content contracts.
//!
//! Each template row stores its body as JSON. The shape of that JSON is
//! decided by the template key, so writes are checked against the matching
//! typed struct before they reach the database.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for an email subject line.
pub const MAX_SUBJECT_LENGTH: usize = 200;

/// Maximum length for inbox preview text.
pub const MAX_PREVIEW_TEXT_LENGTH: usize = 300;

/// Upper bound for the number of articles in a weekly digest.
pub const MAX_DIGEST_ARTICLES: u32 = 50;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Identifies which email a template renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTemplateKey {
    Welcome,
    ArticleNotification,
    WeeklyDigest,
    PasswordReset,
}

impl EmailTemplateKey {
    pub const ALL: [Self; 4] = [
        Self::Welcome,
        Self::ArticleNotification,
        Self::WeeklyDigest,
        Self::PasswordReset,
    ];

    /// Parse a key string from the database or a URL path.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "welcome" => Ok(Self::Welcome),
            "article_notification" => Ok(Self::ArticleNotification),
            "weekly_digest" => Ok(Self::WeeklyDigest),
            "password_reset" => Ok(Self::PasswordReset),
            _ => Err(CoreError::Validation(format!(
                "Invalid email template key '{s}'. Must be one of: welcome, \
                 article_notification, weekly_digest, password_reset"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::ArticleNotification => "article_notification",
            Self::WeeklyDigest => "weekly_digest",
            Self::PasswordReset => "password_reset",
        }
    }
}

impl TryFrom<String> for EmailTemplateKey {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str_db(&value)
    }
}

// ---------------------------------------------------------------------------
// Content contracts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeContent {
    pub heading: String,
    pub intro: String,
    pub cta_label: String,
    pub cta_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleNotificationContent {
    pub heading: String,
    pub intro: String,
    pub read_more_label: String,
    #[serde(default)]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyDigestContent {
    pub heading: String,
    pub intro: String,
    pub max_articles: u32,
    #[serde(default)]
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordResetContent {
    pub heading: String,
    pub body: String,
    pub button_label: String,
    pub expiry_notice: String,
}

/// Template content, discriminated by [`EmailTemplateKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTemplateContent {
    Welcome(WelcomeContent),
    ArticleNotification(ArticleNotificationContent),
    WeeklyDigest(WeeklyDigestContent),
    PasswordReset(PasswordResetContent),
}

impl EmailTemplateContent {
    /// Decode and validate `value` against the contract for `key`.
    pub fn parse(key: EmailTemplateKey, value: &Value) -> Result<Self, CoreError> {
        let content = match key {
            EmailTemplateKey::Welcome => Self::Welcome(decode(key, value)?),
            EmailTemplateKey::ArticleNotification => {
                Self::ArticleNotification(decode(key, value)?)
            }
            EmailTemplateKey::WeeklyDigest => Self::WeeklyDigest(decode(key, value)?),
            EmailTemplateKey::PasswordReset => Self::PasswordReset(decode(key, value)?),
        };
        content.validate()?;
        Ok(content)
    }

    pub fn key(&self) -> EmailTemplateKey {
        match self {
            Self::Welcome(_) => EmailTemplateKey::Welcome,
            Self::ArticleNotification(_) => EmailTemplateKey::ArticleNotification,
            Self::WeeklyDigest(_) => EmailTemplateKey::WeeklyDigest,
            Self::PasswordReset(_) => EmailTemplateKey::PasswordReset,
        }
    }

    /// Serialize back into the stored JSON shape.
    pub fn to_value(&self) -> Value {
        let encoded = match self {
            Self::Welcome(c) => serde_json::to_value(c),
            Self::ArticleNotification(c) => serde_json::to_value(c),
            Self::WeeklyDigest(c) => serde_json::to_value(c),
            Self::PasswordReset(c) => serde_json::to_value(c),
        };
        // Plain structs of strings and integers always encode.
        encoded.unwrap_or(Value::Null)
    }

    fn validate(&self) -> Result<(), CoreError> {
        let required: Vec<(&str, &str)> = match self {
            Self::Welcome(c) => vec![
                ("heading", c.heading.as_str()),
                ("intro", c.intro.as_str()),
                ("cta_label", c.cta_label.as_str()),
                ("cta_url", c.cta_url.as_str()),
            ],
            Self::ArticleNotification(c) => vec![
                ("heading", c.heading.as_str()),
                ("intro", c.intro.as_str()),
                ("read_more_label", c.read_more_label.as_str()),
            ],
            Self::WeeklyDigest(c) => {
                if c.max_articles == 0 || c.max_articles > MAX_DIGEST_ARTICLES {
                    return Err(CoreError::Validation(format!(
                        "weekly_digest.max_articles must be between 1 and {MAX_DIGEST_ARTICLES}"
                    )));
                }
                vec![("heading", c.heading.as_str()), ("intro", c.intro.as_str())]
            }
            Self::PasswordReset(c) => vec![
                ("heading", c.heading.as_str()),
                ("body", c.body.as_str()),
                ("button_label", c.button_label.as_str()),
                ("expiry_notice", c.expiry_notice.as_str()),
            ],
        };

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(CoreError::Validation(format!(
                "{}.{field} must not be empty",
                self.key().as_str()
            ))),
            None => Ok(()),
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(key: EmailTemplateKey, value: &Value) -> Result<T, CoreError> {
    T::deserialize(value).map_err(|e| {
        CoreError::Validation(format!(
            "Content does not match the '{}' template: {e}",
            key.as_str()
        ))
    })
}

// ---------------------------------------------------------------------------
// Header validation
// ---------------------------------------------------------------------------

/// Validate subject and preview text.
pub fn validate_envelope(subject: &str, preview_text: Option<&str>) -> Result<(), CoreError> {
    if subject.trim().is_empty() {
        return Err(CoreError::Validation(
            "Email subject must not be empty".to_string(),
        ));
    }
    if subject.chars().count() > MAX_SUBJECT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Email subject exceeds maximum length of {MAX_SUBJECT_LENGTH} characters"
        )));
    }
    if preview_text.is_some_and(|p| p.chars().count() > MAX_PREVIEW_TEXT_LENGTH) {
        return Err(CoreError::Validation(format!(
            "Preview text exceeds maximum length of {MAX_PREVIEW_TEXT_LENGTH} characters"
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
    use serde_json::json;

    use super::*;

    #[test]
    fn keys_round_trip() {
        for key in EmailTemplateKey::ALL {
            assert_eq!(EmailTemplateKey::from_str_db(key.as_str()).unwrap(), key);
        }
        assert!(EmailTemplateKey::from_str_db("newsletter").is_err());
    }

    #[test]
    fn welcome_content_parses() {
        let value = json!({
            "heading": "Velkommen!",
            "intro": "Takk for at du registrerte deg.",
            "cta_label": "Les siste artikler",
            "cta_url": "https://example.com/articles"
        });
        let content = EmailTemplateContent::parse(EmailTemplateKey::Welcome, &value).unwrap();
        assert_eq!(content.key(), EmailTemplateKey::Welcome);
        assert_eq!(content.to_value(), value);
    }

    #[test]
    fn content_for_another_key_is_rejected() {
        let value = json!({
            "heading": "Velkommen!",
            "intro": "Hei",
            "cta_label": "Les",
            "cta_url": "https://example.com"
        });
        let err = EmailTemplateContent::parse(EmailTemplateKey::PasswordReset, &value).unwrap_err();
        assert!(err.to_string().contains("password_reset"));
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let value = json!({
            "heading": "Ny artikkel",
            "intro": " ",
            "read_more_label": "Les mer"
        });
        assert_matches!(
            EmailTemplateContent::parse(EmailTemplateKey::ArticleNotification, &value),
            Err(CoreError::Validation(msg)) if msg == "article_notification.intro must not be empty"
        );
    }

    #[test]
    fn optional_footer_defaults_to_none() {
        let value = json!({"heading": "Uka som gikk", "intro": "Her er ukens saker", "max_articles": 5});
        let content = EmailTemplateContent::parse(EmailTemplateKey::WeeklyDigest, &value).unwrap();
        assert_matches!(content, EmailTemplateContent::WeeklyDigest(WeeklyDigestContent { footer: None, .. }));
    }

    #[test]
    fn digest_article_count_is_bounded() {
        let value = json!({"heading": "Uka", "intro": "Saker", "max_articles": 0});
        assert!(EmailTemplateContent::parse(EmailTemplateKey::WeeklyDigest, &value).is_err());
    }

    #[test]
    fn envelope_validation() {
        assert!(validate_envelope("Hei", Some("Kort")).is_ok());
        assert!(validate_envelope("", None).is_err());
        assert!(validate_envelope("Hei", Some(&"p".repeat(MAX_PREVIEW_TEXT_LENGTH + 1))).is_err());
    }
}
