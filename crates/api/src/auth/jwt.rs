//! Bearer-token handling.
//!
//! Readers and editors sign in through an external identity service that
//! issues HS256 tokens with a shared secret. This service only checks them:
//! signature, expiry and, when `JWT_ISSUER` is set, the `iss` claim.
//! [`generate_access_token`] exists for tests and local tooling.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use newsdesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default lifetime of tokens minted by [`generate_access_token`].
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

/// Default tolerance for clock skew between issuer and this service.
const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Payload of a reader or editor token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Reader id; preferences are stored under it.
    pub sub: DbId,
    /// `"admin"` for editors, `"user"` for readers.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret.
    pub secret: String,
    /// Lifetime of locally minted tokens.
    pub access_token_expiry_mins: i64,
    /// Required `iss` claim; `None` accepts any issuer.
    pub issuer: Option<String>,
    /// Allowed clock skew when checking `exp`.
    pub leeway_secs: u64,
}

impl JwtConfig {
    /// Config with the given secret and default expiry, leeway and no
    /// issuer check.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry_mins: DEFAULT_ACCESS_EXPIRY_MINS,
            issuer: None,
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }

    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ISSUER`             | no       | unset   |
    /// | `JWT_LEEWAY_SECS`        | no       | `30`    |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `15`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or a number does not parse.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        let issuer = std::env::var("JWT_ISSUER").ok().filter(|s| !s.trim().is_empty());

        let leeway_secs = match std::env::var("JWT_LEEWAY_SECS") {
            Ok(v) => v.parse().expect("JWT_LEEWAY_SECS must be a valid u64"),
            Err(_) => DEFAULT_LEEWAY_SECS,
        };
        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(v) => v.parse().expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
            issuer,
            leeway_secs,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

/// Mint a token for `user_id` with `role`, stamped with the configured issuer.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: iat + config.access_token_expiry_mins * 60,
        iat,
        jti: Uuid::new_v4().to_string(),
        iss: config.issuer.clone(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Decode `token` and return its claims if the signature, expiry and issuer
/// check out.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(config.secret.as_bytes());
    decode::<Claims>(token, &key, &config.validation()).map(|data| data.claims)
}
