use newsdesk_core::preview::{self, Preview, DEFAULT_PREVIEW_CHARS};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Token validation settings.
    pub jwt: JwtConfig,
    /// How much of an article anonymous readers see.
    pub paywall: PaywallConfig,
    /// Lifetime of cached AI prompts in seconds (default: `300`).
    pub prompt_cache_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                    |
    /// |---------------------------|----------------------------|
    /// | `HOST`                    | `0.0.0.0`                  |
    /// | `PORT`                    | `3000`                     |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                       |
    /// | `PAYWALL_PREVIEW_CHARS`   | `1200`                     |
    /// | `PAYWALL_PREVIEW_PERCENT` | unset                      |
    /// | `PROMPT_CACHE_TTL_SECS`   | `300`                      |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let prompt_cache_ttl_secs: u64 = std::env::var("PROMPT_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("PROMPT_CACHE_TTL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            paywall: PaywallConfig::from_env(),
            prompt_cache_ttl_secs,
        }
    }
}

/// Paywall preview settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaywallConfig {
    /// Character budget for the standard preview.
    pub preview_chars: usize,
    /// When set, anonymous readers get this percentage of the article
    /// (cut at the nearest paragraph) instead of a fixed budget.
    pub preview_percent: Option<u8>,
}

impl Default for PaywallConfig {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
            preview_percent: None,
        }
    }
}

impl PaywallConfig {
    pub fn from_env() -> Self {
        let preview_chars: usize = std::env::var("PAYWALL_PREVIEW_CHARS")
            .map(|v| v.parse().expect("PAYWALL_PREVIEW_CHARS must be a valid usize"))
            .unwrap_or(DEFAULT_PREVIEW_CHARS);

        let preview_percent: Option<u8> = std::env::var("PAYWALL_PREVIEW_PERCENT")
            .ok()
            .map(|v| v.parse().expect("PAYWALL_PREVIEW_PERCENT must be a valid u8"));
        if let Some(percent) = preview_percent {
            assert!(
                (1..=100).contains(&percent),
                "PAYWALL_PREVIEW_PERCENT must be between 1 and 100"
            );
        }

        Self {
            preview_chars,
            preview_percent,
        }
    }

    /// The part of `content` an anonymous reader may see.
    pub fn preview(&self, content: &str) -> Preview {
        match self.preview_percent {
            Some(percent) => preview::extended_preview(content, percent),
            None => preview::content_preview(content, self.preview_chars),
        }
    }
}
