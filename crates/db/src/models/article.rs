//! Article models and DTOs.

use newsdesk_core::article::ArticleStatus;
use newsdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: Option<String>,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ArticleStatus,
    pub published_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create / update DTOs
// ---------------------------------------------------------------------------

/// Input for inserting an article. `published_date` defaults to now when
/// the article is created as published.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticle {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: Option<String>,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
    pub status: ArticleStatus,
    pub published_date: Option<Timestamp>,
}

/// Patch for an article; `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ArticleStatus>,
    pub published_date: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Listing filter
// ---------------------------------------------------------------------------

/// Filters for article listings. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub status: Option<ArticleStatus>,
    /// Only articles linked to the category with this slug.
    pub category_slug: Option<String>,
    /// Pre-built `tsquery` (see `newsdesk_core::search::build_tsquery`).
    pub tsquery: Option<String>,
}

impl ArticleFilter {
    /// Filter for the public site: published articles only.
    pub fn published() -> Self {
        Self {
            status: Some(ArticleStatus::Published),
            ..Default::default()
        }
    }
}
