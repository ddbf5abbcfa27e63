//! Handlers for articles: the public listing and reader view, and the admin
//! CRUD endpoints.
//!
//! Anonymous readers of a single article receive a paywall preview instead
//! of the full body. Category references in admin writes are resolved
//! all-or-nothing: one unknown name rejects the whole request.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use newsdesk_core::article::{self, ArticleStatus};
use newsdesk_core::error::CoreError;
use newsdesk_core::pagination::{
    clamp_limit, clamp_page, page_offset, total_pages, PaginationControls, DEFAULT_PER_PAGE,
    MAX_PER_PAGE,
};
use newsdesk_core::search::build_prefix_tsquery;
use newsdesk_core::types::{DbId, Timestamp};
use newsdesk_db::models::article::{Article, ArticleFilter, CreateArticle, UpdateArticle};
use newsdesk_db::models::category::Category;
use newsdesk_db::repositories::{ArticleRepo, CategoryRepo};
use newsdesk_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Public listing parameters (`?page=&per_page=&category=&q=`).
#[derive(Debug, Default, Deserialize)]
pub struct ArticleListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Category slug.
    pub category: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
}

/// Admin listing parameters; adds a status filter over the public ones.
#[derive(Debug, Default, Deserialize)]
pub struct AdminArticleListParams {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub category: Option<String>,
    pub q: Option<String>,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for creating an article. `categories` holds names or ids.
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    /// Derived from the title when omitted.
    pub slug: Option<String>,
    pub content: String,
    pub summary: Option<String>,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ArticleStatus>,
    pub published_date: Option<Timestamp>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Request body for updating an article. A present `categories` list
/// replaces the article's categories; an absent one leaves them alone.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub meta_description: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ArticleStatus>,
    pub published_date: Option<Timestamp>,
    pub categories: Option<Vec<String>>,
}

/// Request body for `PUT /admin/articles/{id}/categories`.
#[derive(Debug, Deserialize)]
pub struct ArticleCategoriesRequest {
    pub categories: Vec<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// An article in a listing: no body, categories attached.
#[derive(Debug, Serialize)]
pub struct ArticleListItem {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub status: ArticleStatus,
    pub published_date: Option<Timestamp>,
    pub categories: Vec<Category>,
}

impl ArticleListItem {
    fn new(article: Article, categories: Vec<Category>) -> Self {
        Self {
            id: article.id,
            title: article.title,
            slug: article.slug,
            summary: article.summary,
            image_url: article.image_url,
            status: article.status,
            published_date: article.published_date,
            categories,
        }
    }
}

/// A page of articles with the controls to render the page strip.
#[derive(Debug, Serialize)]
pub struct ArticlePage {
    pub items: Vec<ArticleListItem>,
    pub total: i64,
    pub pagination: PaginationControls,
}

/// A single article. When `is_preview` is set, `content` holds only the
/// paywall preview.
#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub categories: Vec<Category>,
    pub is_preview: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load one page of articles plus their categories (one extra query for
/// the whole page).
async fn load_page(
    pool: &DbPool,
    filter: &ArticleFilter,
    page: Option<i64>,
    per_page: Option<i64>,
) -> AppResult<ArticlePage> {
    let per_page = clamp_limit(per_page, DEFAULT_PER_PAGE, MAX_PER_PAGE);
    let total = ArticleRepo::count(pool, filter).await?;
    let pagination = PaginationControls::new(clamp_page(page), total_pages(total, per_page));
    let offset = page_offset(pagination.current_page, per_page);
    let articles = ArticleRepo::list(pool, filter, per_page, offset).await?;

    let ids: Vec<DbId> = articles.iter().map(|a| a.id).collect();
    let mut categories = CategoryRepo::categories_for_articles(pool, &ids).await?;

    let items = articles
        .into_iter()
        .map(|a| {
            let cats = categories.remove(&a.id).unwrap_or_default();
            ArticleListItem::new(a, cats)
        })
        .collect();

    Ok(ArticlePage {
        items,
        total,
        pagination,
    })
}

/// Resolve category names/ids, rejecting the request if any is unknown.
async fn resolve_categories(pool: &DbPool, inputs: &[String]) -> AppResult<Vec<DbId>> {
    let ids = CategoryRepo::resolve(pool, inputs).await?.into_ids()?;
    Ok(ids)
}

fn validate_optional_fields(
    summary: Option<&str>,
    meta_description: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(summary) = summary {
        article::validate_summary(summary)?;
    }
    if let Some(meta) = meta_description {
        article::validate_meta_description(meta)?;
    }
    Ok(())
}

async fn ensure_article_exists(pool: &DbPool, id: DbId) -> AppResult<Article> {
    ArticleRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
}

async fn detail(pool: &DbPool, article: Article) -> AppResult<ArticleDetail> {
    let categories = CategoryRepo::categories_for_article(pool, article.id).await?;
    Ok(ArticleDetail {
        article,
        categories,
        is_preview: false,
    })
}

// ---------------------------------------------------------------------------
// GET /articles
// ---------------------------------------------------------------------------

/// List published articles, newest first, optionally filtered by category
/// slug and search text.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ArticleListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = ArticleFilter {
        category_slug: params.category.filter(|c| !c.trim().is_empty()),
        tsquery: params.q.as_deref().and_then(build_prefix_tsquery),
        ..ArticleFilter::published()
    };

    let page = load_page(&state.pool, &filter, params.page, params.per_page).await?;

    tracing::debug!(
        count = page.items.len(),
        total = page.total,
        page = page.pagination.current_page,
        "Listed published articles"
    );

    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// GET /articles/{slug}
// ---------------------------------------------------------------------------

/// Fetch a published article by slug. Anonymous readers get the preview.
pub async fn get_article(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let article = ArticleRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Article '{slug}' not found")))?;

    let mut detail = detail(&state.pool, article).await?;

    if user.is_none() {
        let preview = state.config.paywall.preview(&detail.article.content);
        detail.article.content = preview.text;
        detail.is_preview = preview.truncated;
    }

    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// GET /admin/articles
// ---------------------------------------------------------------------------

/// List articles in any status.
pub async fn list_admin_articles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<AdminArticleListParams>,
) -> AppResult<impl IntoResponse> {
    let status = params
        .status
        .as_deref()
        .map(ArticleStatus::from_str_db)
        .transpose()?;

    let filter = ArticleFilter {
        status,
        category_slug: params.category.filter(|c| !c.trim().is_empty()),
        tsquery: params.q.as_deref().and_then(build_prefix_tsquery),
    };

    let page = load_page(&state.pool, &filter, params.page, params.per_page).await?;
    Ok(Json(DataResponse { data: page }))
}

// ---------------------------------------------------------------------------
// POST /admin/articles
// ---------------------------------------------------------------------------

/// Create an article and attach its categories.
pub async fn create_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<CreateArticleRequest>,
) -> AppResult<impl IntoResponse> {
    article::validate_title(&body.title)?;
    article::validate_content(&body.content)?;
    validate_optional_fields(body.summary.as_deref(), body.meta_description.as_deref())?;

    let slug = body.slug.unwrap_or_else(|| article::slugify(&body.title));
    article::validate_slug(&slug)?;

    let category_ids = resolve_categories(&state.pool, &body.categories).await?;

    let input = CreateArticle {
        title: body.title.trim().to_string(),
        slug,
        content: body.content,
        summary: body.summary,
        meta_description: body.meta_description,
        image_url: body.image_url,
        status: body.status.unwrap_or(ArticleStatus::Draft),
        published_date: body.published_date,
    };
    let created = ArticleRepo::create(&state.pool, &input, &category_ids).await?;

    tracing::info!(
        article_id = %created.id,
        slug = %created.slug,
        status = created.status.as_str(),
        categories = category_ids.len(),
        user_id = %admin.user_id,
        "Article created"
    );

    let detail = detail(&state.pool, created).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

// ---------------------------------------------------------------------------
// GET /admin/articles/{id}
// ---------------------------------------------------------------------------

/// Fetch any article by id, always with the full body.
pub async fn get_admin_article(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_exists(&state.pool, id).await?;
    let detail = detail(&state.pool, article).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// PUT /admin/articles/{id}
// ---------------------------------------------------------------------------

/// Update an article. Only provided fields change.
pub async fn update_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateArticleRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &body.title {
        article::validate_title(title)?;
    }
    if let Some(content) = &body.content {
        article::validate_content(content)?;
    }
    if let Some(slug) = &body.slug {
        article::validate_slug(slug)?;
    }
    validate_optional_fields(body.summary.as_deref(), body.meta_description.as_deref())?;

    let category_ids = match &body.categories {
        Some(inputs) => Some(resolve_categories(&state.pool, inputs).await?),
        None => None,
    };

    let input = UpdateArticle {
        title: body.title.map(|t| t.trim().to_string()),
        slug: body.slug,
        content: body.content,
        summary: body.summary,
        meta_description: body.meta_description,
        image_url: body.image_url,
        status: body.status,
        published_date: body.published_date,
    };
    let updated = ArticleRepo::update(&state.pool, id, &input, category_ids.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;

    tracing::info!(
        article_id = %id,
        status = updated.status.as_str(),
        categories_replaced = category_ids.is_some(),
        user_id = %admin.user_id,
        "Article updated"
    );

    let detail = detail(&state.pool, updated).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// DELETE /admin/articles/{id}
// ---------------------------------------------------------------------------

pub async fn delete_article(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ArticleRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }));
    }

    tracing::info!(article_id = %id, user_id = %admin.user_id, "Article deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// PUT /admin/articles/{id}/categories
// ---------------------------------------------------------------------------

/// Replace an article's categories. Returns the new set in order.
pub async fn replace_article_categories(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ArticleCategoriesRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_article_exists(&state.pool, id).await?;
    let category_ids = resolve_categories(&state.pool, &body.categories).await?;

    CategoryRepo::replace_for_article(&state.pool, id, &category_ids).await?;
    let categories = CategoryRepo::categories_for_article(&state.pool, id).await?;

    tracing::info!(
        article_id = %id,
        count = categories.len(),
        user_id = %admin.user_id,
        "Article categories replaced"
    );

    Ok(Json(DataResponse { data: categories }))
}
