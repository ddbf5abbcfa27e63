//! Repository for the `articles` table.

use newsdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::article::{Article, ArticleFilter, CreateArticle, UpdateArticle};
use crate::repositories::CategoryRepo;

/// Column list for articles queries.
const COLUMNS: &str = "id, title, slug, content, summary, meta_description, image_url, \
    status, published_date, created_at, updated_at";

/// Shared WHERE clause for listing and counting.
///
/// `$1` status, `$2` category slug, `$3` tsquery; each is skipped when NULL.
const FILTER: &str = "($1::text IS NULL OR a.status = $1)
      AND ($2::text IS NULL OR EXISTS (
            SELECT 1 FROM article_categories ac
            JOIN categories c ON c.id = ac.category_id
            WHERE ac.article_id = a.id AND c.slug = $2))
      AND ($3::text IS NULL OR
            to_tsvector('simple', a.title || ' ' || coalesce(a.summary, '') || ' ' || a.content)
            @@ to_tsquery('simple', $3))";

/// Provides CRUD and listing operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert an article together with its category memberships in one
    /// transaction. Returns the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArticle,
        category_ids: &[DbId],
    ) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles
                (title, slug, content, summary, meta_description, image_url,
                 status, published_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     COALESCE($8, CASE WHEN $7 = 'published' THEN now() END))
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.content)
            .bind(&input.summary)
            .bind(&input.meta_description)
            .bind(&input.image_url)
            .bind(input.status.as_str())
            .bind(input.published_date)
            .fetch_one(&mut *tx)
            .await?;
        CategoryRepo::replace_for_article_in(&mut *tx, article.id, category_ids).await?;
        tx.commit().await?;
        Ok(article)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published article by slug. Drafts and archived articles are
    /// invisible here.
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles WHERE slug = $1 AND status = 'published'"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List articles matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ArticleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles a
             WHERE {FILTER}
             ORDER BY a.published_date DESC NULLS LAST, a.created_at DESC, a.id
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(&filter.category_slug)
            .bind(&filter.tsquery)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count articles matching `filter`.
    pub async fn count(pool: &PgPool, filter: &ArticleFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM articles a WHERE {FILTER}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(&filter.category_slug)
            .bind(&filter.tsquery)
            .fetch_one(pool)
            .await
    }

    /// Update an article and, when `category_ids` is given, replace its
    /// categories in the same transaction. Returns `None` if the article
    /// does not exist.
    ///
    /// Publishing an article that never had a publication date stamps it
    /// with the current time.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
        category_ids: Option<&[DbId]>,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                title            = COALESCE($1, title),
                slug             = COALESCE($2, slug),
                content          = COALESCE($3, content),
                summary          = COALESCE($4, summary),
                meta_description = COALESCE($5, meta_description),
                image_url        = COALESCE($6, image_url),
                status           = COALESCE($7, status),
                published_date   = COALESCE($8, published_date,
                    CASE WHEN COALESCE($7, status) = 'published' THEN now() END),
                updated_at       = now()
             WHERE id = $9
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.content)
            .bind(&input.summary)
            .bind(&input.meta_description)
            .bind(&input.image_url)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.published_date)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(article) = article else {
            return Ok(None);
        };
        if let Some(ids) = category_ids {
            CategoryRepo::replace_for_article_in(&mut *tx, article.id, ids).await?;
        }
        tx.commit().await?;
        Ok(Some(article))
    }

    /// Delete an article. Memberships cascade. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use newsdesk_core::search::TS_CONFIG;

    use super::*;

    #[test]
    fn filter_uses_the_search_configuration() {
        assert!(FILTER.contains(&format!("to_tsvector('{TS_CONFIG}'")));
        assert!(FILTER.contains(&format!("to_tsquery('{TS_CONFIG}'")));
    }
}
