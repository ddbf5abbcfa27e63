//! Repository for `categories` and the `article_categories` join table.

use std::collections::{HashMap, HashSet};

use newsdesk_core::category::{self, CategoryRefs, CategoryResolution};
use newsdesk_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::category::{ArticleCategoryRow, Category, CreateCategory, UpdateCategory};

/// Column list for categories queries.
const COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Same columns, qualified for joins against `categories c`.
const JOINED_COLUMNS: &str =
    "c.id, c.name, c.slug, c.description, c.created_at, c.updated_at";

/// Provides CRUD, resolution and membership operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a new category. Returns the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(input.name.trim())
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY lower(name)");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Update a category. Only provided fields are updated.
    /// Returns `None` if the category does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name        = COALESCE($1, name),
                slug        = COALESCE($2, slug),
                description = COALESCE($3, description),
                updated_at  = now()
             WHERE id = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.slug)
            .bind(&input.description)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Memberships cascade. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    /// Resolve category references given by id or by name.
    ///
    /// An all-UUID batch is checked with a single `id = ANY($1)` query; any
    /// other batch is matched case-insensitively against the category
    /// names. Blank input resolves to nothing without touching the database.
    pub async fn resolve<S: AsRef<str>>(
        pool: &PgPool,
        inputs: &[S],
    ) -> Result<CategoryResolution, sqlx::Error> {
        match category::classify(inputs) {
            CategoryRefs::Empty => Ok(CategoryResolution::default()),
            CategoryRefs::Ids(pairs) => {
                let ids: Vec<DbId> = pairs.iter().map(|(_, id)| *id).collect();
                let existing: Vec<DbId> =
                    sqlx::query_scalar("SELECT id FROM categories WHERE id = ANY($1)")
                        .bind(&ids)
                        .fetch_all(pool)
                        .await?;
                let existing: HashSet<DbId> = existing.into_iter().collect();
                Ok(category::resolve_ids(pairs, &existing))
            }
            CategoryRefs::Names(names) => {
                let rows: Vec<(DbId, String)> =
                    sqlx::query_as("SELECT id, name FROM categories")
                        .fetch_all(pool)
                        .await?;
                Ok(category::resolve_names(
                    names,
                    rows.iter().map(|(id, name)| (*id, name.as_str())),
                ))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Replace an article's category set atomically.
    pub async fn replace_for_article(
        pool: &PgPool,
        article_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::replace_for_article_in(&mut *tx, article_id, category_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Replace an article's category set on an open connection, usually a
    /// transaction shared with the article write. Input order becomes the
    /// display order; repeated ids are kept once.
    pub async fn replace_for_article_in(
        conn: &mut PgConnection,
        article_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM article_categories WHERE article_id = $1")
            .bind(article_id)
            .execute(&mut *conn)
            .await?;

        let mut seen = HashSet::with_capacity(category_ids.len());
        let ordered: Vec<DbId> = category_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if ordered.is_empty() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO article_categories (article_id, category_id, position)
             SELECT $1, t.category_id, (t.ord - 1)::int
             FROM UNNEST($2::uuid[]) WITH ORDINALITY AS t(category_id, ord)",
        )
        .bind(article_id)
        .bind(&ordered)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Categories of one article in display order.
    pub async fn categories_for_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM article_categories ac
             JOIN categories c ON c.id = ac.category_id
             WHERE ac.article_id = $1
             ORDER BY ac.position"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(article_id)
            .fetch_all(pool)
            .await
    }

    /// Categories for many articles in one query.
    ///
    /// Articles without categories are absent from the map. An empty id
    /// list returns an empty map without querying.
    pub async fn categories_for_articles(
        pool: &PgPool,
        article_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Category>>, sqlx::Error> {
        if article_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT ac.article_id, {JOINED_COLUMNS}
             FROM article_categories ac
             JOIN categories c ON c.id = ac.category_id
             WHERE ac.article_id = ANY($1)
             ORDER BY ac.article_id, ac.position"
        );
        let rows = sqlx::query_as::<_, ArticleCategoryRow>(&query)
            .bind(article_ids)
            .fetch_all(pool)
            .await?;

        let mut by_article: HashMap<DbId, Vec<Category>> = HashMap::new();
        for row in rows {
            by_article.entry(row.article_id).or_default().push(row.category);
        }
        Ok(by_article)
    }
}
