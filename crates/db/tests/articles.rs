//! Integration tests for article persistence and listing.

use assert_matches::assert_matches;
use sqlx::PgPool;
use newsdesk_core::article::ArticleStatus;
use newsdesk_core::search::build_tsquery;
use newsdesk_db::models::article::{ArticleFilter, CreateArticle, UpdateArticle};
use newsdesk_db::models::category::CreateCategory;
use newsdesk_db::repositories::{ArticleRepo, CategoryRepo};

fn new_article(slug: &str, title: &str, status: ArticleStatus) -> CreateArticle {
    CreateArticle {
        title: title.to_string(),
        slug: slug.to_string(),
        content: format!("{title}. Mer tekst om saken."),
        summary: None,
        meta_description: None,
        image_url: None,
        status,
        published_date: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn published_articles_get_a_publication_date(pool: PgPool) {
    let published = ArticleRepo::create(
        &pool,
        &new_article("pub", "Publisert", ArticleStatus::Published),
        &[],
    )
    .await
    .unwrap();
    let draft = ArticleRepo::create(&pool, &new_article("draft", "Utkast", ArticleStatus::Draft), &[])
        .await
        .unwrap();

    assert!(published.published_date.is_some());
    assert!(draft.published_date.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn publishing_a_draft_stamps_the_date(pool: PgPool) {
    let draft = ArticleRepo::create(&pool, &new_article("draft", "Utkast", ArticleStatus::Draft), &[])
        .await
        .unwrap();

    let updated = ArticleRepo::update(
        &pool,
        draft.id,
        &UpdateArticle {
            status: Some(ArticleStatus::Published),
            ..Default::default()
        },
        None,
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.status, ArticleStatus::Published);
    assert!(updated.published_date.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn drafts_are_not_found_by_public_slug(pool: PgPool) {
    ArticleRepo::create(&pool, &new_article("draft", "Utkast", ArticleStatus::Draft), &[])
        .await
        .unwrap();
    assert!(ArticleRepo::find_published_by_slug(&pool, "draft")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn listing_filters_by_status_category_and_search(pool: PgPool) {
    let fond = CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Fond".to_string(),
            slug: "fond".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    ArticleRepo::create(
        &pool,
        &new_article("indeksfond", "Indeksfond for nybegynnere", ArticleStatus::Published),
        &[fond.id],
    )
    .await
    .unwrap();
    ArticleRepo::create(
        &pool,
        &new_article("boliglan", "Boliglan og renter", ArticleStatus::Published),
        &[],
    )
    .await
    .unwrap();
    ArticleRepo::create(
        &pool,
        &new_article("hemmelig", "Indeksfond utkast", ArticleStatus::Draft),
        &[fond.id],
    )
    .await
    .unwrap();

    let published = ArticleFilter::published();
    assert_eq!(ArticleRepo::count(&pool, &published).await.unwrap(), 2);

    let by_category = ArticleFilter {
        category_slug: Some("fond".to_string()),
        ..ArticleFilter::published()
    };
    let rows = ArticleRepo::list(&pool, &by_category, 10, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slug, "indeksfond");

    let by_search = ArticleFilter {
        tsquery: build_tsquery("renter"),
        ..ArticleFilter::published()
    };
    let rows = ArticleRepo::list(&pool, &by_search, 10, 0).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slug, "boliglan");

    let everything = ArticleFilter::default();
    assert_eq!(ArticleRepo::count(&pool, &everything).await.unwrap(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_slug_violates_constraint(pool: PgPool) {
    ArticleRepo::create(&pool, &new_article("same", "En", ArticleStatus::Draft), &[])
        .await
        .unwrap();
    let err = ArticleRepo::create(&pool, &new_article("same", "To", ArticleStatus::Draft), &[])
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_articles_slug")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn failed_membership_rolls_back_the_article(pool: PgPool) {
    let bogus = uuid::Uuid::new_v4();
    let result = ArticleRepo::create(
        &pool,
        &new_article("orphan", "Foreldrelos", ArticleStatus::Draft),
        &[bogus],
    )
    .await;

    assert_matches!(
        result,
        Err(sqlx::Error::Database(e)) if e.constraint() == Some("article_categories_category_id_fkey")
    );
    assert_eq!(ArticleRepo::count(&pool, &ArticleFilter::default()).await.unwrap(), 0);
}
