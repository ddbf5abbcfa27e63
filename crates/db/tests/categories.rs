//! Integration tests for category resolution and article membership.

use sqlx::PgPool;
use newsdesk_core::article::ArticleStatus;
use newsdesk_core::types::DbId;
use newsdesk_db::models::article::CreateArticle;
use newsdesk_db::models::category::{Category, CreateCategory, UpdateCategory};
use newsdesk_db::repositories::{ArticleRepo, CategoryRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn category(pool: &PgPool, name: &str, slug: &str) -> Category {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            slug: slug.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
}

async fn article(pool: &PgPool, slug: &str, categories: &[DbId]) -> DbId {
    let input = CreateArticle {
        title: format!("Article {slug}"),
        slug: slug.to_string(),
        content: "Body".to_string(),
        summary: None,
        meta_description: None,
        image_url: None,
        status: ArticleStatus::Published,
        published_date: None,
    };
    ArticleRepo::create(pool, &input, categories).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn names_resolve_case_insensitively_and_report_unknowns(pool: PgPool) {
    let investering = category(&pool, "Investering", "investering").await;

    let resolution = CategoryRepo::resolve(&pool, &["investering", "Unknown Cat"])
        .await
        .unwrap();

    assert_eq!(resolution.ids, vec![investering.id]);
    assert_eq!(resolution.unknown, vec!["Unknown Cat".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
async fn ids_resolve_against_existing_rows(pool: PgPool) {
    let sparing = category(&pool, "Sparing", "sparing").await;
    let missing = uuid::Uuid::new_v4();

    let inputs = [sparing.id.to_string(), missing.to_string()];
    let resolution = CategoryRepo::resolve(&pool, &inputs).await.unwrap();

    assert_eq!(resolution.ids, vec![sparing.id]);
    assert_eq!(resolution.unknown, vec![missing.to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
async fn blank_input_resolves_to_nothing(pool: PgPool) {
    let resolution = CategoryRepo::resolve(&pool, &["  ", ""]).await.unwrap();
    assert!(resolution.ids.is_empty());
    assert!(resolution.is_complete());
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn bulk_lookup_groups_by_article_in_position_order(pool: PgPool) {
    let c1 = category(&pool, "Aksjer", "aksjer").await;
    let c2 = category(&pool, "Fond", "fond").await;
    let a1 = article(&pool, "a1", &[c2.id, c1.id]).await;
    let a2 = article(&pool, "a2", &[]).await;

    let map = CategoryRepo::categories_for_articles(&pool, &[a1, a2]).await.unwrap();

    let names: Vec<&str> = map[&a1].iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Fond", "Aksjer"]);
    assert!(!map.contains_key(&a2));
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_lookup_with_no_ids_is_empty(pool: PgPool) {
    let map = CategoryRepo::categories_for_articles(&pool, &[]).await.unwrap();
    assert!(map.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn replace_swaps_the_whole_set(pool: PgPool) {
    let c1 = category(&pool, "Aksjer", "aksjer").await;
    let c2 = category(&pool, "Fond", "fond").await;
    let c3 = category(&pool, "Bolig", "bolig").await;
    let a1 = article(&pool, "a1", &[c1.id, c2.id]).await;

    CategoryRepo::replace_for_article(&pool, a1, &[c3.id, c1.id, c3.id])
        .await
        .unwrap();

    let ids: Vec<DbId> = CategoryRepo::categories_for_article(&pool, a1)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![c3.id, c1.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_category_removes_memberships(pool: PgPool) {
    let c1 = category(&pool, "Aksjer", "aksjer").await;
    let a1 = article(&pool, "a1", &[c1.id]).await;

    assert!(CategoryRepo::delete(&pool, c1.id).await.unwrap());
    assert!(CategoryRepo::categories_for_article(&pool, a1).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn names_are_unique_ignoring_case(pool: PgPool) {
    category(&pool, "Sparing", "sparing").await;
    let err = CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "SPARING".to_string(),
            slug: "sparing-2".to_string(),
            description: None,
        },
    )
    .await
    .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_categories_name_lower"));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_keeps_unset_fields(pool: PgPool) {
    let c1 = category(&pool, "Aksjer", "aksjer").await;
    let updated = CategoryRepo::update(
        &pool,
        c1.id,
        &UpdateCategory {
            description: Some("Alt om aksjer".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "Aksjer");
    assert_eq!(updated.description.as_deref(), Some("Alt om aksjer"));
}
