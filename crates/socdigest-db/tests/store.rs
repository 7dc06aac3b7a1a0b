//! Snapshot store tests against a fresh in-memory SQLite database.
//!
//! Each test opens its own single-connection pool (an in-memory database
//! lives only as long as its connection) and applies the workspace migrations.

use socdigest_core::{
    CountryShare, HashtagRecord, OverviewSnapshot, Period, PeriodKey, PostRecord, TrendDelta,
};
use socdigest_db::{
    collection_sizes, connect_pool, get_overview, health_check, list_countries, list_hashtags,
    list_posts, load_trend, previous_overview, replace_collection, run_migrations,
    upsert_overview, Collection, CollectionSizes, PoolConfig,
};
use sqlx::SqlitePool;

async fn test_pool() -> SqlitePool {
    let config = PoolConfig {
        max_connections: 1,
        acquire_timeout_secs: 5,
    };
    let pool = connect_pool("sqlite::memory:", config)
        .await
        .expect("connect_pool failed");
    run_migrations(&pool).await.expect("run_migrations failed");
    pool
}

fn period(s: &str) -> Period {
    s.parse().expect("valid period")
}

fn key(org: &str, p: &str) -> PeriodKey {
    PeriodKey::new(org, period(p))
}

fn snapshot(org: &str, p: &str, followers: i64, reach: i64) -> OverviewSnapshot {
    OverviewSnapshot {
        key: key(org, p),
        followers,
        reach,
        reach_rate: 12.5,
        engagements: 310,
        engagement_rate: 5.74,
    }
}

fn country(name: &str, users: i64, percentage: f64) -> CountryShare {
    CountryShare {
        country: name.to_string(),
        users,
        percentage,
    }
}

fn post(text: &str, reactions: i64) -> PostRecord {
    PostRecord {
        text: text.to_string(),
        post_type: "Status".to_string(),
        reactions,
    }
}

// ---------------------------------------------------------------------------
// Section 1: Pool and migrations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_succeeds_on_fresh_pool() {
    let pool = test_pool().await;
    health_check(&pool).await.expect("health_check failed");
}

#[tokio::test]
async fn fresh_database_reports_applied_migrations() {
    let pool = connect_pool(
        "sqlite::memory:",
        PoolConfig {
            max_connections: 1,
            acquire_timeout_secs: 5,
        },
    )
    .await
    .expect("connect_pool failed");
    let applied = run_migrations(&pool).await.expect("run_migrations failed");
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn migrations_apply_once() {
    let pool = test_pool().await;
    let applied = run_migrations(&pool).await.expect("second run failed");
    assert_eq!(applied, 0, "migrations should already be applied");
}

// ---------------------------------------------------------------------------
// Section 2: Overview upsert
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_overview_missing_is_none() {
    let pool = test_pool().await;
    let found = get_overview(&pool, &key("Acme", "2025-07"))
        .await
        .expect("get_overview failed");
    assert!(found.is_none());
}

#[tokio::test]
async fn upsert_overview_is_idempotent() {
    let pool = test_pool().await;
    let snap = snapshot("Acme", "2025-07", 1200, 5400);

    upsert_overview(&pool, &snap).await.expect("first upsert");
    let first = get_overview(&pool, &snap.key).await.expect("first get");
    upsert_overview(&pool, &snap).await.expect("second upsert");
    let second = get_overview(&pool, &snap.key).await.expect("second get");

    assert_eq!(first, Some(snap.clone()));
    assert_eq!(first, second);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM overview")
        .fetch_one(&pool)
        .await
        .expect("count failed");
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn upsert_overview_overwrites_scalars() {
    let pool = test_pool().await;
    upsert_overview(&pool, &snapshot("Acme", "2025-07", 1200, 5400))
        .await
        .expect("first upsert");
    let updated = OverviewSnapshot {
        engagement_rate: 6.1,
        ..snapshot("Acme", "2025-07", 1300, 6000)
    };
    upsert_overview(&pool, &updated).await.expect("second upsert");

    let stored = get_overview(&pool, &updated.key)
        .await
        .expect("get failed")
        .expect("snapshot should exist");
    assert_eq!(stored, updated);
}

// ---------------------------------------------------------------------------
// Section 3: Collection replace
// ---------------------------------------------------------------------------

#[tokio::test]
async fn replace_collection_does_not_duplicate_rows() {
    let pool = test_pool().await;
    let k = key("Acme", "2025-07");
    let countries = [country("Norway", 60, 60.0), country("Chile", 40, 40.0)];

    replace_collection(&pool, &k, Collection::Countries(&countries))
        .await
        .expect("first replace");
    let inserted = replace_collection(&pool, &k, Collection::Countries(&countries))
        .await
        .expect("second replace");

    assert_eq!(inserted, 2);
    let stored = list_countries(&pool, &k).await.expect("list failed");
    assert_eq!(stored, countries);
}

#[tokio::test]
async fn replace_collection_swaps_whole_set() {
    let pool = test_pool().await;
    let k = key("Acme", "2025-07");

    replace_collection(&pool, &k, Collection::Posts(&[post("old", 1), post("older", 2)]))
        .await
        .expect("first replace");
    replace_collection(&pool, &k, Collection::Posts(&[post("new", 3)]))
        .await
        .expect("second replace");

    let stored = list_posts(&pool, &k).await.expect("list failed");
    assert_eq!(stored, [post("new", 3)]);
}

#[tokio::test]
async fn failed_replace_leaves_previous_rows_intact() {
    let pool = test_pool().await;
    let k = key("Acme", "2025-07");
    let original = [country("Norway", 60, 60.0), country("Chile", 40, 40.0)];
    replace_collection(&pool, &k, Collection::Countries(&original))
        .await
        .expect("initial replace");

    // The empty name violates the CHECK constraint on the second insert.
    let bad = [country("Brazil", 10, 50.0), country("", 10, 50.0)];
    let result = replace_collection(&pool, &k, Collection::Countries(&bad)).await;
    assert!(result.is_err(), "replace with invalid row should fail");

    let stored = list_countries(&pool, &k).await.expect("list failed");
    assert_eq!(stored, original);
}

#[tokio::test]
async fn collections_are_scoped_by_key() {
    let pool = test_pool().await;
    let july = key("Acme", "2025-07");
    let june = key("Acme", "2025-06");
    let other = key("Globex", "2025-07");

    replace_collection(&pool, &june, Collection::Posts(&[post("june", 1)]))
        .await
        .expect("june replace");
    replace_collection(&pool, &other, Collection::Posts(&[post("globex", 1)]))
        .await
        .expect("other replace");
    replace_collection(&pool, &july, Collection::Posts(&[post("july", 1)]))
        .await
        .expect("july replace");

    assert_eq!(list_posts(&pool, &june).await.unwrap(), [post("june", 1)]);
    assert_eq!(list_posts(&pool, &other).await.unwrap(), [post("globex", 1)]);
}

#[tokio::test]
async fn collections_read_back_in_ingestion_order() {
    let pool = test_pool().await;
    let k = key("Acme", "2025-07");
    let tags: Vec<HashtagRecord> = ["#z", "#a", "#m"]
        .iter()
        .enumerate()
        .map(|(i, tag)| HashtagRecord {
            tag: (*tag).to_string(),
            score: 1.5,
            reach: i64::try_from(i).unwrap(),
            reactions: 2,
            comments: 3,
            shares: 4,
            video_views: 5,
        })
        .collect();

    replace_collection(&pool, &k, Collection::Hashtags(&tags))
        .await
        .expect("replace failed");
    assert_eq!(list_hashtags(&pool, &k).await.unwrap(), tags);
}

#[tokio::test]
async fn collection_sizes_counts_each_table() {
    let pool = test_pool().await;
    let k = key("Acme", "2025-07");
    replace_collection(&pool, &k, Collection::Posts(&[post("a", 1), post("b", 2)]))
        .await
        .expect("posts");
    replace_collection(&pool, &k, Collection::Countries(&[country("Norway", 1, 100.0)]))
        .await
        .expect("countries");

    let sizes = collection_sizes(&pool, &k).await.expect("sizes failed");
    assert_eq!(
        sizes,
        CollectionSizes {
            countries: 1,
            posts: 2,
            hashtags: 0,
        }
    );
}

// ---------------------------------------------------------------------------
// Section 4: Trend lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn january_looks_up_previous_december() {
    let pool = test_pool().await;
    let december = snapshot("Acme", "2024-12", 100, 1000);
    upsert_overview(&pool, &december).await.expect("upsert");

    let previous = previous_overview(&pool, &key("Acme", "2025-01"))
        .await
        .expect("lookup failed");
    assert_eq!(previous, Some(december));
}

#[tokio::test]
async fn trend_without_previous_snapshot_is_neutral() {
    let pool = test_pool().await;
    let current = snapshot("Acme", "2025-01", 120, 1500);
    upsert_overview(&pool, &current).await.expect("upsert");

    let delta = load_trend(&pool, &current).await.expect("trend failed");
    assert_eq!(delta, TrendDelta::default());
}

#[tokio::test]
async fn trend_against_stored_previous_month() {
    let pool = test_pool().await;
    upsert_overview(&pool, &snapshot("Acme", "2024-12", 100, 1000))
        .await
        .expect("upsert december");
    // Same organization, two months back: must not be used.
    upsert_overview(&pool, &snapshot("Acme", "2024-11", 1, 1))
        .await
        .expect("upsert november");
    let current = snapshot("Acme", "2025-01", 120, 1500);

    let delta = load_trend(&pool, &current).await.expect("trend failed");
    assert_eq!(delta.followers, 20);
    assert!((delta.reach_pct - 50.0).abs() < 1e-9);
    assert!(delta.engagements_pct.abs() < 1e-9);
}

#[tokio::test]
async fn trend_ignores_other_organizations() {
    let pool = test_pool().await;
    upsert_overview(&pool, &snapshot("Globex", "2024-12", 100, 1000))
        .await
        .expect("upsert");
    let current = snapshot("Acme", "2025-01", 120, 1500);

    let delta = load_trend(&pool, &current).await.expect("trend failed");
    assert_eq!(delta, TrendDelta::default());
}
