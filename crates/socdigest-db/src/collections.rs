//! Database operations for the `countries`, `posts`, and `hashtags` tables.
//!
//! Each collection is scoped to a [`PeriodKey`] and only ever written as a
//! whole: [`replace_collection`] deletes the old rows and inserts the new ones
//! inside one transaction.

use sqlx::{Sqlite, SqlitePool, Transaction};

use socdigest_core::{CountryShare, HashtagRecord, PeriodKey, PostRecord};

use crate::{position, DbError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Countries,
    Posts,
    Hashtags,
}

impl CollectionKind {
    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Self::Countries => "countries",
            Self::Posts => "posts",
            Self::Hashtags => "hashtags",
        }
    }

    fn delete_sql(self) -> &'static str {
        match self {
            Self::Countries => "DELETE FROM countries WHERE organization = ?1 AND period = ?2",
            Self::Posts => "DELETE FROM posts WHERE organization = ?1 AND period = ?2",
            Self::Hashtags => "DELETE FROM hashtags WHERE organization = ?1 AND period = ?2",
        }
    }

    fn count_sql(self) -> &'static str {
        match self {
            Self::Countries => {
                "SELECT COUNT(*) FROM countries WHERE organization = ?1 AND period = ?2"
            }
            Self::Posts => "SELECT COUNT(*) FROM posts WHERE organization = ?1 AND period = ?2",
            Self::Hashtags => {
                "SELECT COUNT(*) FROM hashtags WHERE organization = ?1 AND period = ?2"
            }
        }
    }
}

/// A full replacement set for one collection.
#[derive(Debug, Clone, Copy)]
pub enum Collection<'a> {
    Countries(&'a [CountryShare]),
    Posts(&'a [PostRecord]),
    Hashtags(&'a [HashtagRecord]),
}

impl Collection<'_> {
    #[must_use]
    pub fn kind(&self) -> CollectionKind {
        match self {
            Self::Countries(_) => CollectionKind::Countries,
            Self::Posts(_) => CollectionKind::Posts,
            Self::Hashtags(_) => CollectionKind::Hashtags,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Countries(rows) => rows.len(),
            Self::Posts(rows) => rows.len(),
            Self::Hashtags(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Row counts of the three collections for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectionSizes {
    pub countries: i64,
    pub posts: i64,
    pub hashtags: i64,
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
struct CountryRow {
    country: String,
    users: i64,
    percentage: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct PostRow {
    text: String,
    post_type: String,
    reactions: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct HashtagRow {
    tag: String,
    score: f64,
    reach: i64,
    reactions: i64,
    comments: i64,
    shares: i64,
    video_views: i64,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Replace every row of one collection under `key`.
///
/// The delete and all inserts run in a single transaction. If any statement
/// fails the transaction is dropped uncommitted and the previous rows remain.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement or the commit fails.
pub async fn replace_collection(
    pool: &SqlitePool,
    key: &PeriodKey,
    collection: Collection<'_>,
) -> Result<usize, DbError> {
    let period = key.period.to_string();
    let mut tx = pool.begin().await?;

    sqlx::query(collection.kind().delete_sql())
        .bind(&key.organization)
        .bind(&period)
        .execute(&mut *tx)
        .await?;

    match collection {
        Collection::Countries(rows) => insert_countries(&mut tx, key, &period, rows).await?,
        Collection::Posts(rows) => insert_posts(&mut tx, key, &period, rows).await?,
        Collection::Hashtags(rows) => insert_hashtags(&mut tx, key, &period, rows).await?,
    }

    tx.commit().await?;
    tracing::debug!(
        table = collection.kind().table(),
        rows = collection.len(),
        %key,
        "collection replaced"
    );
    Ok(collection.len())
}

async fn insert_countries(
    tx: &mut Transaction<'_, Sqlite>,
    key: &PeriodKey,
    period: &str,
    rows: &[CountryShare],
) -> Result<(), DbError> {
    for (idx, row) in rows.iter().enumerate() {
        sqlx::query(
            "INSERT INTO countries \
                 (organization, period, position, country, users, percentage) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&key.organization)
        .bind(period)
        .bind(position(idx))
        .bind(&row.country)
        .bind(row.users)
        .bind(row.percentage)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_posts(
    tx: &mut Transaction<'_, Sqlite>,
    key: &PeriodKey,
    period: &str,
    rows: &[PostRecord],
) -> Result<(), DbError> {
    for (idx, row) in rows.iter().enumerate() {
        sqlx::query(
            "INSERT INTO posts \
                 (organization, period, position, text, post_type, reactions) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&key.organization)
        .bind(period)
        .bind(position(idx))
        .bind(&row.text)
        .bind(&row.post_type)
        .bind(row.reactions)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_hashtags(
    tx: &mut Transaction<'_, Sqlite>,
    key: &PeriodKey,
    period: &str,
    rows: &[HashtagRecord],
) -> Result<(), DbError> {
    for (idx, row) in rows.iter().enumerate() {
        sqlx::query(
            "INSERT INTO hashtags \
                 (organization, period, position, tag, score, reach, reactions, comments, \
                  shares, video_views) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&key.organization)
        .bind(period)
        .bind(position(idx))
        .bind(&row.tag)
        .bind(row.score)
        .bind(row.reach)
        .bind(row.reactions)
        .bind(row.comments)
        .bind(row.shares)
        .bind(row.video_views)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Countries stored under `key`, in ingestion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_countries(
    pool: &SqlitePool,
    key: &PeriodKey,
) -> Result<Vec<CountryShare>, DbError> {
    let rows = sqlx::query_as::<_, CountryRow>(
        "SELECT country, users, percentage FROM countries \
         WHERE organization = ?1 AND period = ?2 \
         ORDER BY position",
    )
    .bind(&key.organization)
    .bind(key.period.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| CountryShare {
            country: r.country,
            users: r.users,
            percentage: r.percentage,
        })
        .collect())
}

/// Posts stored under `key`, in ingestion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts(pool: &SqlitePool, key: &PeriodKey) -> Result<Vec<PostRecord>, DbError> {
    let rows = sqlx::query_as::<_, PostRow>(
        "SELECT text, post_type, reactions FROM posts \
         WHERE organization = ?1 AND period = ?2 \
         ORDER BY position",
    )
    .bind(&key.organization)
    .bind(key.period.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| PostRecord {
            text: r.text,
            post_type: r.post_type,
            reactions: r.reactions,
        })
        .collect())
}

/// Hashtags stored under `key`, in ingestion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_hashtags(
    pool: &SqlitePool,
    key: &PeriodKey,
) -> Result<Vec<HashtagRecord>, DbError> {
    let rows = sqlx::query_as::<_, HashtagRow>(
        "SELECT tag, score, reach, reactions, comments, shares, video_views FROM hashtags \
         WHERE organization = ?1 AND period = ?2 \
         ORDER BY position",
    )
    .bind(&key.organization)
    .bind(key.period.to_string())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| HashtagRecord {
            tag: r.tag,
            score: r.score,
            reach: r.reach,
            reactions: r.reactions,
            comments: r.comments,
            shares: r.shares,
            video_views: r.video_views,
        })
        .collect())
}

/// Number of stored rows in each collection under `key`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a count query fails.
pub async fn collection_sizes(
    pool: &SqlitePool,
    key: &PeriodKey,
) -> Result<CollectionSizes, DbError> {
    let period = key.period.to_string();
    let mut sizes = CollectionSizes::default();
    for kind in [
        CollectionKind::Countries,
        CollectionKind::Posts,
        CollectionKind::Hashtags,
    ] {
        let count: i64 = sqlx::query_scalar::<_, i64>(kind.count_sql())
            .bind(&key.organization)
            .bind(&period)
            .fetch_one(pool)
            .await?;
        match kind {
            CollectionKind::Countries => sizes.countries = count,
            CollectionKind::Posts => sizes.posts = count,
            CollectionKind::Hashtags => sizes.hashtags = count,
        }
    }
    Ok(sizes)
}
