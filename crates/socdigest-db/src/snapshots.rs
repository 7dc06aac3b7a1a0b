//! Database operations for the `overview` table.

use sqlx::SqlitePool;

use socdigest_core::{OverviewSnapshot, PeriodKey};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Scalar columns of an `overview` row. The key columns are not selected;
/// callers already hold the [`PeriodKey`].
#[derive(Debug, Clone, sqlx::FromRow)]
struct OverviewRow {
    followers: i64,
    reach: i64,
    reach_rate: f64,
    engagements: i64,
    engagement_rate: f64,
}

impl OverviewRow {
    fn into_snapshot(self, key: PeriodKey) -> OverviewSnapshot {
        OverviewSnapshot {
            key,
            followers: self.followers,
            reach: self.reach,
            reach_rate: self.reach_rate,
            engagements: self.engagements,
            engagement_rate: self.engagement_rate,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert the snapshot, or overwrite every scalar field of the row already
/// stored under the same `(organization, period)`.
///
/// Nothing but the snapshot's own values is written, so repeating the call
/// with the same input leaves the row unchanged.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_overview(pool: &SqlitePool, snapshot: &OverviewSnapshot) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO overview \
             (organization, period, followers, reach, reach_rate, engagements, engagement_rate) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
         ON CONFLICT (organization, period) DO UPDATE SET \
             followers       = excluded.followers, \
             reach           = excluded.reach, \
             reach_rate      = excluded.reach_rate, \
             engagements     = excluded.engagements, \
             engagement_rate = excluded.engagement_rate",
    )
    .bind(&snapshot.key.organization)
    .bind(snapshot.key.period.to_string())
    .bind(snapshot.followers)
    .bind(snapshot.reach)
    .bind(snapshot.reach_rate)
    .bind(snapshot.engagements)
    .bind(snapshot.engagement_rate)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch the snapshot stored under `key`, or `None` if there is none.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_overview(
    pool: &SqlitePool,
    key: &PeriodKey,
) -> Result<Option<OverviewSnapshot>, DbError> {
    let row = sqlx::query_as::<_, OverviewRow>(
        "SELECT followers, reach, reach_rate, engagements, engagement_rate \
         FROM overview \
         WHERE organization = ?1 AND period = ?2",
    )
    .bind(&key.organization)
    .bind(key.period.to_string())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into_snapshot(key.clone())))
}
