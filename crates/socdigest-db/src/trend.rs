//! Previous-period lookup feeding [`socdigest_core::compute_trend`].

use sqlx::SqlitePool;

use socdigest_core::{compute_trend, OverviewSnapshot, PeriodKey, TrendDelta};

use crate::snapshots::get_overview;
use crate::DbError;

/// The snapshot for the same organization one calendar month before `key`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn previous_overview(
    pool: &SqlitePool,
    key: &PeriodKey,
) -> Result<Option<OverviewSnapshot>, DbError> {
    match key.previous() {
        Some(previous) => get_overview(pool, &previous).await,
        None => Ok(None),
    }
}

/// Deltas of `current` against the stored previous month. A missing
/// previous snapshot yields the neutral [`TrendDelta`].
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the lookup fails.
pub async fn load_trend(
    pool: &SqlitePool,
    current: &OverviewSnapshot,
) -> Result<TrendDelta, DbError> {
    let previous = previous_overview(pool, &current.key).await?;
    Ok(compute_trend(current, previous.as_ref()))
}
