//! Normalized records produced by ingestion and persisted per [`PeriodKey`].
//!
//! Collection records (countries, posts, hashtags) do not repeat the key; the
//! store scopes them by the [`PeriodKey`] passed alongside the batch.

use serde::{Deserialize, Serialize};

use crate::period::PeriodKey;

/// Headline metrics for one organization and month. One per [`PeriodKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewSnapshot {
    pub key: PeriodKey,
    pub followers: i64,
    pub reach: i64,
    /// Reach rate as exported, already a percentage.
    pub reach_rate: f64,
    pub engagements: i64,
    /// Engagement rate as exported, already a percentage.
    pub engagement_rate: f64,
}

/// A raw country row before shares are computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCount {
    pub country: String,
    pub users: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryShare {
    pub country: String,
    pub users: i64,
    /// Share of all users in the same snapshot, in percent.
    pub percentage: f64,
}

/// A status post retained from the post-insights export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Whitespace-collapsed post text (not yet truncated).
    pub text: String,
    pub post_type: String,
    pub reactions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagRecord {
    pub tag: String,
    pub score: f64,
    pub reach: i64,
    pub reactions: i64,
    pub comments: i64,
    pub shares: i64,
    pub video_views: i64,
}

/// Attach each country's percentage of the total user count.
///
/// Percentages are left at `0.0` when the total is not positive, so an empty
/// or all-zero list never divides by zero.
#[must_use]
pub fn compute_country_shares(counts: Vec<CountryCount>) -> Vec<CountryShare> {
    let total: i64 = counts
        .iter()
        .fold(0_i64, |acc, c| acc.saturating_add(c.users));

    counts
        .into_iter()
        .map(|c| {
            #[allow(clippy::cast_precision_loss)]
            let percentage = if total > 0 {
                c.users as f64 * 100.0 / total as f64
            } else {
                0.0
            };
            CountryShare {
                country: c.country,
                users: c.users,
                percentage,
            }
        })
        .collect()
}
