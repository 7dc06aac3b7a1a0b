//! Assembly of the read-only report handed to the Markdown renderer.

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{CountryShare, HashtagRecord, OverviewSnapshot, PostRecord};
use crate::period::PeriodInfo;
use crate::trend::TrendDelta;

/// Maximum entries in each top list.
pub const TOP_N: usize = 5;

/// Maximum characters of post text shown in the report.
pub const DISPLAY_TEXT_LIMIT: usize = 50;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPost {
    /// Collapsed and, if needed, truncated post text.
    pub text: String,
    pub reactions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopHashtag {
    pub tag: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCountry {
    pub name: String,
    pub users: i64,
    pub percentage: f64,
}

/// Everything the renderer needs for one monthly report.
///
/// `insights` and `next_steps` start as `None`; the narrative step fills them
/// via [`ReportRecord::with_narrative`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    pub month_label: String,
    pub period_label: String,
    pub followers: i64,
    pub reach: i64,
    pub engagements: i64,
    pub engagement_rate: f64,
    pub trend: TrendDelta,
    pub top_posts: Vec<TopPost>,
    pub top_hashtags: Vec<TopHashtag>,
    pub top_countries: Vec<TopCountry>,
    pub insights: Option<String>,
    pub next_steps: Option<String>,
}

impl ReportRecord {
    /// Return a copy carrying the two narrative blocks.
    #[must_use]
    pub fn with_narrative(self, insights: String, next_steps: String) -> Self {
        Self {
            insights: Some(insights),
            next_steps: Some(next_steps),
            ..self
        }
    }
}

/// Build the report from the current period's normalized records.
///
/// Each top list is sorted descending by its metric (posts by reactions,
/// hashtags by score, countries by users) with a stable sort, then cut to
/// [`TOP_N`]. Ties keep ingestion order.
#[must_use]
pub fn assemble_report(
    info: &PeriodInfo,
    overview: &OverviewSnapshot,
    trend: TrendDelta,
    countries: &[CountryShare],
    posts: &[PostRecord],
    hashtags: &[HashtagRecord],
) -> ReportRecord {
    let top_posts = top_n(posts, |a, b| b.reactions.cmp(&a.reactions))
        .into_iter()
        .map(|p| TopPost {
            text: truncate_display_text(&p.text),
            reactions: p.reactions,
        })
        .collect();

    let top_hashtags = top_n(hashtags, |a, b| b.score.total_cmp(&a.score))
        .into_iter()
        .map(|h| TopHashtag {
            tag: h.tag.clone(),
            score: h.score,
        })
        .collect();

    let top_countries = top_n(countries, |a, b| b.users.cmp(&a.users))
        .into_iter()
        .map(|c| TopCountry {
            name: c.country.clone(),
            users: c.users,
            percentage: c.percentage,
        })
        .collect();

    ReportRecord {
        month_label: info.month_label.clone(),
        period_label: info.period_label.clone(),
        followers: overview.followers,
        reach: overview.reach,
        engagements: overview.engagements,
        engagement_rate: overview.engagement_rate,
        trend,
        top_posts,
        top_hashtags,
        top_countries,
        insights: None,
        next_steps: None,
    }
}

/// Collapse whitespace and cut to [`DISPLAY_TEXT_LIMIT`] characters, appending
/// `"..."` only when something was cut.
#[must_use]
pub fn truncate_display_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= DISPLAY_TEXT_LIMIT {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(DISPLAY_TEXT_LIMIT).collect();
    cut.push_str(ELLIPSIS);
    cut
}

fn top_n<T>(items: &[T], compare: impl Fn(&T, &T) -> Ordering) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    // `sort_by` is stable, which is what keeps ties in ingestion order.
    sorted.sort_by(|a, b| compare(a, b));
    sorted.truncate(TOP_N);
    sorted
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
