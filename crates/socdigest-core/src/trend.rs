//! Month-over-month deltas between two overview snapshots.

use serde::Serialize;

use crate::model::OverviewSnapshot;

/// Change relative to the previous calendar month.
///
/// The neutral value (all zeros, via `Default`) is what a first tracked
/// period reports.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrendDelta {
    /// Absolute follower difference.
    pub followers: i64,
    /// Percent change in reach.
    pub reach_pct: f64,
    /// Percent change in engagements.
    pub engagements_pct: f64,
    /// Difference of the two engagement rates, in percentage points.
    pub engagement_rate_pts: f64,
}

/// Compute the delta of `current` against `previous`.
///
/// Percent changes are only computed when the previous value is strictly
/// positive; otherwise they stay at `0.0`.
#[must_use]
pub fn compute_trend(
    current: &OverviewSnapshot,
    previous: Option<&OverviewSnapshot>,
) -> TrendDelta {
    let Some(prev) = previous else {
        return TrendDelta::default();
    };

    TrendDelta {
        followers: current.followers.saturating_sub(prev.followers),
        reach_pct: percent_change(current.reach, prev.reach),
        engagements_pct: percent_change(current.engagements, prev.engagements),
        engagement_rate_pts: current.engagement_rate - prev.engagement_rate,
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent_change(current: i64, previous: i64) -> f64 {
    if previous > 0 {
        current.saturating_sub(previous) as f64 * 100.0 / previous as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKey;

    fn snapshot(
        period: &str,
        followers: i64,
        reach: i64,
        engagements: i64,
        rate: f64,
    ) -> OverviewSnapshot {
        OverviewSnapshot {
            key: PeriodKey::new("Acme", period.parse().unwrap()),
            followers,
            reach,
            reach_rate: 0.0,
            engagements,
            engagement_rate: rate,
        }
    }

    #[test]
    fn no_previous_snapshot_is_neutral() {
        let current = snapshot("2025-01", 100, 1000, 50, 5.0);
        assert_eq!(compute_trend(&current, None), TrendDelta::default());
    }

    #[test]
    fn deltas_against_previous_month() {
        let current = snapshot("2025-02", 120, 1500, 40, 4.5);
        let previous = snapshot("2025-01", 100, 1000, 50, 5.0);
        let delta = compute_trend(&current, Some(&previous));

        assert_eq!(delta.followers, 20);
        assert!((delta.reach_pct - 50.0).abs() < 1e-9);
        assert!((delta.engagements_pct + 20.0).abs() < 1e-9);
        assert!((delta.engagement_rate_pts + 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_previous_values_leave_percentages_at_zero() {
        let current = snapshot("2025-02", 10, 500, 30, 2.0);
        let previous = snapshot("2025-01", 0, 0, 0, 0.0);
        let delta = compute_trend(&current, Some(&previous));

        assert_eq!(delta.followers, 10);
        assert!(delta.reach_pct.abs() < f64::EPSILON);
        assert!(delta.engagements_pct.abs() < f64::EPSILON);
        assert!((delta.engagement_rate_pts - 2.0).abs() < 1e-9);
    }

    #[test]
    fn follower_loss_is_negative() {
        let current = snapshot("2025-02", 90, 1, 1, 0.0);
        let previous = snapshot("2025-01", 100, 1, 1, 0.0);
        assert_eq!(compute_trend(&current, Some(&previous)).followers, -10);
    }
}
