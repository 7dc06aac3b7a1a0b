use super::*;
use socdigest_core::{TopCountry, TopHashtag, TopPost, TrendDelta};

fn report() -> ReportRecord {
    ReportRecord {
        month_label: "July 2025".to_string(),
        period_label: "1 Jul 2025 - 31 Jul 2025".to_string(),
        followers: 1200,
        reach: 5400,
        engagements: 310,
        engagement_rate: 5.74,
        trend: TrendDelta {
            followers: 20,
            reach_pct: 50.0,
            engagements_pct: -20.0,
            engagement_rate_pts: -0.5,
        },
        top_posts: vec![
            TopPost {
                text: "Launch day".to_string(),
                reactions: 42,
            },
            TopPost {
                text: "Behind the scenes".to_string(),
                reactions: 7,
            },
        ],
        top_hashtags: vec![TopHashtag {
            tag: "#launch".to_string(),
            score: 9.5,
        }],
        top_countries: vec![TopCountry {
            name: "Norway".to_string(),
            users: 60,
            percentage: 60.0,
        }],
        insights: Some("Reach grew.".to_string()),
        next_steps: Some("Post more video.".to_string()),
    }
}

#[test]
fn renders_full_document() {
    let rendered = MarkdownReport(&report()).to_string();

    let expected = "\
# July 2025 KPIs

For the period 1 Jul 2025 - 31 Jul 2025

## Monthly Performance Summary

- Total Followers: 1200 (+20 followers)
- Total Reach: 5400 (+50.0%)
- Total Engagements: 310 (-20.0%)
- Engagement Rate: 5.74% (-0.5 pts)

## Interaction Breakdown

### Top-Performing Posts by Reactions

1. Launch day (42)
2. Behind the scenes (7)

### Top Hashtags by Score

1. #launch (9.5)

### Geographic Distribution

1. Norway (60.0%)

## Insights and Recommendations

Reach grew.

## Next Steps

Post more video.
";
    assert_eq!(rendered, expected);
}

#[test]
fn empty_lists_render_no_data() {
    let mut r = report();
    r.top_posts.clear();
    r.top_hashtags.clear();
    r.top_countries.clear();
    let rendered = MarkdownReport(&r).to_string();

    assert_eq!(rendered.matches("_No data._").count(), 3);
    assert!(!rendered.contains("1. "));
}

#[test]
fn neutral_trend_renders_plus_zero() {
    let mut r = report();
    r.trend = TrendDelta::default();
    let rendered = MarkdownReport(&r).to_string();

    assert!(rendered.contains("- Total Followers: 1200 (+0 followers)"));
    assert!(rendered.contains("- Total Reach: 5400 (+0.0%)"));
    assert!(rendered.contains("- Engagement Rate: 5.74% (+0.0 pts)"));
}

#[test]
fn missing_narrative_renders_placeholders() {
    let mut r = report();
    r.insights = None;
    r.next_steps = None;
    let rendered = MarkdownReport(&r).to_string();

    assert!(rendered.contains(INSIGHTS_PLACEHOLDER));
    assert!(rendered.contains(NEXT_STEPS_PLACEHOLDER));
}

#[test]
fn country_share_rounds_to_one_decimal() {
    let mut r = report();
    r.top_countries[0].percentage = 100.0 / 3.0;
    let rendered = MarkdownReport(&r).to_string();
    assert!(rendered.contains("1. Norway (33.3%)"));
}

#[test]
fn file_name_drops_workspace_marker() {
    let period: Period = "2025-07".parse().unwrap();
    assert_eq!(
        report_file_name("Acme (Workspace)", period),
        "Acme 2025-07.md"
    );
    assert_eq!(report_file_name("Acme", period), "Acme 2025-07.md");
}

#[test]
fn file_name_replaces_path_separators() {
    let period: Period = "2025-07".parse().unwrap();
    assert_eq!(
        report_file_name("Acme/Globex (Workspace)", period),
        "Acme-Globex 2025-07.md"
    );
}
