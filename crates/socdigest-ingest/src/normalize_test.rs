use super::*;

fn row(fields: &[&str]) -> SectionRow {
    SectionRow {
        section: "test",
        line: 5,
        fields: fields.iter().map(|f| (*f).to_string()).collect(),
    }
}

fn post_row(text: &str, post_type: &str, reactions: &str) -> SectionRow {
    row(&["id", "date", "net", "profile", text, post_type, "x", "y", reactions])
}

// -----------------------------------------------------------------------
// posts
// -----------------------------------------------------------------------

#[test]
fn only_status_posts_are_retained() {
    let normalizer = PostNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    let records: Vec<PostRecord> = [
        post_row("Hello", "Status", "42"),
        post_row("Pic", "Photo", "999"),
    ]
    .iter()
    .filter_map(|r| normalizer.normalize(r, &mut issues))
    .collect();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].reactions, 42);
    assert_eq!(records[0].post_type, "Status");
    assert!(issues.is_empty());
}

#[test]
fn post_type_comparison_is_exact() {
    let normalizer = PostNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    assert!(normalizer
        .normalize(&post_row("a", "status", "1"), &mut issues)
        .is_none());
    assert!(normalizer
        .normalize(&post_row("a", "Status update", "1"), &mut issues)
        .is_none());
}

#[test]
fn post_text_whitespace_is_collapsed() {
    let normalizer = PostNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    let post = normalizer
        .normalize(
            &post_row("Line one\r\nline   two\n\tend", "Status", "3"),
            &mut issues,
        )
        .unwrap();
    assert_eq!(post.text, "Line one line two end");
}

#[test]
fn dash_reactions_are_zero_without_issue() {
    let normalizer = PostNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    let post = normalizer
        .normalize(&post_row("a", "Status", "-"), &mut issues)
        .unwrap();
    assert_eq!(post.reactions, 0);
    assert!(issues.is_empty());
}

#[test]
fn unparseable_reactions_record_an_issue() {
    let normalizer = PostNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    let post = normalizer
        .normalize(&post_row("a", "Status", "many"), &mut issues)
        .unwrap();
    assert_eq!(post.reactions, 0);
    assert_eq!(
        issues,
        [FieldCoercionIssue {
            table: "posts",
            column: "reactions",
            line: 5,
            raw: "many".to_string(),
        }]
    );
}

#[test]
fn short_post_row_reads_missing_reactions_as_zero() {
    let normalizer = PostNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    let post = normalizer
        .normalize(
            &row(&["id", "date", "net", "profile", "t", "Status", "x", "y"]),
            &mut issues,
        )
        .unwrap();
    assert_eq!(post.reactions, 0);
    assert!(issues.is_empty());
}

// -----------------------------------------------------------------------
// overview
// -----------------------------------------------------------------------

#[test]
fn overview_reads_fixed_positions() {
    let normalizer = OverviewNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    let period = "2025-07".parse().unwrap();
    let snapshot = normalizer
        .normalize(
            &row(&["Acme (Workspace)", "p", "1,200", "5400", "12.5%", "x", "310", "5.74%"]),
            period,
            &mut issues,
        )
        .unwrap();

    assert_eq!(snapshot.key, PeriodKey::new("Acme (Workspace)", period));
    assert_eq!(snapshot.followers, 1200);
    assert_eq!(snapshot.reach, 5400);
    assert!((snapshot.reach_rate - 12.5).abs() < 1e-9);
    assert_eq!(snapshot.engagements, 310);
    assert!((snapshot.engagement_rate - 5.74).abs() < 1e-9);
    assert!(issues.is_empty());
}

#[test]
fn overview_bad_field_is_zeroed_and_rest_survives() {
    let normalizer = OverviewNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    let snapshot = normalizer
        .normalize(
            &row(&["Acme", "p", "oops", "5400", "", "x", "-", "n/a"]),
            "2025-07".parse().unwrap(),
            &mut issues,
        )
        .unwrap();

    assert_eq!(snapshot.followers, 0);
    assert_eq!(snapshot.reach, 5400);
    assert!(snapshot.reach_rate.abs() < f64::EPSILON);
    assert_eq!(snapshot.engagements, 0);
    let columns: Vec<&str> = issues.iter().map(|i| i.column).collect();
    assert_eq!(columns, ["followers", "engagement_rate"]);
}

#[test]
fn overview_without_name_is_none() {
    let normalizer = OverviewNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    assert!(normalizer
        .normalize(&row(&["", "p", "1"]), "2025-07".parse().unwrap(), &mut issues)
        .is_none());
}

// -----------------------------------------------------------------------
// countries
// -----------------------------------------------------------------------

#[test]
fn country_rows_parse_strictly() {
    let normalizer = CountryNormalizer::standard().unwrap();
    assert_eq!(
        normalizer.normalize(&row(&["Norway", "10"])),
        Some(CountryCount {
            country: "Norway".to_string(),
            users: 10,
        })
    );
    assert!(normalizer.normalize(&row(&["Norway", "1,000"])).is_none());
    assert!(normalizer.normalize(&row(&["Norway", ""])).is_none());
    assert!(normalizer.normalize(&row(&["", "10"])).is_none());
    assert!(normalizer.normalize(&row(&["Norway"])).is_none());
}

// -----------------------------------------------------------------------
// hashtags
// -----------------------------------------------------------------------

#[test]
fn hashtag_fields_are_coerced() {
    let normalizer = HashtagNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    let tag = normalizer.normalize(
        &row(&["#launch", "a", "b", "c", "8.5", "1,000", "40", "", "3", "120"]),
        &mut issues,
    );
    assert_eq!(tag.tag, "#launch");
    assert!((tag.score - 8.5).abs() < 1e-9);
    assert_eq!(tag.reach, 1000);
    assert_eq!(tag.reactions, 40);
    assert_eq!(tag.comments, 0);
    assert_eq!(tag.shares, 3);
    assert_eq!(tag.video_views, 120);
    assert!(issues.is_empty());
}

#[test]
fn narrow_hashtag_row_defaults_missing_counts() {
    let normalizer = HashtagNormalizer::standard().unwrap();
    let mut issues = Vec::new();
    let tag = normalizer.normalize(&row(&["#x", "a", "b", "c", "2", "7"]), &mut issues);
    assert_eq!(tag.reach, 7);
    assert_eq!(tag.video_views, 0);
    assert!(issues.is_empty());
}

#[test]
fn collapse_whitespace_trims_edges() {
    assert_eq!(collapse_whitespace("  a \n b  "), "a b");
    assert_eq!(collapse_whitespace("\r\n"), "");
}
