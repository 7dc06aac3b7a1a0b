//! Readers for the three export files.
//!
//! Each `parse_*` function takes the full text of one export and drains the
//! section parser into normalized records. The `read_*_file` wrappers load the
//! file first.

use std::path::Path;

use socdigest_core::{CountryCount, HashtagRecord, OverviewSnapshot, Period, PostRecord};
use tracing::{debug, warn};

use crate::coerce::FieldCoercionIssue;
use crate::error::IngestError;
use crate::normalize::{CountryNormalizer, HashtagNormalizer, OverviewNormalizer, PostNormalizer};
use crate::parser::{SectionSpec, SectionedTableParser};

pub const WORKSPACE_SENTINEL: &str = "Workspace Name";
pub const COUNTRIES_SENTINEL: &str = "Top Countries";
/// Lines before the first data row in the post and hashtag exports.
pub const PREAMBLE_LINES: usize = 4;
pub const POST_MIN_FIELDS: usize = 8;
pub const HASHTAG_MIN_FIELDS: usize = 6;

const SUMMARY: &str = "summary";
const COUNTRIES: &str = "countries";
const POSTS: &str = "posts";
const HASHTAGS: &str = "hashtags";

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewExport {
    pub snapshot: OverviewSnapshot,
    /// Country rows in file order, before shares are computed.
    pub countries: Vec<CountryCount>,
    pub issues: Vec<FieldCoercionIssue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostExport {
    pub posts: Vec<PostRecord>,
    pub issues: Vec<FieldCoercionIssue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashtagExport {
    pub hashtags: Vec<HashtagRecord>,
    pub issues: Vec<FieldCoercionIssue>,
}

fn overview_layout(country_cap: usize) -> Vec<SectionSpec> {
    let mut layout = vec![SectionSpec::sentinel(SUMMARY, WORKSPACE_SENTINEL)
        .required()
        .max_rows(1)];
    if country_cap > 0 {
        layout.push(
            SectionSpec::sentinel(COUNTRIES, COUNTRIES_SENTINEL)
                .min_fields(2)
                .max_rows(country_cap)
                .terminated_by(&["Top"]),
        );
    }
    layout
}

/// Parse an overview export: the summary row after the workspace sentinel
/// and up to `country_cap` country rows after the countries sentinel.
///
/// The country list ends silently at the first row whose name is blank or
/// whose user count is not an integer.
///
/// # Errors
///
/// Returns [`IngestError::MalformedDocument`] when the workspace sentinel is
/// missing and [`IngestError::MissingDataRow`] when no usable summary row
/// follows it.
pub fn parse_overview(
    source: &str,
    period: Period,
    country_cap: usize,
) -> Result<OverviewExport, IngestError> {
    let overview = OverviewNormalizer::standard()?;
    let country = CountryNormalizer::standard()?;

    let mut snapshot = None;
    let mut countries = Vec::new();
    let mut countries_done = false;
    let mut issues = Vec::new();

    for row in SectionedTableParser::new(strip_bom(source), overview_layout(country_cap)) {
        let row = row?;
        match row.section {
            SUMMARY => snapshot = overview.normalize(&row, period, &mut issues),
            COUNTRIES if !countries_done => match country.normalize(&row) {
                Some(count) => countries.push(count),
                None => {
                    debug!(line = row.line, "country list ended at non-country row");
                    countries_done = true;
                }
            },
            _ => {}
        }
    }

    let snapshot = snapshot.ok_or(IngestError::MissingDataRow { section: SUMMARY })?;
    log_issues(SUMMARY, &issues);
    Ok(OverviewExport {
        snapshot,
        countries,
        issues,
    })
}

/// Parse a post-insights export, keeping only status posts.
///
/// # Errors
///
/// Returns [`IngestError::TruncatedPreamble`] when the file ends inside the
/// preamble.
pub fn parse_posts(source: &str) -> Result<PostExport, IngestError> {
    let normalizer = PostNormalizer::standard()?;
    let layout = vec![SectionSpec::preamble(POSTS, PREAMBLE_LINES)
        .required()
        .min_fields(POST_MIN_FIELDS)
        .skip_gaps()];

    let mut posts = Vec::new();
    let mut issues = Vec::new();
    for row in SectionedTableParser::new(strip_bom(source), layout) {
        if let Some(post) = normalizer.normalize(&row?, &mut issues) {
            posts.push(post);
        }
    }

    log_issues(POSTS, &issues);
    Ok(PostExport { posts, issues })
}

/// Parse a hashtag-analysis export.
///
/// # Errors
///
/// Returns [`IngestError::TruncatedPreamble`] when the file ends inside the
/// preamble.
pub fn parse_hashtags(source: &str) -> Result<HashtagExport, IngestError> {
    let normalizer = HashtagNormalizer::standard()?;
    let layout = vec![SectionSpec::preamble(HASHTAGS, PREAMBLE_LINES)
        .required()
        .min_fields(HASHTAG_MIN_FIELDS)
        .skip_gaps()];

    let mut hashtags = Vec::new();
    let mut issues = Vec::new();
    for row in SectionedTableParser::new(strip_bom(source), layout) {
        hashtags.push(normalizer.normalize(&row?, &mut issues));
    }

    log_issues(HASHTAGS, &issues);
    Ok(HashtagExport { hashtags, issues })
}

/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be read, otherwise as
/// [`parse_overview`].
pub fn read_overview_file(
    path: &Path,
    period: Period,
    country_cap: usize,
) -> Result<OverviewExport, IngestError> {
    parse_overview(&read_export(path)?, period, country_cap)
}

/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be read, otherwise as
/// [`parse_posts`].
pub fn read_posts_file(path: &Path) -> Result<PostExport, IngestError> {
    parse_posts(&read_export(path)?)
}

/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be read, otherwise as
/// [`parse_hashtags`].
pub fn read_hashtags_file(path: &Path) -> Result<HashtagExport, IngestError> {
    parse_hashtags(&read_export(path)?)
}

/// Invalid UTF-8 is replaced rather than rejected.
fn read_export(path: &Path) -> Result<String, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn strip_bom(source: &str) -> &str {
    source.strip_prefix('\u{feff}').unwrap_or(source)
}

fn log_issues(table: &str, issues: &[FieldCoercionIssue]) {
    for issue in issues {
        warn!(table, %issue, "numeric field coerced to zero");
    }
}
