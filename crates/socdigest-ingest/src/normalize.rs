//! Conversion of raw section rows into typed records.
//!
//! Each normalizer owns a validated [`ColumnMap`] and turns one
//! [`SectionRow`] into zero or one record. Numeric fields are coerced
//! tolerantly; failures are pushed onto the caller's issue list and read as
//! zero.

use socdigest_core::{CountryCount, HashtagRecord, OverviewSnapshot, Period, PeriodKey, PostRecord};

use crate::coerce::{coerce_count, coerce_decimal, FieldCoercionIssue};
use crate::columns::{
    country_columns, hashtag_columns, overview_columns, post_columns, Column, ColumnMap,
    CountryColumn, HashtagColumn, OverviewColumn, PostColumn,
};
use crate::error::IngestError;
use crate::parser::SectionRow;

/// Post type retained by [`PostNormalizer`].
pub const STATUS_POST_TYPE: &str = "Status";

/// Collapse every run of whitespace, including `\r` and `\n`, to one space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Fields<'a, C: Column> {
    columns: &'a ColumnMap<C>,
    row: &'a SectionRow,
    issues: &'a mut Vec<FieldCoercionIssue>,
}

impl<'a, C: Column> Fields<'a, C> {
    fn new(
        columns: &'a ColumnMap<C>,
        row: &'a SectionRow,
        issues: &'a mut Vec<FieldCoercionIssue>,
    ) -> Self {
        Self {
            columns,
            row,
            issues,
        }
    }

    fn text(&self, column: C) -> &'a str {
        self.columns.get(&self.row.fields, column).unwrap_or("")
    }

    fn count(&mut self, column: C) -> i64 {
        let raw = self.text(column);
        coerce_count(raw).unwrap_or_else(|()| {
            self.record_issue(column, raw);
            0
        })
    }

    fn decimal(&mut self, column: C) -> f64 {
        let raw = self.text(column);
        coerce_decimal(raw).unwrap_or_else(|()| {
            self.record_issue(column, raw);
            0.0
        })
    }

    fn record_issue(&mut self, column: C, raw: &str) {
        self.issues.push(FieldCoercionIssue {
            table: C::TABLE,
            column: column.name(),
            line: self.row.line,
            raw: raw.to_string(),
        });
    }
}

#[derive(Debug, Clone)]
pub struct OverviewNormalizer {
    columns: ColumnMap<OverviewColumn>,
}

impl OverviewNormalizer {
    #[must_use]
    pub fn new(columns: ColumnMap<OverviewColumn>) -> Self {
        Self { columns }
    }

    /// Normalizer for the standard overview export layout.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::ColumnMap`] if the built-in layout is invalid.
    pub fn standard() -> Result<Self, IngestError> {
        overview_columns().map(Self::new)
    }

    /// Read the summary row. The workspace name becomes the organization of
    /// the snapshot's key; `None` when it is blank.
    #[must_use]
    pub fn normalize(
        &self,
        row: &SectionRow,
        period: Period,
        issues: &mut Vec<FieldCoercionIssue>,
    ) -> Option<OverviewSnapshot> {
        let mut fields = Fields::new(&self.columns, row, issues);
        let organization = fields.text(OverviewColumn::WorkspaceName);
        if organization.is_empty() {
            return None;
        }
        Some(OverviewSnapshot {
            key: PeriodKey::new(organization, period),
            followers: fields.count(OverviewColumn::Followers),
            reach: fields.count(OverviewColumn::Reach),
            reach_rate: fields.decimal(OverviewColumn::ReachRate),
            engagements: fields.count(OverviewColumn::Engagements),
            engagement_rate: fields.decimal(OverviewColumn::EngagementRate),
        })
    }
}

#[derive(Debug, Clone)]
pub struct CountryNormalizer {
    columns: ColumnMap<CountryColumn>,
}

impl CountryNormalizer {
    #[must_use]
    pub fn new(columns: ColumnMap<CountryColumn>) -> Self {
        Self { columns }
    }

    /// # Errors
    ///
    /// Returns [`IngestError::ColumnMap`] if the built-in layout is invalid.
    pub fn standard() -> Result<Self, IngestError> {
        country_columns().map(Self::new)
    }

    /// Read one country row.
    ///
    /// Unlike the other tables the user count is parsed strictly: `None` for
    /// a blank name or a count that is not a plain integer, which callers
    /// treat as the end of the list.
    #[must_use]
    pub fn normalize(&self, row: &SectionRow) -> Option<CountryCount> {
        let country = self.columns.get(&row.fields, CountryColumn::Name)?;
        if country.is_empty() {
            return None;
        }
        let users = self
            .columns
            .get(&row.fields, CountryColumn::Users)?
            .parse::<i64>()
            .ok()?;
        Some(CountryCount {
            country: country.to_string(),
            users,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PostNormalizer {
    columns: ColumnMap<PostColumn>,
}

impl PostNormalizer {
    #[must_use]
    pub fn new(columns: ColumnMap<PostColumn>) -> Self {
        Self { columns }
    }

    /// # Errors
    ///
    /// Returns [`IngestError::ColumnMap`] if the built-in layout is invalid.
    pub fn standard() -> Result<Self, IngestError> {
        post_columns().map(Self::new)
    }

    /// Keep the row only if its type is [`STATUS_POST_TYPE`].
    #[must_use]
    pub fn normalize(
        &self,
        row: &SectionRow,
        issues: &mut Vec<FieldCoercionIssue>,
    ) -> Option<PostRecord> {
        let mut fields = Fields::new(&self.columns, row, issues);
        let post_type = fields.text(PostColumn::PostType);
        if post_type != STATUS_POST_TYPE {
            return None;
        }
        Some(PostRecord {
            text: collapse_whitespace(fields.text(PostColumn::Text)),
            post_type: post_type.to_string(),
            reactions: fields.count(PostColumn::Reactions),
        })
    }
}

#[derive(Debug, Clone)]
pub struct HashtagNormalizer {
    columns: ColumnMap<HashtagColumn>,
}

impl HashtagNormalizer {
    #[must_use]
    pub fn new(columns: ColumnMap<HashtagColumn>) -> Self {
        Self { columns }
    }

    /// # Errors
    ///
    /// Returns [`IngestError::ColumnMap`] if the built-in layout is invalid.
    pub fn standard() -> Result<Self, IngestError> {
        hashtag_columns().map(Self::new)
    }

    #[must_use]
    pub fn normalize(
        &self,
        row: &SectionRow,
        issues: &mut Vec<FieldCoercionIssue>,
    ) -> HashtagRecord {
        let mut fields = Fields::new(&self.columns, row, issues);
        HashtagRecord {
            tag: fields.text(HashtagColumn::Tag).to_string(),
            score: fields.decimal(HashtagColumn::Score),
            reach: fields.count(HashtagColumn::Reach),
            reactions: fields.count(HashtagColumn::Reactions),
            comments: fields.count(HashtagColumn::Comments),
            shares: fields.count(HashtagColumn::Shares),
            video_views: fields.count(HashtagColumn::VideoViews),
        }
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
