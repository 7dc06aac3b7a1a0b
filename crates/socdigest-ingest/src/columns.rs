//! Logical column names per table kind and their validated positions.

use std::fmt::Debug;

use crate::error::IngestError;

/// A logical column of one table kind.
pub trait Column: Copy + Eq + Debug + 'static {
    /// Table kind, used in diagnostics.
    const TABLE: &'static str;
    /// Every column the normalizer reads; each must be mapped exactly once.
    const ALL: &'static [Self];

    fn name(self) -> &'static str;
}

/// Positions of each logical column within a raw row.
#[derive(Debug, Clone)]
pub struct ColumnMap<C: Column> {
    positions: Vec<(C, usize)>,
}

impl<C: Column> ColumnMap<C> {
    /// Build a map, checking that every column in [`Column::ALL`] appears
    /// exactly once and that no two columns share a position.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::ColumnMap`] when a column is missing, repeated,
    /// or collides with another column's position.
    pub fn new(positions: &[(C, usize)]) -> Result<Self, IngestError> {
        let invalid = |reason: String| IngestError::ColumnMap {
            table: C::TABLE,
            reason,
        };

        for column in C::ALL {
            match positions.iter().filter(|(c, _)| c == column).count() {
                0 => return Err(invalid(format!("column {} is not mapped", column.name()))),
                1 => {}
                _ => return Err(invalid(format!("column {} is mapped twice", column.name()))),
            }
        }
        for (i, (a, pos_a)) in positions.iter().enumerate() {
            if let Some((b, _)) = positions[i + 1..].iter().find(|(_, pos_b)| pos_b == pos_a) {
                return Err(invalid(format!(
                    "columns {} and {} share position {pos_a}",
                    a.name(),
                    b.name()
                )));
            }
        }

        Ok(Self {
            positions: positions.to_vec(),
        })
    }

    /// Zero-based position of `column`.
    #[must_use]
    pub fn position(&self, column: C) -> usize {
        self.positions
            .iter()
            .find(|(c, _)| *c == column)
            .map_or(usize::MAX, |(_, pos)| *pos)
    }

    /// The field for `column`, or `None` when the row is too short.
    #[must_use]
    pub fn get<'r>(&self, fields: &'r [String], column: C) -> Option<&'r str> {
        fields.get(self.position(column)).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewColumn {
    WorkspaceName,
    Followers,
    Reach,
    ReachRate,
    Engagements,
    EngagementRate,
}

impl Column for OverviewColumn {
    const TABLE: &'static str = "overview";
    const ALL: &'static [Self] = &[
        Self::WorkspaceName,
        Self::Followers,
        Self::Reach,
        Self::ReachRate,
        Self::Engagements,
        Self::EngagementRate,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::WorkspaceName => "workspace_name",
            Self::Followers => "followers",
            Self::Reach => "reach",
            Self::ReachRate => "reach_rate",
            Self::Engagements => "engagements",
            Self::EngagementRate => "engagement_rate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryColumn {
    Name,
    Users,
}

impl Column for CountryColumn {
    const TABLE: &'static str = "countries";
    const ALL: &'static [Self] = &[Self::Name, Self::Users];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "country",
            Self::Users => "users",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostColumn {
    Text,
    PostType,
    Reactions,
}

impl Column for PostColumn {
    const TABLE: &'static str = "posts";
    const ALL: &'static [Self] = &[Self::Text, Self::PostType, Self::Reactions];

    fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::PostType => "post_type",
            Self::Reactions => "reactions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashtagColumn {
    Tag,
    Score,
    Reach,
    Reactions,
    Comments,
    Shares,
    VideoViews,
}

impl Column for HashtagColumn {
    const TABLE: &'static str = "hashtags";
    const ALL: &'static [Self] = &[
        Self::Tag,
        Self::Score,
        Self::Reach,
        Self::Reactions,
        Self::Comments,
        Self::Shares,
        Self::VideoViews,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Score => "score",
            Self::Reach => "reach",
            Self::Reactions => "reactions",
            Self::Comments => "comments",
            Self::Shares => "shares",
            Self::VideoViews => "video_views",
        }
    }
}

/// Column layout of the overview export's summary row.
///
/// # Errors
///
/// Never fails for the built-in layout; the `Result` comes from validation.
pub fn overview_columns() -> Result<ColumnMap<OverviewColumn>, IngestError> {
    ColumnMap::new(&[
        (OverviewColumn::WorkspaceName, 0),
        (OverviewColumn::Followers, 2),
        (OverviewColumn::Reach, 3),
        (OverviewColumn::ReachRate, 4),
        (OverviewColumn::Engagements, 6),
        (OverviewColumn::EngagementRate, 7),
    ])
}

/// Column layout of the overview export's country rows.
///
/// # Errors
///
/// Never fails for the built-in layout; the `Result` comes from validation.
pub fn country_columns() -> Result<ColumnMap<CountryColumn>, IngestError> {
    ColumnMap::new(&[(CountryColumn::Name, 0), (CountryColumn::Users, 1)])
}

/// Column layout of the post-insights export.
///
/// # Errors
///
/// Never fails for the built-in layout; the `Result` comes from validation.
pub fn post_columns() -> Result<ColumnMap<PostColumn>, IngestError> {
    ColumnMap::new(&[
        (PostColumn::Text, 4),
        (PostColumn::PostType, 5),
        (PostColumn::Reactions, 8),
    ])
}

/// Column layout of the hashtag-analysis export.
///
/// # Errors
///
/// Never fails for the built-in layout; the `Result` comes from validation.
pub fn hashtag_columns() -> Result<ColumnMap<HashtagColumn>, IngestError> {
    ColumnMap::new(&[
        (HashtagColumn::Tag, 0),
        (HashtagColumn::Score, 4),
        (HashtagColumn::Reach, 5),
        (HashtagColumn::Reactions, 6),
        (HashtagColumn::Comments, 7),
        (HashtagColumn::Shares, 8),
        (HashtagColumn::VideoViews, 9),
    ])
}
