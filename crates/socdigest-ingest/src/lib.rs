//! Reading and normalizing the three social-media export files.

pub mod coerce;
pub mod columns;
pub mod error;
pub mod files;
pub mod normalize;
pub mod parser;

pub use coerce::FieldCoercionIssue;
pub use columns::{Column, ColumnMap};
pub use error::IngestError;
pub use files::{
    parse_hashtags, parse_overview, parse_posts, read_hashtags_file, read_overview_file,
    read_posts_file, HashtagExport, OverviewExport, PostExport,
};
pub use normalize::{
    collapse_whitespace, CountryNormalizer, HashtagNormalizer, OverviewNormalizer,
    PostNormalizer, STATUS_POST_TYPE,
};
pub use parser::{GapPolicy, SectionRow, SectionSpec, SectionStart, SectionedTableParser};
