use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    /// A required sentinel row was never found before end-of-input.
    #[error("malformed document: required sentinel {sentinel:?} not found")]
    MalformedDocument { sentinel: String },

    #[error("document ended after {found} of {expected} preamble lines")]
    TruncatedPreamble { expected: usize, found: usize },

    #[error("section {section:?} has no data row")]
    MissingDataRow { section: &'static str },

    #[error("invalid column map for {table}: {reason}")]
    ColumnMap { table: &'static str, reason: String },
}
