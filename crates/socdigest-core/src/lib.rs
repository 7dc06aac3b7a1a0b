//! Domain types, configuration, and pure computations shared by the
//! `socdigest` crates.
//!
//! Nothing in this crate performs I/O beyond reading configuration files;
//! parsing lives in `socdigest-ingest` and persistence in `socdigest-db`.

pub mod app_config;
pub mod config;
pub mod model;
pub mod narrative_config;
pub mod period;
pub mod report;
pub mod trend;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use model::{
    compute_country_shares, CountryCount, CountryShare, HashtagRecord, OverviewSnapshot,
    PostRecord,
};
pub use narrative_config::{load_narrative_config, ApiSettings, NarrativeConfig};
pub use period::{extract_period_info, Period, PeriodInfo, PeriodKey, FILENAME_DELIMITER};
pub use report::{
    assemble_report, truncate_display_text, ReportRecord, TopCountry, TopHashtag, TopPost,
    DISPLAY_TEXT_LIMIT, TOP_N,
};
pub use trend::{compute_trend, TrendDelta};

#[derive(Debug, Error)]
pub enum CoreError {
    /// A filename, date range, or period string could not be interpreted.
    #[error("invalid format in {input:?}: {reason}")]
    Format { input: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    ConfigFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ConfigFileParse(#[source] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}
