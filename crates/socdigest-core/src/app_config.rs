use std::path::PathBuf;

/// Runtime settings for the `socdigest` binary, read from `SOCDIGEST_*`
/// environment variables.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    /// Location of the YAML document describing the text-generation service.
    pub narrative_config_path: PathBuf,
    pub narrative_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Upper bound on country rows read from one overview export.
    pub country_row_cap: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("narrative_config_path", &self.narrative_config_path)
            .field("narrative_timeout_secs", &self.narrative_timeout_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("country_row_cap", &self.country_row_cap)
            .finish()
    }
}
