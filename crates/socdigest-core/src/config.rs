use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://analytics.db?mode=rwc";
pub const DEFAULT_COUNTRY_ROW_CAP: usize = 250;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// config pointing at `./analytics.db`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = or_default("SOCDIGEST_DATABASE_URL", DEFAULT_DATABASE_URL);
    let log_level = or_default("SOCDIGEST_LOG_LEVEL", "info");
    let narrative_config_path =
        PathBuf::from(or_default("SOCDIGEST_NARRATIVE_CONFIG", "./config.yaml"));

    let narrative_timeout_secs: u64 =
        parse_var(&or_default, "SOCDIGEST_NARRATIVE_TIMEOUT_SECS", "30")?;
    let db_max_connections: u32 = parse_var(&or_default, "SOCDIGEST_DB_MAX_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs: u64 =
        parse_var(&or_default, "SOCDIGEST_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    let country_row_cap: usize = parse_var(
        &or_default,
        "SOCDIGEST_COUNTRY_ROW_CAP",
        &DEFAULT_COUNTRY_ROW_CAP.to_string(),
    )?;

    if db_max_connections == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SOCDIGEST_DB_MAX_CONNECTIONS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        log_level,
        narrative_config_path,
        narrative_timeout_secs,
        db_max_connections,
        db_acquire_timeout_secs,
        country_row_cap,
    })
}

fn parse_var<T>(
    or_default: &impl Fn(&str, &str) -> String,
    var: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = or_default(var, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
