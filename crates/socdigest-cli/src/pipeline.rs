//! The `report` command: exports in, Markdown report out.
//!
//! Stages run strictly in sequence. Every stage except narrative generation
//! is fatal on failure; narrative failures fall back to placeholder text.

use std::path::{Path, PathBuf};

use anyhow::Context;
use sqlx::SqlitePool;

use socdigest_core::{
    assemble_report, compute_country_shares, extract_period_info, load_narrative_config,
    AppConfig, NarrativeConfig, ReportRecord,
};
use socdigest_db::{load_trend, replace_collection, upsert_overview, Collection};
use socdigest_ingest::{read_hashtags_file, read_overview_file, read_posts_file};
use socdigest_narrative::{Narrative, NarrativeClient, NarrativeInput};

use crate::discovery::{bare_file_name, discover_exports};
use crate::render::{report_file_name, MarkdownReport};

/// Options for one `report` run.
#[derive(Debug, Clone)]
pub(crate) struct ReportOptions<'a> {
    pub input: &'a Path,
    pub output_dir: Option<&'a Path>,
    pub narrative: bool,
}

/// Run the full pipeline against `pool` and return the path of the written
/// report.
///
/// # Errors
///
/// Returns an error if discovery, period extraction, reading any export,
/// loading a present-but-invalid narrative config, any store operation, or
/// writing the report fails.
pub(crate) async fn run_report(
    pool: &SqlitePool,
    config: &AppConfig,
    options: &ReportOptions<'_>,
) -> anyhow::Result<PathBuf> {
    let files = discover_exports(options.input)?;
    tracing::info!(
        overview = %files.overview.display(),
        posts = %files.posts.display(),
        hashtags = %files.hashtags.display(),
        "found export files"
    );

    let info = extract_period_info(bare_file_name(&files.overview)?)
        .context("error extracting period from overview filename")?;

    let narrative_config = if options.narrative {
        load_narrative_config(&config.narrative_config_path)?
    } else {
        None
    };

    let overview = read_overview_file(&files.overview, info.period, config.country_row_cap)
        .context("error reading overview file")?;
    let posts = read_posts_file(&files.posts).context("error reading post insights file")?;
    let hashtags =
        read_hashtags_file(&files.hashtags).context("error reading hashtag analysis file")?;

    let snapshot = overview.snapshot;
    let countries = compute_country_shares(overview.countries);
    let key = &snapshot.key;
    tracing::info!(
        %key,
        countries = countries.len(),
        posts = posts.posts.len(),
        hashtags = hashtags.hashtags.len(),
        "exports normalized"
    );

    upsert_overview(pool, &snapshot)
        .await
        .context("error saving overview")?;
    replace_collection(pool, key, Collection::Countries(&countries))
        .await
        .context("error saving countries")?;
    replace_collection(pool, key, Collection::Posts(&posts.posts))
        .await
        .context("error saving posts")?;
    replace_collection(pool, key, Collection::Hashtags(&hashtags.hashtags))
        .await
        .context("error saving hashtags")?;
    tracing::info!(%key, "snapshot stored");

    let trend = load_trend(pool, &snapshot).await?;
    let report = assemble_report(
        &info,
        &snapshot,
        trend,
        &countries,
        &posts.posts,
        &hashtags.hashtags,
    );

    let (insights, next_steps) = narrative_texts(
        options.narrative,
        narrative_config.as_ref(),
        config.narrative_timeout_secs,
        &report,
    )
    .await;
    let report = report.with_narrative(insights, next_steps);

    let dir = options.output_dir.unwrap_or_else(|| Path::new("."));
    let path = dir.join(report_file_name(&key.organization, key.period));
    std::fs::write(&path, MarkdownReport(&report).to_string())
        .with_context(|| format!("error writing report {}", path.display()))?;

    Ok(path)
}

/// Insights and next-steps text for `report`, or the placeholders when the
/// narrative step is disabled, unconfigured, or fails.
async fn narrative_texts(
    enabled: bool,
    config: Option<&NarrativeConfig>,
    timeout_secs: u64,
    report: &ReportRecord,
) -> (String, String) {
    if !enabled {
        tracing::info!("narrative generation disabled");
        return Narrative::placeholders();
    }
    let Some(config) = config else {
        tracing::warn!("narrative config not found; using placeholder text");
        return Narrative::placeholders();
    };

    let client = match NarrativeClient::new(&config.api, timeout_secs) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "cannot build narrative client; using placeholder text");
            return Narrative::placeholders();
        }
    };

    client
        .generate_narrative(&NarrativeInput::from_report(report))
        .await
        .into_texts()
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
