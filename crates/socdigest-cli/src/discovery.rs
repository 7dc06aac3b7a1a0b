//! Locating the three export files a report is built from.
//!
//! Files are recognized by a label in their name plus the `.csv` suffix. The
//! input is either the directory holding the exports or any one of the export
//! files, in which case its directory is searched.

use std::path::{Path, PathBuf};

use anyhow::Context;

const CSV_SUFFIX: &str = ".csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportKind {
    Overview,
    PostInsights,
    HashtagAnalysis,
}

impl ExportKind {
    fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::PostInsights => "Post Insights",
            Self::HashtagAnalysis => "Hashtag Analysis",
        }
    }

    /// Classify a bare file name. Labels are checked in a fixed order, so a
    /// name carrying more than one label counts as the first.
    pub(crate) fn classify(file_name: &str) -> Option<Self> {
        if !file_name.ends_with(CSV_SUFFIX) {
            return None;
        }
        [Self::Overview, Self::PostInsights, Self::HashtagAnalysis]
            .into_iter()
            .find(|kind| file_name.contains(kind.label()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportFiles {
    pub overview: PathBuf,
    pub posts: PathBuf,
    pub hashtags: PathBuf,
}

/// Find the overview, post-insights, and hashtag-analysis exports for `input`.
///
/// Directory entries are visited in name order; when two files carry the same
/// label the later one wins and a warning is logged.
///
/// # Errors
///
/// Returns an error if `input` does not exist, if it is a file that is not a
/// recognized export, if the directory cannot be read, or if any of the three
/// exports is missing.
pub(crate) fn discover_exports(input: &Path) -> anyhow::Result<ExportFiles> {
    let metadata = std::fs::metadata(input)
        .with_context(|| format!("cannot access {}", input.display()))?;

    let dir = if metadata.is_dir() {
        input.to_path_buf()
    } else {
        let name = bare_file_name(input)?;
        if ExportKind::classify(name).is_none() {
            anyhow::bail!("provided file is not a recognized CSV export: {name}");
        }
        match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    };

    let mut names: Vec<(String, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(&dir)
        .with_context(|| format!("cannot read directory {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push((name.to_string(), entry.path()));
        }
    }
    names.sort();

    let mut overview = None;
    let mut posts = None;
    let mut hashtags = None;
    for (name, path) in names {
        let slot = match ExportKind::classify(&name) {
            Some(ExportKind::Overview) => &mut overview,
            Some(ExportKind::PostInsights) => &mut posts,
            Some(ExportKind::HashtagAnalysis) => &mut hashtags,
            None => continue,
        };
        if let Some(previous) = slot.replace(path) {
            tracing::warn!(
                ignored = %previous.display(),
                file = %name,
                "more than one export with the same label; using the later file"
            );
        }
    }

    match (overview, posts, hashtags) {
        (Some(overview), Some(posts), Some(hashtags)) => Ok(ExportFiles {
            overview,
            posts,
            hashtags,
        }),
        _ => anyhow::bail!(
            "could not find all required CSV files in directory: {}",
            dir.display()
        ),
    }
}

/// The final component of `path` as UTF-8.
pub(crate) fn bare_file_name(path: &Path) -> anyhow::Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("{} has no UTF-8 file name", path.display()))
}
