//! Markdown rendering of an assembled [`ReportRecord`].

use std::fmt;

use socdigest_core::{Period, ReportRecord};
use socdigest_narrative::{INSIGHTS_PLACEHOLDER, NEXT_STEPS_PLACEHOLDER};

const NO_DATA: &str = "_No data._";
const WORKSPACE_MARKER: &str = "(Workspace)";

/// Display adapter writing a report as a Markdown document.
pub(crate) struct MarkdownReport<'a>(pub &'a ReportRecord);

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let t = &r.trend;

        writeln!(f, "# {} KPIs", r.month_label)?;
        writeln!(f)?;
        writeln!(f, "For the period {}", r.period_label)?;
        writeln!(f)?;
        writeln!(f, "## Monthly Performance Summary")?;
        writeln!(f)?;
        writeln!(
            f,
            "- Total Followers: {} ({:+} followers)",
            r.followers, t.followers
        )?;
        writeln!(f, "- Total Reach: {} ({:+.1}%)", r.reach, t.reach_pct)?;
        writeln!(
            f,
            "- Total Engagements: {} ({:+.1}%)",
            r.engagements, t.engagements_pct
        )?;
        writeln!(
            f,
            "- Engagement Rate: {}% ({:+.1} pts)",
            r.engagement_rate, t.engagement_rate_pts
        )?;
        writeln!(f)?;
        writeln!(f, "## Interaction Breakdown")?;
        writeln!(f)?;

        writeln!(f, "### Top-Performing Posts by Reactions")?;
        writeln!(f)?;
        numbered(
            f,
            r.top_posts
                .iter()
                .map(|p| format!("{} ({})", p.text, p.reactions)),
        )?;
        writeln!(f)?;

        writeln!(f, "### Top Hashtags by Score")?;
        writeln!(f)?;
        numbered(
            f,
            r.top_hashtags
                .iter()
                .map(|h| format!("{} ({})", h.tag, h.score)),
        )?;
        writeln!(f)?;

        writeln!(f, "### Geographic Distribution")?;
        writeln!(f)?;
        numbered(
            f,
            r.top_countries
                .iter()
                .map(|c| format!("{} ({:.1}%)", c.name, c.percentage)),
        )?;
        writeln!(f)?;

        writeln!(f, "## Insights and Recommendations")?;
        writeln!(f)?;
        writeln!(
            f,
            "{}",
            r.insights.as_deref().unwrap_or(INSIGHTS_PLACEHOLDER)
        )?;
        writeln!(f)?;
        writeln!(f, "## Next Steps")?;
        writeln!(f)?;
        writeln!(
            f,
            "{}",
            r.next_steps.as_deref().unwrap_or(NEXT_STEPS_PLACEHOLDER)
        )
    }
}

fn numbered(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = String>) -> fmt::Result {
    let mut any = false;
    for (idx, item) in items.enumerate() {
        writeln!(f, "{}. {item}", idx + 1)?;
        any = true;
    }
    if !any {
        writeln!(f, "{NO_DATA}")?;
    }
    Ok(())
}

/// `"<organization> <YYYY-MM>.md"`, with the `(Workspace)` marker removed
/// from the organization name. Path separators are replaced so the report
/// always lands directly in the output directory.
pub(crate) fn report_file_name(organization: &str, period: Period) -> String {
    let cleaned = organization
        .replace(WORKSPACE_MARKER, "")
        .replace(['/', '\\'], "-");
    format!("{} {period}.md", cleaned.trim())
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
