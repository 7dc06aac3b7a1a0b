//! Prompt text for the two narrative sections of a report.

use socdigest_core::ReportRecord;

/// The report figures a prompt is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeInput {
    pub month_label: String,
    pub period_label: String,
    pub followers: i64,
    pub reach: i64,
    pub engagements: i64,
    pub engagement_rate: f64,
    pub top_post_count: usize,
    pub top_hashtag_count: usize,
}

impl NarrativeInput {
    #[must_use]
    pub fn from_report(report: &ReportRecord) -> Self {
        Self {
            month_label: report.month_label.clone(),
            period_label: report.period_label.clone(),
            followers: report.followers,
            reach: report.reach,
            engagements: report.engagements,
            engagement_rate: report.engagement_rate,
            top_post_count: report.top_posts.len(),
            top_hashtag_count: report.top_hashtags.len(),
        }
    }
}

#[must_use]
pub fn insights_prompt(input: &NarrativeInput) -> String {
    format!(
        "Based on the following social media analytics data for {month} ({period}):\n\
         \n\
         - Followers: {followers}\n\
         - Reach: {reach}\n\
         - Engagements: {engagements}\n\
         - Engagement Rate: {rate:.2}%\n\
         - Top performing posts: {posts} posts with high engagement\n\
         - Top hashtags: {hashtags} hashtags analyzed\n\
         \n\
         Please provide insights and recommendations for improving social media \
         performance. Focus on what's working well and what could be improved.",
        month = input.month_label,
        period = input.period_label,
        followers = input.followers,
        reach = input.reach,
        engagements = input.engagements,
        rate = input.engagement_rate,
        posts = input.top_post_count,
        hashtags = input.top_hashtag_count,
    )
}

#[must_use]
pub fn next_steps_prompt(input: &NarrativeInput) -> String {
    format!(
        "Based on the social media analytics data for {month} ({period}):\n\
         \n\
         - Followers: {followers}\n\
         - Reach: {reach}\n\
         - Engagements: {engagements}\n\
         - Engagement Rate: {rate:.2}%\n\
         \n\
         Please suggest specific next steps and action items to optimize KPIs for \
         the next month. Include concrete, actionable recommendations.",
        month = input.month_label,
        period = input.period_label,
        followers = input.followers,
        reach = input.reach,
        engagements = input.engagements,
        rate = input.engagement_rate,
    )
}
