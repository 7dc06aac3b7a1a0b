use sqlx::SqlitePool;

use socdigest_core::{Period, PeriodKey};

/// Print the stored summary and collection sizes for one organization and
/// month.
///
/// # Errors
///
/// Returns an error if a database query fails. A missing snapshot is not an
/// error.
pub(crate) async fn run_show(
    pool: &SqlitePool,
    organization: &str,
    period: Period,
) -> anyhow::Result<()> {
    let key = PeriodKey::new(organization, period);
    let Some(snapshot) = socdigest_db::get_overview(pool, &key).await? else {
        println!("not found: no snapshot stored for {organization} {period}; run `report` first");
        return Ok(());
    };

    let sizes = socdigest_db::collection_sizes(pool, &key).await?;
    let trend = socdigest_db::load_trend(pool, &snapshot).await?;

    println!("Organization:    {}", key.organization);
    println!("Period:          {}", key.period);
    println!(
        "Followers:       {} ({:+})",
        snapshot.followers, trend.followers
    );
    println!(
        "Reach:           {} ({:+.1}%, rate {}%)",
        snapshot.reach, trend.reach_pct, snapshot.reach_rate
    );
    println!(
        "Engagements:     {} ({:+.1}%)",
        snapshot.engagements, trend.engagements_pct
    );
    println!(
        "Engagement rate: {}% ({:+.1} pts)",
        snapshot.engagement_rate, trend.engagement_rate_pts
    );
    println!();
    println!("{:<11}{:>6}", "COLLECTION", "ROWS");
    println!("{:<11}{:>6}", "countries", sizes.countries);
    println!("{:<11}{:>6}", "posts", sizes.posts);
    println!("{:<11}{:>6}", "hashtags", sizes.hashtags);

    Ok(())
}
