mod discovery;
mod pipeline;
mod render;
mod show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use socdigest_core::{AppConfig, Period};
use sqlx::SqlitePool;
use tracing_subscriber::EnvFilter;

use crate::pipeline::{run_report, ReportOptions};

#[derive(Debug, Parser)]
#[command(name = "socdigest")]
#[command(about = "Monthly social media KPI reports from analytics exports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingest one month of exports and write its Markdown report
    Report {
        /// Directory holding the exports, or any one of the export files
        path: PathBuf,
        /// Directory the report is written to (defaults to the working directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Skip narrative generation and print placeholder text instead
        #[arg(long)]
        no_narrative: bool,
    },
    /// Show the stored snapshot for an organization and month
    Show {
        /// Organization name as it appears in the overview export
        organization: String,
        /// Reporting month as YYYY-MM
        period: Period,
    },
    /// Database management
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending schema migrations
    Migrate,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = socdigest_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, &config))
}

async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        println!("no command given; run `socdigest --help` for usage");
        return Ok(());
    };

    match command {
        Commands::Report {
            path,
            output_dir,
            no_narrative,
        } => {
            let pool = open_store(config).await?;
            let options = ReportOptions {
                input: &path,
                output_dir: output_dir.as_deref(),
                narrative: !no_narrative,
            };
            let result = run_report(&pool, config, &options).await;
            pool.close().await;
            let written = result?;
            println!("Report generated successfully: {}", written.display());
        }
        Commands::Show {
            organization,
            period,
        } => {
            let pool = open_store(config).await?;
            let result = show::run_show(&pool, &organization, period).await;
            pool.close().await;
            result?;
        }
        Commands::Db { command } => {
            let pool = connect(config).await?;
            let result = run_db(&pool, command).await;
            pool.close().await;
            result?;
        }
    }

    Ok(())
}

async fn run_db(pool: &SqlitePool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            socdigest_db::health_check(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = socdigest_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let pool_config = socdigest_db::PoolConfig::from_app_config(config);
    let pool = socdigest_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

/// Connect and bring the schema up to date.
async fn open_store(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let pool = connect(config).await?;
    let applied = socdigest_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied schema migrations");
    }
    Ok(pool)
}
