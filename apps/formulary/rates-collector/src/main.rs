//! Rates Collector
//!
//! Refreshes the currency cache from the external exchange-rate provider.
//! Runs as a one-shot refresh or as a scheduled cron service.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::Result;
use tracing::info;

mod collector;
mod config;

use collector::RateCollector;
use config::Config;

#[derive(Parser)]
#[command(name = "rates-collector")]
#[command(about = "Refresh cached exchange rates from the external provider")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a one-time refresh
    Refresh {
        /// Currency codes to refresh (e.g., EUR,GBP). Defaults to all
        /// active currencies.
        #[arg(short, long, value_delimiter = ',')]
        codes: Option<Vec<String>>,
    },

    /// Run as a scheduled service
    Schedule {
        /// Cron expression for scheduling (default: every 6 hours)
        #[arg(short = 'C', long, default_value = "0 0 */6 * * *")]
        cron: String,
    },

    /// Show per-currency cache staleness
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    observability::init_metrics();

    let cli = Cli::parse();

    info!("Connecting to database...");
    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("Database connection failed: {}", e))?;

    let collector = RateCollector::new(db, &config);

    match cli.command {
        Commands::Refresh { codes } => {
            info!("Starting one-time rate refresh");

            let summary = collector.refresh(codes.as_deref()).await?;

            info!(
                "Refresh complete: {} refreshed, {} failed, {} skipped",
                summary.refreshed, summary.failed, summary.skipped
            );
        }

        Commands::Schedule { cron } => {
            info!("Starting scheduled refresh with cron: {}", cron);
            collector.run_scheduled(&cron).await?;
        }

        Commands::Status => {
            let status = collector.status().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}
