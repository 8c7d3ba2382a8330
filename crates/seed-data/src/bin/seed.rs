//! Seeds the dashboard database with the placeholder dataset
//! (or the file named by `SEED_DATASET`).
//!
//! Run with:
//! ```
//! DATABASE_URL=postgres://... cargo run -p seed-data --bin seed
//! ```
//!
//! Set `SEED_DRY_RUN=1` to seed an in-memory store instead of connecting.

use std::env;

use anyhow::Context;
use seed_data::{config::dataset_path_from_env, prelude::*};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let dry_run = env::var("SEED_DRY_RUN").is_ok_and(|v| v == "1" || v == "true");

    let report = if dry_run {
        let dataset = Dataset::load(dataset_path_from_env().as_deref())?;

        tracing::info!("Dry run against an in-memory store");
        Seeder::new(dataset).seed(&MemoryStore::new()).await?
    } else {
        let config = DatabaseConfig::from_env().context("failed to read configuration")?;
        let dataset = config.load_dataset()?;

        let pool = connect_pool(&config)
            .await
            .context("failed to connect to database")?;
        tracing::info!("Connected to database");

        Seeder::new(dataset).seed(&PgStore::new(pool)).await?
    };

    // Summary output
    tracing::info!("{}", report.message);
    tracing::info!("  Users: {} inserted, {} skipped", report.users.inserted, report.users.skipped);
    tracing::info!(
        "  Customers: {} inserted, {} skipped",
        report.customers.inserted,
        report.customers.skipped
    );
    tracing::info!(
        "  Invoices: {} inserted, {} skipped",
        report.invoices.inserted,
        report.invoices.skipped
    );
    tracing::info!(
        "  Revenue: {} inserted, {} skipped",
        report.revenue.inserted,
        report.revenue.skipped
    );

    Ok(())
}
