use std::sync::Arc;

use anyhow::Context;
use dashboard::{config::AppConfig, run_server};
use seed_data::db::{PgStore, connect_pool_lazy};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let dataset = config.database.load_dataset()?;

    // Connection errors surface from /seed rather than at startup.
    let pool = connect_pool_lazy(&config.database).context("invalid DATABASE_URL")?;

    run_server(Arc::new(PgStore::new(pool)), dataset, config.port).await
}
