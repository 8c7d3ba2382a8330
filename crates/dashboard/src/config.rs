//! Server configuration read from the environment.

use std::env;

use anyhow::{Context, Result};
use seed_data::config::DatabaseConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database = DatabaseConfig::from_env()?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .context("PORT must be a valid u16")?;

        Ok(Self { database, port })
    }
}
