//! Configuration for seeding runs.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::models::Dataset;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid dataset {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Dataset {
    /// Loads a dataset from a JSON file shaped like the serialized [`Dataset`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path`, or the placeholder dataset when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, DatasetError> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::placeholder()),
        }
    }
}

/// Dataset file named by `SEED_DATASET`, if any.
pub fn dataset_path_from_env() -> Option<PathBuf> {
    env::var_os("SEED_DATASET").map(PathBuf::from)
}

/// Database settings shared by the server and the `seed` binary.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string. TLS is required regardless of its `sslmode`.
    pub database_url: String,
    pub max_connections: u32,
    /// Dataset to seed instead of the built-in placeholder.
    pub dataset_path: Option<PathBuf>,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid u32")?;

        Ok(Self {
            database_url,
            max_connections,
            dataset_path: dataset_path_from_env(),
        })
    }

    /// The configured dataset, or the placeholder when none is set.
    pub fn load_dataset(&self) -> Result<Dataset, DatasetError> {
        Dataset::load(self.dataset_path.as_deref())
    }
}
