//! Postgres-backed store.

use async_trait::async_trait;
use sqlx::{
    PgPool, Postgres,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use tracing::debug;

use super::{
    SeedError,
    store::{Executor, SqlValue, Statement, Store, Transaction, finished},
};
use crate::config::DatabaseConfig;

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    Ok(config
        .database_url
        .parse::<PgConnectOptions>()?
        .ssl_mode(PgSslMode::Require))
}

/// Opens a pool to the configured database. TLS is always required,
/// whatever `sslmode` the URL carries.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options(config)?)
        .await
}

/// Like [`connect_pool`], but defers connecting until the pool is first used.
pub fn connect_pool_lazy(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy_with(connect_options(config)?))
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, SeedError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTransaction { tx: Some(tx) }))
    }
}

struct PgTransaction {
    tx: Option<sqlx::Transaction<'static, Postgres>>,
}

#[async_trait]
impl Executor for PgTransaction {
    async fn execute(&mut self, statement: &Statement) -> Result<u64, SeedError> {
        let tx = self.tx.as_mut().ok_or_else(finished)?;

        let sql = statement.sql();
        let mut query = sqlx::query(&sql);
        for value in statement.params() {
            query = match value {
                SqlValue::Uuid(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.as_str()),
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::Date(v) => query.bind(*v),
            };
        }

        let result = query.execute(&mut **tx).await?;
        debug!(rows = result.rows_affected(), "{}", sql.trim());
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl Transaction for PgTransaction {
    async fn commit(&mut self) -> Result<(), SeedError> {
        let tx = self.tx.take().ok_or_else(finished)?;
        tx.commit().await?;
        Ok(())
    }
}
