//! Database seeding.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::store::{Executor, SqlValue, Statement, Store, Table, Transaction, UUID_EXTENSION};
use crate::{models::Dataset, password::hash_password};

pub const SEEDED_MESSAGE: &str = "Database seeded successfully";

/// Why a seed run failed. The whole run is rolled back in every case and the
/// message is the underlying cause.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Hash(String),
    #[error("{0}")]
    Store(String),
}

/// Rows written to and skipped in one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub inserted: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub message: String,
    pub users: TableCounts,
    pub customers: TableCounts,
    pub invoices: TableCounts,
    pub revenue: TableCounts,
}

/// Creates the dashboard tables and fills them from a [`Dataset`].
pub struct Seeder {
    dataset: Dataset,
}

impl Seeder {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Seeds every table inside a single transaction.
    ///
    /// Tables are created if missing and rows that collide with existing keys
    /// are skipped, so running this again leaves the database unchanged. On any
    /// error the transaction is dropped uncommitted.
    pub async fn seed(&self, store: &dyn Store) -> Result<SeedReport, SeedError> {
        info!("Seeding {} records...", self.dataset.len());

        let mut tx = store.begin().await?;
        tx.execute(&Statement::EnableExtension(UUID_EXTENSION))
            .await?;

        let user_rows = self.user_rows().await?;
        let users = insert_rows(&mut *tx, Table::Users, user_rows).await?;
        let customers = insert_rows(&mut *tx, Table::Customers, self.customer_rows()).await?;
        let invoices = insert_rows(&mut *tx, Table::Invoices, self.invoice_rows()).await?;
        let revenue = insert_rows(&mut *tx, Table::Revenue, self.revenue_rows()).await?;

        tx.commit().await?;
        info!("Seed committed");

        Ok(SeedReport {
            message: SEEDED_MESSAGE.to_string(),
            users,
            customers,
            invoices,
            revenue,
        })
    }

    /// Argon2 is CPU-bound, so each password is hashed on the blocking pool.
    async fn user_rows(&self) -> Result<Vec<Vec<SqlValue>>, SeedError> {
        let mut rows = Vec::with_capacity(self.dataset.users.len());
        for user in &self.dataset.users {
            let password = user.password.clone();
            let hash = tokio::task::spawn_blocking(move || hash_password(&password))
                .await
                .map_err(|e| SeedError::Hash(e.to_string()))??;

            rows.push(vec![
                SqlValue::Uuid(user.id),
                SqlValue::Text(user.name.clone()),
                SqlValue::Text(user.email.clone()),
                SqlValue::Text(hash),
            ]);
        }
        Ok(rows)
    }

    fn customer_rows(&self) -> Vec<Vec<SqlValue>> {
        self.dataset
            .customers
            .iter()
            .map(|customer| {
                vec![
                    SqlValue::Uuid(customer.id),
                    SqlValue::Text(customer.name.clone()),
                    SqlValue::Text(customer.email.clone()),
                    SqlValue::Text(customer.image_url.clone()),
                ]
            })
            .collect()
    }

    fn invoice_rows(&self) -> Vec<Vec<SqlValue>> {
        self.dataset
            .invoices
            .iter()
            .map(|invoice| {
                vec![
                    SqlValue::Uuid(invoice.seed_id()),
                    SqlValue::Uuid(invoice.customer_id),
                    SqlValue::Int(invoice.amount),
                    SqlValue::Text(invoice.status.clone()),
                    SqlValue::Date(invoice.date),
                ]
            })
            .collect()
    }

    fn revenue_rows(&self) -> Vec<Vec<SqlValue>> {
        self.dataset
            .revenue
            .iter()
            .map(|entry| vec![SqlValue::Text(entry.month.clone()), SqlValue::Int(entry.revenue)])
            .collect()
    }
}

/// Creates `table` and inserts `rows` into it.
async fn insert_rows(
    tx: &mut dyn Transaction,
    table: Table,
    rows: Vec<Vec<SqlValue>>,
) -> Result<TableCounts, SeedError> {
    info!("Seeding {} {}...", rows.len(), table.name());

    tx.execute(&Statement::CreateTable(table)).await?;

    let mut counts = TableCounts::default();
    for row in rows {
        match tx.execute(&Statement::Insert(table, row)).await? {
            0 => counts.skipped += 1,
            n => counts.inserted += n,
        }
    }

    info!(
        "Seeded {}: {} inserted, {} skipped",
        table.name(),
        counts.inserted,
        counts.skipped
    );
    Ok(counts)
}
