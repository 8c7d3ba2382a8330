//! In-process store used for dry runs and tests.
//!
//! Each transaction works on a copy of the committed state and publishes it on
//! commit, so an abandoned transaction leaves nothing behind. Inserts skip rows
//! that collide on any of the table's unique columns, and creating a table that
//! defaults its key to `uuid_generate_v4()` fails until the extension exists.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    SeedError,
    store::{Executor, SqlValue, Statement, Store, Table, Transaction, UUID_EXTENSION, finished},
};

#[derive(Debug, Clone, Default)]
struct Snapshot {
    extensions: BTreeSet<String>,
    tables: BTreeMap<Table, Vec<Vec<SqlValue>>>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    committed: Arc<Mutex<Snapshot>>,
    fail_at: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the `n`th statement (zero-based) of every transaction fail,
    /// as a dropped connection would.
    pub fn failing_at(mut self, n: usize) -> Self {
        self.fail_at = Some(n);
        self
    }

    /// Committed rows of `table`, in insertion order.
    pub async fn rows(&self, table: Table) -> Vec<Vec<SqlValue>> {
        self.committed
            .lock()
            .await
            .tables
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn has_table(&self, table: Table) -> bool {
        self.committed.lock().await.tables.contains_key(&table)
    }

    pub async fn has_extension(&self, name: &str) -> bool {
        self.committed.lock().await.extensions.contains(name)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn Transaction>, SeedError> {
        let working = self.committed.lock().await.clone();
        Ok(Box::new(MemoryTransaction {
            committed: Arc::clone(&self.committed),
            working: Some(working),
            executed: 0,
            fail_at: self.fail_at,
        }))
    }
}

struct MemoryTransaction {
    committed: Arc<Mutex<Snapshot>>,
    working: Option<Snapshot>,
    executed: usize,
    fail_at: Option<usize>,
}

#[async_trait]
impl Executor for MemoryTransaction {
    async fn execute(&mut self, statement: &Statement) -> Result<u64, SeedError> {
        let working = self.working.as_mut().ok_or_else(finished)?;

        if self.fail_at == Some(self.executed) {
            return Err(SeedError::Store(
                "connection closed during transaction".to_string(),
            ));
        }
        self.executed += 1;

        match statement {
            Statement::EnableExtension(name) => {
                working.extensions.insert(name.to_string());
                Ok(0)
            }
            Statement::CreateTable(table) => {
                if table.needs_uuid_extension() && !working.extensions.contains(UUID_EXTENSION) {
                    return Err(SeedError::Store(
                        "function uuid_generate_v4() does not exist".to_string(),
                    ));
                }
                working.tables.entry(*table).or_default();
                Ok(0)
            }
            Statement::Insert(table, params) => {
                let rows = working.tables.get_mut(table).ok_or_else(|| {
                    SeedError::Store(format!("relation \"{}\" does not exist", table.name()))
                })?;

                let conflicts = rows.iter().any(|row| {
                    table
                        .unique_params()
                        .iter()
                        .any(|&i| row.get(i) == params.get(i))
                });
                if conflicts {
                    return Ok(0);
                }

                rows.push(params.clone());
                Ok(1)
            }
        }
    }
}

#[async_trait]
impl Transaction for MemoryTransaction {
    async fn commit(&mut self) -> Result<(), SeedError> {
        let working = self.working.take().ok_or_else(finished)?;
        *self.committed.lock().await = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revenue_row(month: &str, revenue: i32) -> Statement {
        Statement::Insert(
            Table::Revenue,
            vec![SqlValue::Text(month.to_string()), SqlValue::Int(revenue)],
        )
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_is_discarded() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        tx.execute(&Statement::CreateTable(Table::Revenue))
            .await
            .unwrap();
        tx.execute(&revenue_row("Jan", 2000)).await.unwrap();
        drop(tx);

        assert!(!store.has_table(Table::Revenue).await);
    }

    #[tokio::test]
    async fn test_conflicting_insert_is_skipped() {
        let store = MemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        tx.execute(&Statement::CreateTable(Table::Revenue))
            .await
            .unwrap();
        assert_eq!(tx.execute(&revenue_row("Jan", 2000)).await.unwrap(), 1);
        assert_eq!(tx.execute(&revenue_row("Jan", 9999)).await.unwrap(), 0);
        tx.commit().await.unwrap();

        let rows = store.rows(Table::Revenue).await;
        assert_eq!(rows, vec![vec![SqlValue::Text("Jan".into()), SqlValue::Int(2000)]]);
    }

    #[tokio::test]
    async fn test_insert_into_missing_table_fails() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let err = tx.execute(&revenue_row("Jan", 2000)).await.unwrap_err();
        assert_eq!(err.to_string(), "relation \"revenue\" does not exist");
    }

    #[tokio::test]
    async fn test_uuid_tables_need_extension() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        assert!(tx.execute(&Statement::CreateTable(Table::Users)).await.is_err());
        tx.execute(&Statement::EnableExtension(UUID_EXTENSION))
            .await
            .unwrap();
        assert!(tx.execute(&Statement::CreateTable(Table::Users)).await.is_ok());
    }

    #[tokio::test]
    async fn test_commit_twice_fails() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        tx.commit().await.unwrap();
        assert!(tx.commit().await.is_err());
        assert!(tx.execute(&revenue_row("Jan", 1)).await.is_err());
    }
}
