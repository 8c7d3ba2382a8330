//! Statements and the transactional store interface the seeder writes through.

use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use super::SeedError;

/// Extension providing `uuid_generate_v4()` for the primary key defaults.
pub const UUID_EXTENSION: &str = "uuid-ossp";

/// The four tables owned by the seeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    Users,
    Customers,
    Invoices,
    Revenue,
}

impl Table {
    /// Tables in the order they are created and filled.
    pub const ALL: [Table; 4] = [Table::Users, Table::Customers, Table::Invoices, Table::Revenue];

    pub fn name(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Customers => "customers",
            Table::Invoices => "invoices",
            Table::Revenue => "revenue",
        }
    }

    pub fn create_sql(&self) -> &'static str {
        match self {
            Table::Users => {
                r#"
                CREATE TABLE IF NOT EXISTS users (
                    id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    email TEXT NOT NULL UNIQUE,
                    password TEXT NOT NULL
                )
                "#
            }
            Table::Customers => {
                r#"
                CREATE TABLE IF NOT EXISTS customers (
                    id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                    name VARCHAR(255) NOT NULL,
                    email VARCHAR(255) NOT NULL,
                    image_url VARCHAR(255) NOT NULL
                )
                "#
            }
            Table::Invoices => {
                r#"
                CREATE TABLE IF NOT EXISTS invoices (
                    id UUID DEFAULT uuid_generate_v4() PRIMARY KEY,
                    customer_id UUID NOT NULL,
                    amount INT NOT NULL,
                    status VARCHAR(255) NOT NULL,
                    date DATE NOT NULL
                )
                "#
            }
            Table::Revenue => {
                r#"
                CREATE TABLE IF NOT EXISTS revenue (
                    month VARCHAR(4) NOT NULL UNIQUE,
                    revenue INT NOT NULL
                )
                "#
            }
        }
    }

    /// Conflict-skipping insert; parameters follow the column order listed here.
    pub fn insert_sql(&self) -> &'static str {
        match self {
            // Either unique column (id or email) may collide.
            Table::Users => {
                r#"
                INSERT INTO users (id, name, email, password)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT DO NOTHING
                "#
            }
            Table::Customers => {
                r#"
                INSERT INTO customers (id, name, email, image_url)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO NOTHING
                "#
            }
            Table::Invoices => {
                r#"
                INSERT INTO invoices (id, customer_id, amount, status, date)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO NOTHING
                "#
            }
            Table::Revenue => {
                r#"
                INSERT INTO revenue (month, revenue)
                VALUES ($1, $2)
                ON CONFLICT (month) DO NOTHING
                "#
            }
        }
    }

    /// Insert parameter positions holding a unique column.
    pub fn unique_params(&self) -> &'static [usize] {
        match self {
            Table::Users => &[0, 2],
            Table::Customers | Table::Invoices | Table::Revenue => &[0],
        }
    }

    /// Whether the table's DDL calls into [`UUID_EXTENSION`].
    pub fn needs_uuid_extension(&self) -> bool {
        !matches!(self, Table::Revenue)
    }
}

/// A value bound to an insert parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Uuid(Uuid),
    Text(String),
    Int(i32),
    Date(Date),
}

impl SqlValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A single statement issued by the seeder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    EnableExtension(&'static str),
    CreateTable(Table),
    Insert(Table, Vec<SqlValue>),
}

impl Statement {
    pub fn sql(&self) -> String {
        match self {
            Statement::EnableExtension(name) => format!(r#"CREATE EXTENSION IF NOT EXISTS "{name}""#),
            Statement::CreateTable(table) => table.create_sql().to_string(),
            Statement::Insert(table, _) => table.insert_sql().to_string(),
        }
    }

    pub fn params(&self) -> &[SqlValue] {
        match self {
            Statement::Insert(_, params) => params,
            _ => &[],
        }
    }
}

/// Executes statements, returning the number of rows affected.
#[async_trait]
pub trait Executor: Send {
    async fn execute(&mut self, statement: &Statement) -> Result<u64, SeedError>;
}

/// An open transaction. Dropping it without [`Transaction::commit`] rolls back.
#[async_trait]
pub trait Transaction: Executor {
    async fn commit(&mut self) -> Result<(), SeedError>;
}

/// A database the seeder can open transactions against.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Transaction>, SeedError>;
}

pub(crate) fn finished() -> SeedError {
    SeedError::Store("transaction already finished".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_skips_conflicts() {
        for table in Table::ALL {
            let sql = table.insert_sql();
            assert!(sql.contains(&format!("INSERT INTO {} ", table.name())));
            assert!(sql.contains("DO NOTHING"), "{} insert must skip conflicts", table.name());
        }
    }

    #[test]
    fn test_create_sql_is_idempotent() {
        for table in Table::ALL {
            assert!(
                table
                    .create_sql()
                    .contains(&format!("CREATE TABLE IF NOT EXISTS {}", table.name()))
            );
        }
    }

    #[test]
    fn test_extension_sql() {
        let statement = Statement::EnableExtension(UUID_EXTENSION);
        assert_eq!(statement.sql(), r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#);
        assert!(statement.params().is_empty());
    }
}
