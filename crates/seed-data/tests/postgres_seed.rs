//! Integration tests for seeding a real Postgres database.
//!
//! To run these tests, you need a PostgreSQL database the test user may create
//! schemas (and the `uuid-ossp` extension) in, with `DATABASE_URL` pointing at it.
//!
//! Run with: `DATABASE_URL=postgres://... cargo nextest run -p seed-data postgres`
//!
//! Each test works in its own schema and drops it afterwards, so they can
//! safely run against a development database.

use seed_data::{
    db::{PgStore, Seeder, TableCounts},
    models::{Dataset, RevenueEntry},
    password::verify_password,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use uuid::Uuid;

struct TestSchema {
    admin: PgPool,
    pool: PgPool,
    name: String,
}

impl TestSchema {
    async fn drop(self) {
        self.pool.close().await;
        let _ = sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name))
            .execute(&self.admin)
            .await;
    }

    async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}.{table}", self.name))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }

    async fn table_exists(&self, table: &str) -> bool {
        let found: Option<String> =
            sqlx::query_scalar(&format!("SELECT to_regclass('{}.{table}')::text", self.name))
                .fetch_one(&self.pool)
                .await
                .expect("Failed to look up table");
        found.is_some()
    }
}

/// Creates a scratch schema, skipping tests if DATABASE_URL is not set.
async fn get_test_schema() -> Option<TestSchema> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: DATABASE_URL not set");
            return None;
        }
    };

    let admin = match PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Skipping test: Failed to connect to database: {e}");
            return None;
        }
    };

    // Installed once in public so schema drops never take it with them.
    // Concurrent tests may race on this; the loser's error is harmless.
    let _ = sqlx::query(r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp" WITH SCHEMA public"#)
        .execute(&admin)
        .await;

    let name = format!("seed_test_{}", Uuid::new_v4().simple());
    sqlx::query(&format!("CREATE SCHEMA {name}"))
        .execute(&admin)
        .await
        .expect("Failed to create test schema");

    let search_path = format!("SET search_path TO {name}, public");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .after_connect(move |conn, _meta| {
            let search_path = search_path.clone();
            Box::pin(async move {
                sqlx::query(&search_path).execute(conn).await?;
                Ok(())
            })
        })
        .connect(&database_url)
        .await
        .expect("Failed to connect with test search_path");

    Some(TestSchema { admin, pool, name })
}

#[tokio::test]
async fn test_postgres_seed_is_idempotent() {
    let Some(schema) = get_test_schema().await else {
        return;
    };
    let dataset = Dataset::placeholder();
    let store = PgStore::new(schema.pool.clone());
    let seeder = Seeder::new(dataset.clone());

    let first = seeder.seed(&store).await.expect("First seed failed");
    assert_eq!(first.customers.inserted, 6);

    let second = seeder.seed(&store).await.expect("Second seed failed");
    assert_eq!(second.invoices, TableCounts { inserted: 0, skipped: 13 });

    assert_eq!(schema.count("users").await, dataset.users.len() as i64);
    assert_eq!(schema.count("customers").await, dataset.customers.len() as i64);
    assert_eq!(schema.count("invoices").await, dataset.invoices.len() as i64);
    assert_eq!(schema.count("revenue").await, dataset.revenue.len() as i64);

    let stored: String = sqlx::query_scalar(&format!(
        "SELECT password FROM {}.users WHERE email = $1",
        schema.name
    ))
    .bind("user@nextmail.com")
    .fetch_one(&schema.pool)
    .await
    .expect("Seeded user missing");
    assert_ne!(stored, "123456");
    assert!(verify_password("123456", &stored).unwrap());

    schema.drop().await;
}

#[tokio::test]
async fn test_postgres_seed_rolls_back_on_failure() {
    let Some(schema) = get_test_schema().await else {
        return;
    };
    let store = PgStore::new(schema.pool.clone());

    // Too long for VARCHAR(4); fails after every other table is written.
    let mut dataset = Dataset::placeholder();
    dataset.revenue.push(RevenueEntry {
        month: "Smarch".to_string(),
        revenue: 1,
    });

    let result = Seeder::new(dataset).seed(&store).await;
    assert!(result.is_err(), "Overlong month should fail the seed");

    for table in ["users", "customers", "invoices", "revenue"] {
        assert!(
            !schema.table_exists(table).await,
            "{table} survived a failed seed"
        );
    }

    schema.drop().await;
}
