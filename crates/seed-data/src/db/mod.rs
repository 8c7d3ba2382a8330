//! Database integration for seeding.
//!
//! The [`Seeder`] writes a dataset through a [`Store`], which hands out
//! transactions: [`PgStore`] for Postgres and [`MemoryStore`] for dry runs
//! and tests.

mod memory;
mod postgres;
mod seeder;
mod store;

pub use memory::MemoryStore;
pub use postgres::{PgStore, connect_pool, connect_pool_lazy};
pub use seeder::{SEEDED_MESSAGE, SeedError, SeedReport, Seeder, TableCounts};
pub use store::{Executor, SqlValue, Statement, Store, Table, Transaction, UUID_EXTENSION};
