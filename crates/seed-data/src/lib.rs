//! Sample data and seeding for the acme dashboard database.
//!
//! The crate owns the four seeded entity sets (users, customers, invoices and
//! monthly revenue), the built-in placeholder dataset, and the [`db::Seeder`]
//! that writes a dataset in one transaction.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let config = DatabaseConfig::from_env()?;
//! let store = PgStore::new(connect_pool(&config).await?);
//!
//! let report = Seeder::new(Dataset::placeholder()).seed(&store).await?;
//! println!("{}", report.message);
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod password;
mod placeholder;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{DatabaseConfig, DatasetError};
    pub use crate::db::{
        MemoryStore, PgStore, SeedError, SeedReport, Seeder, Store, connect_pool,
        connect_pool_lazy,
    };
    pub use crate::models::{Customer, Dataset, Invoice, RevenueEntry, User};
}
