//! Records seeded into the dashboard database.

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Namespace for invoice identifiers derived from invoice content.
const INVOICE_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2f0e_8a53_4c1d_9b7e_3d2a_51c4_e0a9);

/// A dashboard login. `password` is plaintext here and hashed before storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// An invoice raised against a customer. Amounts are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub customer_id: Uuid,
    pub amount: i32,
    pub status: String,
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl Invoice {
    /// Identifier stored for this invoice.
    ///
    /// Derived from the invoice content, so seeding the same invoice twice
    /// collides on the primary key instead of creating a second row.
    pub fn seed_id(&self) -> Uuid {
        let name = format!(
            "{}:{}:{}:{}",
            self.customer_id, self.amount, self.status, self.date
        );
        Uuid::new_v5(&INVOICE_NAMESPACE, name.as_bytes())
    }
}

/// Revenue for one month, keyed by a short month code such as `Jan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueEntry {
    pub month: String,
    pub revenue: i32,
}

/// Everything the seeder writes, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub revenue: Vec<RevenueEntry>,
}

impl Dataset {
    /// Total number of records across all four entity sets.
    pub fn len(&self) -> usize {
        self.users.len() + self.customers.len() + self.invoices.len() + self.revenue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
