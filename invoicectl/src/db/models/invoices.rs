//! Database models for invoices.

use crate::types::{CustomerId, InvoiceId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Database representation of an invoice
///
/// `amount` is stored in integer cents. `status` is constrained to `pending` or `paid`
/// by the table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: i64,
    pub status: String,
    pub date: NaiveDate,
}

/// Request to insert a new invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCreateDBRequest {
    pub customer_id: CustomerId,
    pub amount_in_cents: i64,
    pub status: String,
    pub date: NaiveDate,
}

/// Request to overwrite the mutable fields of an existing invoice. The invoice date is
/// never part of an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceUpdateDBRequest {
    pub customer_id: CustomerId,
    pub amount_in_cents: i64,
    pub status: String,
}

/// Response from database after creating or reading an invoice
pub type InvoiceDBResponse = Invoice;
