//! API response models for invoices.

use crate::db::models::invoices::Invoice;
use crate::types::{CustomerId, InvoiceId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API response for an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InvoiceResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    /// Amount in integer cents, as stored
    pub amount: i64,
    /// Amount in dollars (sent/returned as string to preserve precision)
    #[schema(value_type = String)]
    pub amount_dollars: Decimal,
    /// `pending` or `paid`
    pub status: String,
    pub date: NaiveDate,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            customer_id: invoice.customer_id,
            amount: invoice.amount,
            amount_dollars: Decimal::new(invoice.amount, 2),
            status: invoice.status,
            date: invoice.date,
        }
    }
}
