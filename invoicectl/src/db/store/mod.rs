//! Storage seam for the invoice mutation pipeline.
//!
//! [`InvoiceStore`] is what the executor talks to. Every call is one unit of work: an
//! implementation acquires whatever connection it needs, issues a single statement and
//! releases the connection before returning, whether the statement succeeded or not.
//!
//! - [`postgres::PostgresInvoiceStore`]: pooled PostgreSQL connections via SQLx
//! - [`in_memory::InMemoryInvoiceStore`]: process-local map, for tests and local runs

use async_trait::async_trait;

use crate::db::errors::Result;
use crate::db::models::invoices::{InvoiceCreateDBRequest, InvoiceDBResponse, InvoiceUpdateDBRequest};
use crate::types::InvoiceId;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryInvoiceStore;
pub use postgres::PostgresInvoiceStore;

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new invoice and return the stored row, including its generated ID.
    async fn insert(&self, request: &InvoiceCreateDBRequest) -> Result<InvoiceDBResponse>;

    /// Overwrite the mutable fields of an invoice. Returns rows affected (0 or 1).
    async fn update(&self, id: InvoiceId, request: &InvoiceUpdateDBRequest) -> Result<u64>;

    /// Remove an invoice. Returns rows affected (0 or 1).
    async fn delete(&self, id: InvoiceId) -> Result<u64>;

    /// Read a single invoice.
    async fn get(&self, id: InvoiceId) -> Result<Option<InvoiceDBResponse>>;

    /// Read the whole invoice collection, newest first.
    async fn list(&self) -> Result<Vec<InvoiceDBResponse>>;
}
