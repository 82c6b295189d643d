//! In-memory invoice store.
//!
//! Stores invoices in a process-local map. It applies the same status constraint the
//! PostgreSQL table does, so callers see a `CheckViolation` for statuses the table would
//! reject. Data is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::InvoiceStore;
use crate::db::errors::{DbError, Result};
use crate::db::models::invoices::{Invoice, InvoiceCreateDBRequest, InvoiceDBResponse, InvoiceUpdateDBRequest};
use crate::types::{InvoiceId, InvoiceStatus};

#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<InvoiceId, Invoice>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored invoices.
    pub fn len(&self) -> usize {
        self.invoices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.read().is_empty()
    }
}

fn check_status(status: &str) -> Result<()> {
    if InvoiceStatus::parse(status).is_none() {
        return Err(DbError::CheckViolation {
            constraint: Some("invoices_status_check".to_string()),
            table: Some("invoices".to_string()),
            message: format!("invalid invoice status {status:?}"),
        });
    }
    Ok(())
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, request: &InvoiceCreateDBRequest) -> Result<InvoiceDBResponse> {
        check_status(&request.status)?;

        let invoice = Invoice {
            id: Uuid::new_v4(),
            customer_id: request.customer_id.clone(),
            amount: request.amount_in_cents,
            status: request.status.clone(),
            date: request.date,
        };
        self.invoices.write().insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn update(&self, id: InvoiceId, request: &InvoiceUpdateDBRequest) -> Result<u64> {
        check_status(&request.status)?;

        let mut invoices = self.invoices.write();
        match invoices.get_mut(&id) {
            Some(invoice) => {
                invoice.customer_id = request.customer_id.clone();
                invoice.amount = request.amount_in_cents;
                invoice.status = request.status.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: InvoiceId) -> Result<u64> {
        Ok(self.invoices.write().remove(&id).map_or(0, |_| 1))
    }

    async fn get(&self, id: InvoiceId) -> Result<Option<InvoiceDBResponse>> {
        Ok(self.invoices.read().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<InvoiceDBResponse>> {
        let mut invoices: Vec<Invoice> = self.invoices.read().values().cloned().collect();
        invoices.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(invoices)
    }
}
