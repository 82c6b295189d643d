//! Single-statement invoice mutations.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::db::models::invoices::{InvoiceCreateDBRequest, InvoiceUpdateDBRequest};
use crate::db::store::InvoiceStore;
use crate::invoices::validation::ValidatedInvoice;
use crate::types::{InvoiceId, MutationKind, abbrev_uuid};

/// One write against the invoice table.
#[derive(Debug, Clone, Copy)]
pub enum Mutation<'a> {
    Insert(&'a ValidatedInvoice),
    Update { id: InvoiceId, invoice: &'a ValidatedInvoice },
    Delete { id: InvoiceId },
}

impl Mutation<'_> {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Insert(_) => MutationKind::Create,
            Mutation::Update { .. } => MutationKind::Update,
            Mutation::Delete { .. } => MutationKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected(pub u64);

/// A mutation failed in storage. Carries only the operation, never the cause: the cause
/// is written to the log where the failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to {} invoice.", .kind.verb())]
pub struct FatalError {
    kind: MutationKind,
}

impl FatalError {
    pub fn new(kind: MutationKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }
}

/// Runs validated mutations against an [`InvoiceStore`].
///
/// Each call is one store operation, which the store runs as one statement on one scoped
/// connection. Nothing is retried.
#[derive(Clone)]
pub struct MutationExecutor {
    store: Arc<dyn InvoiceStore>,
    today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl MutationExecutor {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        Self { store, today: utc_today }
    }

    /// Override the date source used for new invoices.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[instrument(skip_all, fields(kind = %mutation.kind()))]
    pub async fn execute(&self, mutation: Mutation<'_>) -> Result<RowsAffected, FatalError> {
        let kind = mutation.kind();

        let result = match mutation {
            Mutation::Insert(invoice) => {
                let request = InvoiceCreateDBRequest {
                    customer_id: invoice.customer_id().to_string(),
                    amount_in_cents: invoice.amount_in_cents(),
                    status: invoice.status().as_str().to_string(),
                    date: (self.today)(),
                };
                self.store.insert(&request).await.map(|created| {
                    info!(invoice_id = %abbrev_uuid(&created.id), "Invoice created");
                    1
                })
            }
            Mutation::Update { id, invoice } => {
                let request = InvoiceUpdateDBRequest {
                    customer_id: invoice.customer_id().to_string(),
                    amount_in_cents: invoice.amount_in_cents(),
                    status: invoice.status().as_str().to_string(),
                };
                self.store.update(id, &request).await
            }
            Mutation::Delete { id } => self.store.delete(id).await,
        };

        match result {
            Ok(0) => {
                debug!("No invoice matched, nothing changed");
                Ok(RowsAffected(0))
            }
            Ok(rows) => Ok(RowsAffected(rows)),
            Err(e) => {
                error!("Database error while trying to {} invoice: {:#}", kind.verb(), e);
                Err(FatalError::new(kind))
            }
        }
    }
}
