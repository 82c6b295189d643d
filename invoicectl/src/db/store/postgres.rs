//! PostgreSQL-backed invoice store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::InvoiceStore;
use crate::db::errors::Result;
use crate::db::handlers::Invoices;
use crate::db::models::invoices::{InvoiceCreateDBRequest, InvoiceDBResponse, InvoiceUpdateDBRequest};
use crate::types::InvoiceId;

/// Invoice store over a SQLx connection pool.
///
/// Each method acquires one pooled connection, runs one statement through the
/// [`Invoices`] repository and lets the connection drop. A `PoolConnection` returns to
/// the pool on drop, so the connection is released on the success path, on a statement
/// error propagated with `?`, and if the future is cancelled mid-statement.
#[derive(Clone)]
pub struct PostgresInvoiceStore {
    pool: PgPool,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    #[instrument(skip_all, err)]
    async fn insert(&self, request: &InvoiceCreateDBRequest) -> Result<InvoiceDBResponse> {
        let mut conn = self.pool.acquire().await?;
        Invoices::new(&mut conn).create(request).await
    }

    #[instrument(skip(self, request), err)]
    async fn update(&self, id: InvoiceId, request: &InvoiceUpdateDBRequest) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        Invoices::new(&mut conn).update(id, request).await
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: InvoiceId) -> Result<u64> {
        let mut conn = self.pool.acquire().await?;
        Invoices::new(&mut conn).delete(id).await
    }

    #[instrument(skip(self), err)]
    async fn get(&self, id: InvoiceId) -> Result<Option<InvoiceDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Invoices::new(&mut conn).get_by_id(id).await
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<InvoiceDBResponse>> {
        let mut conn = self.pool.acquire().await?;
        Invoices::new(&mut conn).list().await
    }
}
