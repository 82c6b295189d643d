//! Database repository for invoices.

use crate::{
    db::{
        errors::Result,
        models::invoices::{Invoice, InvoiceCreateDBRequest, InvoiceDBResponse, InvoiceUpdateDBRequest},
    },
    types::InvoiceId,
};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Invoices<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Invoices<'c> {
    /// Create a new Invoices repository instance
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Insert a new invoice. The identifier is generated by the database.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, amount = request.amount_in_cents), err)]
    pub async fn create(&mut self, request: &InvoiceCreateDBRequest) -> Result<InvoiceDBResponse> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, customer_id, amount, status, date
            "#,
        )
        .bind(&request.customer_id)
        .bind(request.amount_in_cents)
        .bind(&request.status)
        .bind(request.date)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(invoice)
    }

    /// Get an invoice by ID
    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: InvoiceId) -> Result<Option<InvoiceDBResponse>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(invoice)
    }

    /// List every invoice, newest first
    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<InvoiceDBResponse>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            ORDER BY date DESC, id ASC
            "#,
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(invoices)
    }

    /// Overwrite customer, amount and status of an invoice. Returns the number of rows
    /// affected, which is zero when no invoice has this ID.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, amount = request.amount_in_cents), err)]
    pub async fn update(&mut self, id: InvoiceId, request: &InvoiceUpdateDBRequest) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1, amount = $2, status = $3
            WHERE id = $4
            "#,
        )
        .bind(&request.customer_id)
        .bind(request.amount_in_cents)
        .bind(&request.status)
        .bind(id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete an invoice. Returns the number of rows affected.
    #[instrument(skip(self), err)]
    pub async fn delete(&mut self, id: InvoiceId) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected())
    }
}
