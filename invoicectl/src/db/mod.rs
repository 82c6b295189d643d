//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Executor   │  (invoices::executor - one mutation per request)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │    Store    │  (db::store - scoped connection per call)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations over a borrowed connection
//! - [`models`]: Database record structures matching table schemas
//! - [`store`]: The [`store::InvoiceStore`] seam with Postgres and in-memory backends
//! - [`errors`]: Database-specific error types
//!
//! # Scoped connections
//!
//! The Postgres store acquires a pooled connection per call and hands it to a repository:
//!
//! ```ignore
//! let mut conn = pool.acquire().await?;
//! let rows = Invoices::new(&mut conn).delete(id).await?;
//! // `conn` goes back to the pool when dropped, on success and on error alike
//! ```
//!
//! # Migrations
//!
//! Database migrations are managed by SQLx and located in the `migrations/` directory.
//! The [`crate::migrator`] function provides access to the migrator.

pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
