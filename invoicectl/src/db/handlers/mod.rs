//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a borrowed SQLx connection (`&mut PgConnection`)
//! - Provides strongly-typed operations on one table
//! - Handles query construction and parameter binding
//! - Returns models from [`crate::db::models`]
//!
//! Repositories never acquire connections themselves. The caller owns the connection and
//! decides its scope; see [`crate::db::store`] for how the mutation pipeline does this.

pub mod invoices;

pub use invoices::Invoices;
