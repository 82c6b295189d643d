//! HTTP request handlers for all API endpoints.
//!
//! - [`invoices`]: invoice form actions (create, update, delete) and read endpoints
//!
//! Handlers stay thin: they extract the request, hand it to the invoice pipeline or the
//! store, and let [`crate::errors::Error`] and [`crate::invoices::CallerAction`] decide the
//! response.

pub mod invoices;
