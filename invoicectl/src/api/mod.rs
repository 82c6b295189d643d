//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Response data structures
//!
//! # API Structure
//!
//! - **Health** (`/healthz`): liveness probe
//! - **Invoices** (`/dashboard/invoices`, `/dashboard/invoices/{id}`): the invoice form
//!   actions and the collection view they invalidate
//! - **Docs** (`/openapi.json`): the OpenAPI document, generated with `utoipa`
//!
//! The invoice routes are mounted at `invoices.collection_path`; `/dashboard/invoices` is
//! the default.

pub mod handlers;
pub mod models;
