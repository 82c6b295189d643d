//! Request and response data structures for the HTTP API.

pub mod invoices;
