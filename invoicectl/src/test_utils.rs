//! Test doubles and app builders shared by unit and HTTP tests.

use crate::config::{Config, StoreBackend};
use crate::db::errors::{DbError, Result};
use crate::db::models::invoices::{InvoiceCreateDBRequest, InvoiceDBResponse, InvoiceUpdateDBRequest};
use crate::db::store::{InMemoryInvoiceStore, InvoiceStore};
use crate::invoices::Revalidator;
use crate::types::InvoiceId;
use async_trait::async_trait;
use axum_test::TestServer;
use parking_lot::Mutex;
use std::sync::Arc;

/// A store whose every call fails as if the database were unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingInvoiceStore;

fn unreachable_db() -> DbError {
    DbError::Other(anyhow::anyhow!("error communicating with database: connection refused"))
}

#[async_trait]
impl InvoiceStore for FailingInvoiceStore {
    async fn insert(&self, _request: &InvoiceCreateDBRequest) -> Result<InvoiceDBResponse> {
        Err(unreachable_db())
    }

    async fn update(&self, _id: InvoiceId, _request: &InvoiceUpdateDBRequest) -> Result<u64> {
        Err(unreachable_db())
    }

    async fn delete(&self, _id: InvoiceId) -> Result<u64> {
        Err(unreachable_db())
    }

    async fn get(&self, _id: InvoiceId) -> Result<Option<InvoiceDBResponse>> {
        Err(unreachable_db())
    }

    async fn list(&self) -> Result<Vec<InvoiceDBResponse>> {
        Err(unreachable_db())
    }
}

/// Records every path it is asked to revalidate.
#[derive(Debug, Clone, Default)]
pub struct RecordingRevalidator {
    paths: Arc<Mutex<Vec<String>>>,
}

impl RecordingRevalidator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().clone()
    }
}

#[async_trait]
impl Revalidator for RecordingRevalidator {
    async fn revalidate_path(&self, path: &str) {
        self.paths.lock().push(path.to_string());
    }
}

pub fn create_test_config() -> Config {
    Config {
        store: StoreBackend::Memory,
        ..Default::default()
    }
}

/// Build a test server over `store` with the given config.
pub fn create_test_app_with_store(config: Config, store: Arc<dyn InvoiceStore>) -> TestServer {
    let state = crate::build_state(config, store);
    let router = crate::build_router(state);
    TestServer::new(router).expect("Failed to create test server")
}

/// A test server backed by a fresh in-memory store.
pub fn create_test_app() -> (TestServer, InMemoryInvoiceStore) {
    let store = InMemoryInvoiceStore::new();
    let server = create_test_app_with_store(create_test_config(), Arc::new(store.clone()));
    (server, store)
}
