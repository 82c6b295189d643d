//! # invoicectl: validated invoice mutations over HTTP
//!
//! `invoicectl` serves the create, update and delete actions behind an invoice dashboard.
//! Each action takes an untrusted form submission, checks it against the invoice schema,
//! runs at most one statement against PostgreSQL, and tells the caller what to do next:
//! show the form again with field errors, go back to the invoice list, or stay put.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! uses PostgreSQL for persistence through SQLx. An in-memory store can stand in for the
//! database (`store: memory`), which is what the HTTP tests use.
//!
//! ### Request Flow
//!
//! A form post to `/dashboard/invoices` arrives as a raw field map
//! ([`invoices::InvoiceDraft`]). The schema validator ([`invoices::validation`]) either
//! produces a typed invoice with the amount converted to integer cents, or a set of
//! per-field messages. A valid invoice is handed to the mutation executor
//! ([`invoices::executor`]), which acquires a pooled connection for exactly one statement
//! and collapses any storage failure into a generic, operation-specific error. The outcome
//! reporter ([`invoices::outcome`]) then invalidates the cached invoice list and, for create
//! and update, redirects to it.
//!
//! ### Core Components
//!
//! - [`api`]: route handlers and response models
//! - [`invoices`]: the validate → execute → report pipeline and the cached collection view
//! - [`db`]: the `invoices` table repository, the [`db::store::InvoiceStore`] seam and its
//!   PostgreSQL and in-memory implementations
//! - [`config`]: YAML + environment configuration
//! - [`errors`]: the error type every handler returns
//! - [`telemetry`]: tracing and optional OTLP export
//!
//! ## Getting Started
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/invoices invoicectl -f config.yaml
//! ```
//!
//! Migrations in `migrations/` are applied on startup unless `database.run_migrations` is
//! false.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod invoices;
pub mod openapi;
pub mod telemetry;
#[cfg(test)]
mod test_utils;
pub mod types;

use axum::{Json, Router, routing::get};
use bon::Builder;
pub use config::Config;
use config::StoreBackend;
use db::store::{InMemoryInvoiceStore, InvoiceStore, PostgresInvoiceStore};
use invoices::{InvoiceActions, InvoiceViewCache, MutationExecutor, OutcomeReporter, RedirectNavigator};
use openapi::ApiDoc;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info, instrument};

pub use types::{CustomerId, InvoiceId};

/// Application state shared across all request handlers.
///
/// - `config`: Application configuration loaded from environment/files
/// - `store`: Invoice storage, used directly for single-invoice reads
/// - `views`: The cached invoice collection view
/// - `actions`: The create/update/delete pipelines
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn InvoiceStore>,
    pub views: InvoiceViewCache,
    pub actions: InvoiceActions,
}

/// Get the invoicectl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Wire the invoice pipeline over `store`.
///
/// The collection view cache is the revalidator the outcome reporter invalidates, so the
/// list endpoint and the mutations share one cache.
pub fn build_state(config: Config, store: Arc<dyn InvoiceStore>) -> AppState {
    let invoices = &config.invoices;
    let views = InvoiceViewCache::new(store.clone(), invoices.view_cache_capacity, invoices.view_cache_ttl);

    let reporter = OutcomeReporter::new(Arc::new(views.clone()), Arc::new(RedirectNavigator), invoices.collection_path.clone());
    let actions = InvoiceActions::new(MutationExecutor::new(store.clone()), reporter, invoices.update_validation);

    AppState::builder().config(config).store(store).views(views).actions(actions).build()
}

/// Build the application router with all routes and the tracing layer
pub fn build_router(state: AppState) -> Router {
    use api::handlers::invoices;

    let collection = state.config.invoices.collection_path.clone();
    let item = format!("{collection}/{{id}}");
    let api_doc = ApiDoc::for_collection_path(&collection);

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/openapi.json", get(move || async move { Json(api_doc) }))
        .route(&collection, get(invoices::list_invoices).post(invoices::create_invoice))
        .route(
            &item,
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .with_state(state);

    // Add tracing layer
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// Connect to PostgreSQL and apply migrations if configured.
#[instrument(skip_all)]
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let settings = &config.database.pool;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .max_lifetime(settings.max_lifetime())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("Running database migrations...");
        migrator().run(&pool).await?;
    }

    Ok(pool)
}

/// Main application struct that owns the router and the database pool.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects the configured store and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, stops accepting requests, closes
///    the pool and flushes telemetry
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting invoicectl with configuration: {:#?}", config);

        let (store, pool): (Arc<dyn InvoiceStore>, Option<PgPool>) = match config.store {
            StoreBackend::Postgres => {
                let pool = setup_database(&config).await?;
                (Arc::new(PostgresInvoiceStore::new(pool.clone())), Some(pool))
            }
            StoreBackend::Memory => {
                info!("Using in-memory invoice store; invoices will not survive a restart");
                (Arc::new(InMemoryInvoiceStore::new()), None)
            }
        };

        let router = build_router(build_state(config.clone(), store));

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "invoicectl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
