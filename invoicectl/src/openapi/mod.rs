//! OpenAPI documentation for the invoice API, served at `/openapi.json`.
//!
//! Handlers are documented under the default collection path; [`ApiDoc::for_collection_path`]
//! moves them to wherever `invoices.collection_path` mounts them.

use utoipa::OpenApi;

use crate::api;
use crate::config::DEFAULT_COLLECTION_PATH;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "invoicectl",
        description = "Validated create, update and delete of invoices. Mutations take \
`application/x-www-form-urlencoded` bodies and answer with a redirect, field errors, or a \
generic failure message."
    ),
    paths(
        api::handlers::invoices::list_invoices,
        api::handlers::invoices::create_invoice,
        api::handlers::invoices::get_invoice,
        api::handlers::invoices::update_invoice,
        api::handlers::invoices::delete_invoice,
    ),
    components(
        schemas(
            api::models::invoices::InvoiceResponse,
            crate::invoices::FormState,
            crate::invoices::InvoiceDraft,
            crate::invoices::ValidationErrorSet,
            crate::types::InvoiceStatus,
        )
    ),
    tags(
        (name = "invoices", description = "Invoice form actions and views"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The document with invoice paths rooted at `collection_path`.
    pub fn for_collection_path(collection_path: &str) -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        let paths = std::mem::take(&mut doc.paths.paths);
        doc.paths.paths = paths
            .into_iter()
            .map(|(path, item)| match path.strip_prefix(DEFAULT_COLLECTION_PATH) {
                Some(rest) => (format!("{collection_path}{rest}"), item),
                None => (path, item),
            })
            .collect();
        doc
    }
}
