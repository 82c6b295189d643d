//! HTTP handlers for the invoice form actions and read endpoints.
//!
//! Form bodies are taken as a raw [`InvoiceDraft`]; all checking happens in the pipeline.
//! [`CallerAction`]s map onto responses as follows:
//!
//! - `Redirect(path)` → `303 See Other` with `Location: path`
//! - `Redisplay(form)` → `422 Unprocessable Entity` with the form state as JSON
//! - `Refresh` → `204 No Content`

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

use crate::{
    AppState,
    api::models::invoices::InvoiceResponse,
    errors::{Error, Result},
    invoices::{CallerAction, FormState, InvoiceDraft},
    types::InvoiceId,
};

impl IntoResponse for CallerAction {
    fn into_response(self) -> Response {
        match self {
            CallerAction::Redirect(path) => Redirect::to(&path).into_response(),
            CallerAction::Redisplay(form) => (StatusCode::UNPROCESSABLE_ENTITY, Json(form)).into_response(),
            CallerAction::Refresh => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/dashboard/invoices",
    tag = "invoices",
    summary = "List invoices",
    description = "The invoice collection view, newest first. Served from cache until a mutation invalidates it.",
    responses(
        (status = 200, description = "All invoices", body = [InvoiceResponse]),
        (status = 500, description = "The collection could not be loaded"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_invoices(State(state): State<AppState>) -> Result<Json<Vec<InvoiceResponse>>> {
    let invoices = state
        .views
        .collection(&state.config.invoices.collection_path)
        .await
        .map_err(|e| {
            error!("Failed to load invoice collection: {:#}", e);
            Error::Internal {
                operation: "load invoice collection".to_string(),
            }
        })?;

    Ok(Json(invoices.iter().cloned().map(InvoiceResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/dashboard/invoices",
    tag = "invoices",
    summary = "Create invoice",
    description = "Validate the submitted form and insert a new invoice dated today.",
    request_body(content = InvoiceDraft, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Invoice created; redirect to the collection view"),
        (status = 422, description = "One or more fields are invalid", body = FormState),
        (status = 500, description = "Failed to create invoice."),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_invoice(State(state): State<AppState>, Form(draft): Form<InvoiceDraft>) -> Result<CallerAction> {
    state.actions.create_invoice(&draft).await
}

#[utoipa::path(
    get,
    path = "/dashboard/invoices/{id}",
    tag = "invoices",
    summary = "Get invoice",
    params(
        ("id" = uuid::Uuid, Path, description = "Invoice ID"),
    ),
    responses(
        (status = 200, description = "The invoice", body = InvoiceResponse),
        (status = 400, description = "Malformed invoice ID"),
        (status = 404, description = "No invoice with this ID"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_invoice(State(state): State<AppState>, Path(id): Path<InvoiceId>) -> Result<Json<InvoiceResponse>> {
    match state.store.get(id).await? {
        Some(invoice) => Ok(Json(invoice.into())),
        None => Err(Error::NotFound {
            resource: "Invoice".to_string(),
            id: id.to_string(),
        }),
    }
}

#[utoipa::path(
    put,
    path = "/dashboard/invoices/{id}",
    tag = "invoices",
    summary = "Update invoice",
    description = "Validate the submitted form and overwrite the invoice's customer, amount and status. \
The invoice date is never changed. Updating an ID that does not exist succeeds without effect.",
    params(
        ("id" = uuid::Uuid, Path, description = "Invoice ID"),
    ),
    request_body(content = InvoiceDraft, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Invoice updated; redirect to the collection view"),
        (status = 400, description = "Invalid Fields. Failed to Update Invoice."),
        (status = 422, description = "One or more fields are invalid (with `update_validation: field_errors`)", body = FormState),
        (status = 500, description = "Failed to update invoice."),
    )
)]
#[tracing::instrument(skip(state, draft))]
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<InvoiceId>,
    Form(draft): Form<InvoiceDraft>,
) -> Result<CallerAction> {
    state.actions.update_invoice(id, &draft).await
}

#[utoipa::path(
    delete,
    path = "/dashboard/invoices/{id}",
    tag = "invoices",
    summary = "Delete invoice",
    description = "Delete the invoice. Deleting an ID that does not exist succeeds without effect.",
    params(
        ("id" = uuid::Uuid, Path, description = "Invoice ID"),
    ),
    responses(
        (status = 204, description = "Invoice deleted; the collection view has been invalidated"),
        (status = 500, description = "Failed to delete invoice."),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_invoice(State(state): State<AppState>, Path(id): Path<InvoiceId>) -> Result<CallerAction> {
    state.actions.delete_invoice(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpdateValidation;
    use crate::db::store::InvoiceStore;
    use crate::test_utils::{FailingInvoiceStore, create_test_app, create_test_app_with_store, create_test_config};
    use axum::http::header::LOCATION;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use uuid::Uuid;

    fn form<'a>(customer_id: &'a str, amount: &'a str, status: &'a str) -> [(&'static str, &'a str); 3] {
        [("customerId", customer_id), ("amount", amount), ("status", status)]
    }

    #[test_log::test(tokio::test)]
    async fn test_create_redirects_to_collection() {
        let (app, store) = create_test_app();

        let response = app.post("/dashboard/invoices").form(&form("c1", "10.01", "paid")).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(LOCATION), "/dashboard/invoices");

        let stored = store.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].amount, 1001);
    }

    #[tokio::test]
    async fn test_invalid_create_returns_field_errors() {
        let (app, store) = create_test_app();

        let response = app
            .post("/dashboard/invoices")
            .form(&[("customerId", ""), ("amount", "abc")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        response.assert_json(&json!({
            "errors": {
                "amount": ["Please enter an amount greater than $0."],
                "customerId": ["Please select a customer."],
                "status": ["Please select an invoice status."],
            },
            "message": "Missing Fields. Failed to Create Invoice.",
        }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_collection_view_is_invalidated_by_mutations() {
        let (app, store) = create_test_app();

        let before: Vec<Value> = app.get("/dashboard/invoices").await.json();
        assert!(before.is_empty());

        app.post("/dashboard/invoices")
            .form(&form("c1", "5", "pending"))
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let after: Vec<Value> = app.get("/dashboard/invoices").await.json();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0]["customer_id"], "c1");
        assert_eq!(after[0]["amount"], 500);
        assert_eq!(after[0]["amount_dollars"], "5.00");

        let id = store.list().await.unwrap()[0].id;
        app.delete(&format!("/dashboard/invoices/{id}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let emptied: Vec<Value> = app.get("/dashboard/invoices").await.json();
        assert!(emptied.is_empty());
    }

    #[tokio::test]
    async fn test_update_overwrites_fields_and_keeps_date() {
        let (app, store) = create_test_app();
        app.post("/dashboard/invoices").form(&form("c1", "10", "pending")).await;
        let original = store.list().await.unwrap().remove(0);

        let response = app
            .put(&format!("/dashboard/invoices/{}", original.id))
            .form(&form("c2", "12.345", "paid"))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header(LOCATION), "/dashboard/invoices");

        let updated: InvoiceResponse = app.get(&format!("/dashboard/invoices/{}", original.id)).await.json();
        assert_eq!(updated.customer_id, "c2");
        assert_eq!(updated.amount, 1235);
        assert_eq!(updated.status, "paid");
        assert_eq!(updated.date, original.date);
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected() {
        let (app, store) = create_test_app();
        app.post("/dashboard/invoices").form(&form("c1", "10", "pending")).await;
        let id = store.list().await.unwrap()[0].id;

        let response = app
            .put(&format!("/dashboard/invoices/{id}"))
            .form(&form("c1", "0", "pending"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "Invalid Fields. Failed to Update Invoice.");
        assert_eq!(store.get(id).await.unwrap().unwrap().amount, 1000);
    }

    #[tokio::test]
    async fn test_invalid_update_with_field_errors_policy() {
        let mut config = create_test_config();
        config.invoices.update_validation = UpdateValidation::FieldErrors;
        let app = create_test_app_with_store(config, Arc::new(crate::db::store::InMemoryInvoiceStore::new()));

        let response = app
            .put(&format!("/dashboard/invoices/{}", Uuid::new_v4()))
            .form(&form("c1", "10", "unpaid"))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing Fields. Failed to Update Invoice.");
        assert_eq!(body["errors"]["status"][0], "Please select an invoice status.");
    }

    #[tokio::test]
    async fn test_missing_invoice() {
        let (app, _store) = create_test_app();
        let id = Uuid::new_v4();

        app.get(&format!("/dashboard/invoices/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // Mutating a missing ID is not an error
        app.delete(&format!("/dashboard/invoices/{id}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.put(&format!("/dashboard/invoices/{id}"))
            .form(&form("c1", "1", "paid"))
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected_before_the_pipeline() {
        let (app, _store) = create_test_app();

        app.delete("/dashboard/invoices/not-a-uuid")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_storage_failures_return_generic_messages() {
        let app = create_test_app_with_store(create_test_config(), Arc::new(FailingInvoiceStore));
        let id = Uuid::new_v4();

        let response = app.post("/dashboard/invoices").form(&form("c1", "10", "paid")).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "Failed to create invoice.");

        let response = app
            .put(&format!("/dashboard/invoices/{id}"))
            .form(&form("c1", "10", "paid"))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "Failed to update invoice.");

        let response = app.delete(&format!("/dashboard/invoices/{id}")).await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "Failed to delete invoice.");

        let response = app.get("/dashboard/invoices").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "Internal server error");
    }
}
