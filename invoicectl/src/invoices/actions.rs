//! The create/update/delete pipelines.
//!
//! Each action walks the same states: validate the draft, stop with field errors if it is
//! invalid, otherwise run exactly one mutation and report the outcome. Every failure ends
//! the request; nothing is retried.

use tracing::{instrument, warn};

use crate::config::UpdateValidation;
use crate::errors::{Error, Result};
use crate::invoices::executor::{Mutation, MutationExecutor};
use crate::invoices::outcome::{CallerAction, MutationOutcome, OutcomeReporter};
use crate::invoices::validation::{InvoiceDraft, validate};
use crate::types::{InvoiceId, MutationKind};

pub const CREATE_FIELD_ERRORS_MESSAGE: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_FIELD_ERRORS_MESSAGE: &str = "Missing Fields. Failed to Update Invoice.";
pub const UPDATE_REJECTED_MESSAGE: &str = "Invalid Fields. Failed to Update Invoice.";

#[derive(Clone)]
pub struct InvoiceActions {
    executor: MutationExecutor,
    reporter: OutcomeReporter,
    update_validation: UpdateValidation,
}

impl InvoiceActions {
    pub fn new(executor: MutationExecutor, reporter: OutcomeReporter, update_validation: UpdateValidation) -> Self {
        Self {
            executor,
            reporter,
            update_validation,
        }
    }

    #[instrument(skip_all)]
    pub async fn create_invoice(&self, draft: &InvoiceDraft) -> Result<CallerAction> {
        let outcome = match validate(MutationKind::Create, draft) {
            Ok(invoice) => self.run(Mutation::Insert(&invoice)).await,
            Err(errors) => MutationOutcome::FieldError {
                errors,
                message: CREATE_FIELD_ERRORS_MESSAGE.to_string(),
            },
        };

        Ok(self.reporter.report(MutationKind::Create, outcome).await?)
    }

    #[instrument(skip(self, draft))]
    pub async fn update_invoice(&self, id: InvoiceId, draft: &InvoiceDraft) -> Result<CallerAction> {
        let outcome = match validate(MutationKind::Update, draft) {
            Ok(invoice) => self.run(Mutation::Update { id, invoice: &invoice }).await,
            Err(errors) => match self.update_validation {
                UpdateValidation::Reject => {
                    warn!(fields = ?errors.fields().collect::<Vec<_>>(), "Rejecting invalid invoice update");
                    return Err(Error::BadRequest {
                        message: UPDATE_REJECTED_MESSAGE.to_string(),
                    });
                }
                UpdateValidation::FieldErrors => MutationOutcome::FieldError {
                    errors,
                    message: UPDATE_FIELD_ERRORS_MESSAGE.to_string(),
                },
            },
        };

        Ok(self.reporter.report(MutationKind::Update, outcome).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete_invoice(&self, id: InvoiceId) -> Result<CallerAction> {
        let outcome = self.run(Mutation::Delete { id }).await;
        Ok(self.reporter.report(MutationKind::Delete, outcome).await?)
    }

    async fn run(&self, mutation: Mutation<'_>) -> MutationOutcome {
        match self.executor.execute(mutation).await {
            Ok(_) => MutationOutcome::Success,
            Err(e) => MutationOutcome::FatalError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::{InMemoryInvoiceStore, InvoiceStore};
    use crate::invoices::outcome::RedirectNavigator;
    use crate::invoices::validation::{AMOUNT_FIELD, AMOUNT_MESSAGE, STATUS_FIELD, STATUS_MESSAGE};
    use crate::test_utils::{FailingInvoiceStore, RecordingRevalidator};
    use chrono::Utc;
    use std::sync::Arc;
    use uuid::Uuid;

    fn actions(store: Arc<dyn InvoiceStore>, revalidator: &RecordingRevalidator, policy: UpdateValidation) -> InvoiceActions {
        InvoiceActions::new(
            MutationExecutor::new(store),
            OutcomeReporter::new(Arc::new(revalidator.clone()), Arc::new(RedirectNavigator), "/dashboard/invoices"),
            policy,
        )
    }

    fn draft(customer_id: &str, amount: &str, status: &str) -> InvoiceDraft {
        InvoiceDraft::new()
            .with("customerId", customer_id)
            .with("amount", amount)
            .with("status", status)
    }

    #[test_log::test(tokio::test)]
    async fn test_create_round_trip() {
        let store = InMemoryInvoiceStore::new();
        let revalidator = RecordingRevalidator::default();
        let actions = actions(Arc::new(store.clone()), &revalidator, UpdateValidation::Reject);

        let action = actions.create_invoice(&draft("c1", "49.99", "pending")).await.unwrap();
        assert_eq!(action, CallerAction::Redirect("/dashboard/invoices".to_string()));

        let stored = store.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].customer_id, "c1");
        assert_eq!(stored[0].amount, 4999);
        assert_eq!(stored[0].status, "pending");
        assert_eq!(stored[0].date, Utc::now().date_naive());
        assert_eq!(revalidator.paths(), vec!["/dashboard/invoices".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_create_writes_nothing() {
        let store = InMemoryInvoiceStore::new();
        let revalidator = RecordingRevalidator::default();
        let actions = actions(Arc::new(store.clone()), &revalidator, UpdateValidation::Reject);

        let action = actions.create_invoice(&draft("c1", "-5", "overdue")).await.unwrap();

        let CallerAction::Redisplay(state) = action else {
            panic!("expected field errors, got {action:?}");
        };
        assert_eq!(state.message.as_deref(), Some(CREATE_FIELD_ERRORS_MESSAGE));
        assert_eq!(state.errors.field(AMOUNT_FIELD).unwrap(), [AMOUNT_MESSAGE.to_string()]);
        assert_eq!(state.errors.field(STATUS_FIELD).unwrap(), [STATUS_MESSAGE.to_string()]);
        assert!(store.is_empty());
        assert!(revalidator.paths().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_update_is_rejected_by_default() {
        let store = InMemoryInvoiceStore::new();
        let revalidator = RecordingRevalidator::default();
        let actions = actions(Arc::new(store.clone()), &revalidator, UpdateValidation::Reject);

        actions.create_invoice(&draft("c1", "10", "pending")).await.unwrap();
        let id = store.list().await.unwrap()[0].id;

        let err = actions.update_invoice(id, &draft("c1", "0", "pending")).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest { ref message } if message == UPDATE_REJECTED_MESSAGE));
        assert_eq!(store.get(id).await.unwrap().unwrap().amount, 1000);
    }

    #[tokio::test]
    async fn test_invalid_update_can_report_field_errors() {
        let store = InMemoryInvoiceStore::new();
        let revalidator = RecordingRevalidator::default();
        let actions = actions(Arc::new(store.clone()), &revalidator, UpdateValidation::FieldErrors);

        let action = actions
            .update_invoice(Uuid::new_v4(), &draft("c1", "10", "overdue"))
            .await
            .unwrap();

        let CallerAction::Redisplay(state) = action else {
            panic!("expected field errors, got {action:?}");
        };
        assert_eq!(state.message.as_deref(), Some(UPDATE_FIELD_ERRORS_MESSAGE));
        assert_eq!(state.errors.fields().collect::<Vec<_>>(), vec![STATUS_FIELD]);
    }

    #[tokio::test]
    async fn test_update_and_delete_of_missing_invoice_succeed() {
        let store = InMemoryInvoiceStore::new();
        let revalidator = RecordingRevalidator::default();
        let actions = actions(Arc::new(store.clone()), &revalidator, UpdateValidation::Reject);

        let updated = actions
            .update_invoice(Uuid::new_v4(), &draft("c1", "10", "paid"))
            .await
            .unwrap();
        let deleted = actions.delete_invoice(Uuid::new_v4()).await.unwrap();

        assert_eq!(updated, CallerAction::Redirect("/dashboard/invoices".to_string()));
        assert_eq!(deleted, CallerAction::Refresh);
        assert_eq!(revalidator.paths().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_invoice_without_navigation() {
        let store = InMemoryInvoiceStore::new();
        let revalidator = RecordingRevalidator::default();
        let actions = actions(Arc::new(store.clone()), &revalidator, UpdateValidation::Reject);

        actions.create_invoice(&draft("c1", "10", "paid")).await.unwrap();
        actions.create_invoice(&draft("c2", "20", "paid")).await.unwrap();
        let target = store.list().await.unwrap()[0].id;

        let action = actions.delete_invoice(target).await.unwrap();

        assert_eq!(action, CallerAction::Refresh);
        assert_eq!(store.len(), 1);
        assert!(store.get(target).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_generic_error() {
        let revalidator = RecordingRevalidator::default();
        let actions = actions(Arc::new(FailingInvoiceStore), &revalidator, UpdateValidation::Reject);

        let err = actions.create_invoice(&draft("c1", "10", "paid")).await.unwrap_err();

        assert_eq!(err.user_message(), "Failed to create invoice.");
        assert!(revalidator.paths().is_empty());
    }
}
