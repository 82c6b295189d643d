//! Turning mutation outcomes into caller actions.
//!
//! The reporter owns the two side effects a successful mutation has outside the database:
//! invalidating the cached invoice collection view and sending the caller back to it.
//! Both are injected as collaborators ([`Revalidator`], [`Navigator`]) so the pipeline does
//! not depend on how the view is cached or how navigation is expressed.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::invoices::executor::FatalError;
use crate::invoices::validation::ValidationErrorSet;
use crate::types::MutationKind;

/// Result of one pass through the mutation pipeline.
#[derive(Debug)]
pub enum MutationOutcome {
    Success,
    FieldError { errors: ValidationErrorSet, message: String },
    FatalError(FatalError),
}

/// What the form should show after a rejected submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FormState {
    #[serde(skip_serializing_if = "ValidationErrorSet::is_empty")]
    pub errors: ValidationErrorSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerAction {
    /// Show the form again with these errors. Nothing was written.
    Redisplay(FormState),
    /// Navigate to this path.
    Redirect(String),
    /// Stay where you are; the current view has been invalidated.
    Refresh,
}

/// Marks a cached view as stale.
#[async_trait]
pub trait Revalidator: Send + Sync {
    async fn revalidate_path(&self, path: &str);
}

/// Expresses "go to this path" in the caller's terms.
pub trait Navigator: Send + Sync {
    fn redirect_to(&self, path: &str) -> CallerAction;
}

/// Navigation as a plain redirect to the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectNavigator;

impl Navigator for RedirectNavigator {
    fn redirect_to(&self, path: &str) -> CallerAction {
        CallerAction::Redirect(path.to_string())
    }
}

#[derive(Clone)]
pub struct OutcomeReporter {
    revalidator: Arc<dyn Revalidator>,
    navigator: Arc<dyn Navigator>,
    collection_path: String,
}

impl OutcomeReporter {
    pub fn new(revalidator: Arc<dyn Revalidator>, navigator: Arc<dyn Navigator>, collection_path: impl Into<String>) -> Self {
        Self {
            revalidator,
            navigator,
            collection_path: collection_path.into(),
        }
    }

    /// Field errors come back as [`CallerAction::Redisplay`] with no side effects. Success
    /// invalidates the collection view first, then navigates to it unless the mutation was a
    /// delete. Fatal errors are returned as-is.
    #[instrument(skip_all, fields(kind = %kind))]
    pub async fn report(&self, kind: MutationKind, outcome: MutationOutcome) -> Result<CallerAction, FatalError> {
        match outcome {
            MutationOutcome::FieldError { errors, message } => Ok(CallerAction::Redisplay(FormState {
                errors,
                message: Some(message),
            })),
            MutationOutcome::Success => {
                self.revalidator.revalidate_path(&self.collection_path).await;
                debug!(path = %self.collection_path, "Invalidated invoice collection view");

                if kind.navigates_on_success() {
                    Ok(self.navigator.redirect_to(&self.collection_path))
                } else {
                    Ok(CallerAction::Refresh)
                }
            }
            MutationOutcome::FatalError(e) => Err(e),
        }
    }
}
