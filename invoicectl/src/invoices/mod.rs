//! The validated invoice mutation pipeline.
//!
//! ```text
//! InvoiceDraft ──▶ validation ──invalid──▶ FieldError ─────────────┐
//!                     │                                           │
//!                   valid                                         ▼
//!                     │                                   OutcomeReporter ──▶ CallerAction
//!                     ▼                                           ▲
//!              MutationExecutor ──▶ InvoiceStore (one statement) ─┘
//! ```
//!
//! - [`validation`]: draft → [`validation::ValidatedInvoice`] or field errors
//! - [`executor`]: one insert/update/delete on a scoped connection
//! - [`outcome`]: invalidation and navigation after the mutation
//! - [`actions`]: the three pipelines wired together
//! - [`view_cache`]: the cached collection view that invalidation targets

pub mod actions;
pub mod executor;
pub mod outcome;
pub mod validation;
pub mod view_cache;

pub use actions::InvoiceActions;
pub use executor::{FatalError, Mutation, MutationExecutor, RowsAffected};
pub use outcome::{CallerAction, FormState, MutationOutcome, Navigator, OutcomeReporter, RedirectNavigator, Revalidator};
pub use validation::{InvoiceDraft, ValidatedInvoice, ValidationErrorSet, validate};
pub use view_cache::InvoiceViewCache;
