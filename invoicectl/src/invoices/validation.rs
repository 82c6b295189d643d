//! Schema validation for invoice form submissions.
//!
//! A submission arrives as an [`InvoiceDraft`]: an untyped map of field name to raw string.
//! [`validate`] either produces a [`ValidatedInvoice`] or a [`ValidationErrorSet`] naming
//! every field that failed. There is no partial result.
//!
//! | Field        | Rule                                   | Message                                    |
//! |--------------|----------------------------------------|--------------------------------------------|
//! | `customerId` | present and non-empty                  | `Please select a customer.`                |
//! | `amount`     | plain decimal number, `>= 0.005`       | `Please enter an amount greater than $0.`  |
//! | `status`     | exactly `pending` or `paid`            | `Please select an invoice status.`         |
//!
//! `id` and `date` are never read from the draft: the ID comes from the route and the date
//! is assigned when the invoice is inserted.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::types::{CustomerId, InvoiceStatus, MutationKind};

pub const CUSTOMER_ID_FIELD: &str = "customerId";
pub const AMOUNT_FIELD: &str = "amount";
pub const STATUS_FIELD: &str = "status";

pub const CUSTOMER_ID_MESSAGE: &str = "Please select a customer.";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const STATUS_MESSAGE: &str = "Please select an invoice status.";

/// Raw, untrusted form fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct InvoiceDraft(HashMap<String, String>);

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InvoiceDraft {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Field-level validation failures, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrorSet(BTreeMap<String, Vec<String>>);

impl ValidationErrorSet {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field, in the order they were recorded.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// An invoice submission that passed validation.
///
/// Fields are private: the only way to obtain one is [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvoice {
    customer_id: CustomerId,
    amount: Decimal,
    amount_in_cents: i64,
    status: InvoiceStatus,
}

impl ValidatedInvoice {
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// The amount in dollars, as submitted.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// `round(amount * 100)`, half away from zero, computed in decimal arithmetic.
    pub fn amount_in_cents(&self) -> i64 {
        self.amount_in_cents
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }
}

/// Validate a create or update submission.
///
/// Both kinds check the same mutable field set. Every failing field is reported.
#[instrument(skip_all, fields(kind = %kind))]
pub fn validate(kind: MutationKind, draft: &InvoiceDraft) -> Result<ValidatedInvoice, ValidationErrorSet> {
    let mut errors = ValidationErrorSet::default();

    let customer_id = match draft.get(CUSTOMER_ID_FIELD) {
        Some(id) if !id.is_empty() => Some(id.to_string()),
        _ => {
            errors.add(CUSTOMER_ID_FIELD, CUSTOMER_ID_MESSAGE);
            None
        }
    };

    let amount = match parse_amount(draft.get(AMOUNT_FIELD)) {
        Some(amount) => Some(amount),
        None => {
            errors.add(AMOUNT_FIELD, AMOUNT_MESSAGE);
            None
        }
    };

    let status = match draft.get(STATUS_FIELD).and_then(InvoiceStatus::parse) {
        Some(status) => Some(status),
        None => {
            errors.add(STATUS_FIELD, STATUS_MESSAGE);
            None
        }
    };

    match (customer_id, amount, status) {
        (Some(customer_id), Some((amount, amount_in_cents)), Some(status)) => Ok(ValidatedInvoice {
            customer_id,
            amount,
            amount_in_cents,
            status,
        }),
        _ => {
            debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Invoice submission failed validation");
            Err(errors)
        }
    }
}

/// Coerce the raw amount to a positive decimal and its whole-cent value.
///
/// Accepts plain (`49.99`) and scientific (`4.999e1`) notation with surrounding whitespace.
/// Anything that does not parse, is not strictly positive, rounds to zero cents, or whose
/// cent value does not fit in an `i64` is rejected.
fn parse_amount(raw: Option<&str>) -> Option<(Decimal, i64)> {
    let raw = raw?.trim();
    if raw.is_empty() || !raw.chars().all(is_number_char) {
        return None;
    }

    let amount = Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)).ok()?;
    if amount <= Decimal::ZERO {
        return None;
    }

    let cents = amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .filter(|cents| *cents > 0)?;
    Some((amount, cents))
}

// `Decimal::from_str` also takes `_` separators, which a plain number never contains.
fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
}
