//! Domain Error Types
//!
//! Pure domain errors that don't depend on storage or presentation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Domain-specific errors
///
/// These errors represent business rule violations and domain invariant
/// failures. They are independent of the persistence layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid monetary amount (zero, negative, or malformed)
    #[error(transparent)]
    Amount(#[from] crate::domain::AmountError),

    /// Payment larger than what the installment still owes
    #[error("Payment of {amount} exceeds outstanding balance of {outstanding}")]
    PaymentExceedsOutstanding {
        amount: Decimal,
        outstanding: Decimal,
    },

    /// Update log entries must carry text
    #[error("Update text cannot be blank")]
    BlankUpdateText,

    /// Agreements are created with a fixed, non-empty installment plan
    #[error("Agreement must have at least one installment")]
    EmptyInstallmentPlan,

    /// Agreement value must be positive
    #[error("Agreement value must be positive (got {0})")]
    NonPositiveAgreementValue(Decimal),

    /// Fee percentage is a commission on collected amounts, 0..=100
    #[error("Fee percentage must be between 0 and 100 (got {0})")]
    InvalidFeePercentage(Decimal),

    /// Required field missing on a command
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
