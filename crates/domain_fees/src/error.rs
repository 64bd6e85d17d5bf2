//! Fee domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{MoneyError, PortError};

use crate::fee_plan::PaymentOption;

/// Errors raised by the fee engine
///
/// Every variant is a rejection: the snapshot the operation was called on is
/// left unchanged and nothing is sent to the backend.
#[derive(Debug, Error, PartialEq)]
pub enum FeeError {
    /// The first installment may not exceed the total fees
    #[error("First installment {first} exceeds total fees {total}")]
    FirstInstallmentExceedsTotal {
        first: Decimal,
        total: Decimal,
    },

    /// Fee amounts are never negative
    #[error("Amount must not be negative: {0}")]
    NegativeAmount(Decimal),

    /// Total fees were never entered
    #[error("Total fees are required")]
    MissingTotalFees,

    /// An installment plan is missing a required field
    #[error("Installment plan is missing {field}")]
    MissingInstallmentData {
        field: &'static str,
    },

    /// Installment amounts no longer add up to the total fees
    #[error("Installments add up to {scheduled} but total fees are {total}")]
    UnbalancedInstallments {
        scheduled: Decimal,
        total: Decimal,
    },

    /// No payment option was chosen
    #[error("A payment option is required")]
    MissingPaymentOption,

    /// The edit only applies to a different payment option
    #[error("Operation requires payment option {expected}")]
    WrongPaymentOption {
        expected: PaymentOption,
    },

    /// Student identity fields failed validation
    #[error("Invalid student details: {0}")]
    InvalidIdentity(String),

    /// Currency arithmetic failed
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Errors from enrollment workflows that reach the backend
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// Rejected locally before any request was made
    #[error("Rejected: {0}")]
    Rejected(#[from] FeeError),

    /// The backend collaborator failed
    #[error("Backend error: {0}")]
    Backend(#[from] PortError),
}

impl EnrollmentError {
    /// Returns true if the request never left the process
    pub fn is_local_rejection(&self) -> bool {
        matches!(self, EnrollmentError::Rejected(_))
    }
}
