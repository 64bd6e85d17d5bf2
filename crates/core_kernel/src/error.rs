//! Kernel error type

use thiserror::Error;

use crate::money::MoneyError;
use crate::temporal::TemporalError;

/// Failure raised by kernel value types
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error("{entity} id must not be blank")]
    BlankIdentifier { entity: &'static str },

    #[error("Invalid value: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}
