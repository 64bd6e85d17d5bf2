//! Client error handling

use thiserror::Error;

use core_kernel::{MoneyError, PortError, TemporalError};
use domain_fees::{EnrollmentError, FeeError};

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Invalid setting: {0}")]
    Money(#[from] MoneyError),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),
}
