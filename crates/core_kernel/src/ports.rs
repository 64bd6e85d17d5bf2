//! Ports and Adapters Infrastructure
//!
//! The fee engine never talks to the backend directly. Each domain defines a
//! port trait (for example `EnrollmentPort`) that extends the marker trait
//! here, and adapters implement it: the REST adapter in `interface_client`,
//! or an in-memory double in tests.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │   EnrollmentService (domain) │
//! └──────────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────┐
//! │  EnrollmentPort: DomainPort  │
//! └──────────────────────────────┘
//!         ▲                 ▲
//!  ┌──────┴───────┐  ┌──────┴──────┐
//!  │ HTTP adapter │  │ test double │
//!  └──────────────┘  └─────────────┘
//! ```
//!
//! All port failures are reported as `PortError`. The engine treats them as
//! opaque: it neither interprets nor retries them.

use std::fmt;
use thiserror::Error;

/// Wait suggested for a rate-limited request when the backend names none
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The backend rejected the request as invalid
    #[error("Validation error: {message}")]
    Validation {
        message: String,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the backend failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// Authentication or authorization failed
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        retry_after_secs: u64,
    },

    /// The backend is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// The response could not be mapped to domain types
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Maps a non-success HTTP status from the backend to a port error
    ///
    /// - 400/422 -> `Validation`
    /// - 401/403 -> `Unauthorized`
    /// - 404 -> `NotFound`
    /// - 409 -> `Conflict`
    /// - 429 -> `RateLimited`
    /// - 5xx -> `ServiceUnavailable`
    /// - Other -> `Internal`
    pub fn from_status(status: u16, resource: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 422 => PortError::validation(message),
            401 | 403 => PortError::Unauthorized { message },
            404 => PortError::not_found(resource, message),
            409 => PortError::Conflict { message },
            429 => PortError::RateLimited {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
            },
            500..=599 => PortError::ServiceUnavailable {
                service: format!("{} ({}): {}", resource, status, message),
            },
            _ => PortError::internal(format!("unexpected status {} for {}: {}", status, resource, message)),
        }
    }

    /// Replaces the wait on a `RateLimited` error; other errors pass through
    pub fn with_retry_after(self, retry_after_secs: Option<u64>) -> Self {
        match (self, retry_after_secs) {
            (PortError::RateLimited { .. }, Some(retry_after_secs)) => PortError::RateLimited { retry_after_secs },
            (other, _) => other,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::RateLimited { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if the session is missing, expired or lacks the role
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PortError::Unauthorized { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so adapters are thread-safe and can
/// be shared behind an `Arc` in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("admission", "123");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("admission"));
        assert!(error.to_string().contains("123"));
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "list_courses".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());

        let validation = PortError::validation("Invalid email");
        assert!(!validation.is_transient());
    }

    #[test]
    fn test_status_mapping() {
        assert!(PortError::from_status(401, "courses", "expired").is_unauthorized());
        assert!(PortError::from_status(404, "admission", "42").is_not_found());
        assert!(matches!(PortError::from_status(422, "enroll", "bad"), PortError::Validation { .. }));
        assert!(PortError::from_status(503, "enroll", "down").is_transient());
        assert!(matches!(PortError::from_status(418, "enroll", "teapot"), PortError::Internal { .. }));
    }

    #[test]
    fn test_retry_after_applies_to_rate_limits_only() {
        let limited = PortError::from_status(429, "courses", "slow down");
        assert!(matches!(
            limited,
            PortError::RateLimited {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS
            }
        ));
        assert!(matches!(
            limited.with_retry_after(Some(7)),
            PortError::RateLimited { retry_after_secs: 7 }
        ));
        assert!(matches!(
            PortError::from_status(429, "courses", "").with_retry_after(None),
            PortError::RateLimited {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS
            }
        ));
        assert!(PortError::from_status(404, "admission", "1")
            .with_retry_after(Some(7))
            .is_not_found());
    }
}
