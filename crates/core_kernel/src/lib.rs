//! Core Kernel - Foundational types and utilities for the fee desk
//!
//! This crate provides the fundamental building blocks used by the fee
//! engine and the REST client:
//! - Money types with precise decimal arithmetic
//! - Business-day and locale-aware date handling
//! - Opaque backend identifiers
//! - The error type shared by every port adapter

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{Timezone, DateLocale, TemporalError};
pub use identifiers::{CourseId, EnquiryId, AdmissionId};
pub use error::CoreError;
pub use ports::{PortError, DomainPort, DEFAULT_RETRY_AFTER_SECS};
