//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! fee desk test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for courses, records and students
//! - `builders`: Builder patterns for records and fee plans
//! - `assertions`: Custom assertion helpers for money and installments
//! - `generators`: Property-based test data generators
//! - `ports`: In-memory `EnrollmentPort` that counts its calls

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;
pub mod ports;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
pub use ports::*;
