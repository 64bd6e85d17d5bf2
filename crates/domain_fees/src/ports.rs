//! Fee Domain Ports
//!
//! The fee engine reads courses and admission records from the backend and
//! posts enrollments to it. `EnrollmentPort` is the only way it does so; the
//! REST adapter lives in `interface_client`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_fees::ports::EnrollmentPort;
//! use std::sync::Arc;
//!
//! pub struct InvoiceView {
//!     port: Arc<dyn EnrollmentPort>,
//! }
//!
//! impl InvoiceView {
//!     pub async fn record(&self, id: &AdmissionId) -> Result<EnrollmentRecord, PortError> {
//!         self.port.get_admission(id).await
//!     }
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{AdmissionId, CourseId, DomainPort, PortError};

use crate::course::SelectedCourse;
use crate::record::EnrollmentRecord;
use crate::submission::EnrollmentSubmission;

/// Port for the enrollment backend
///
/// Failures are returned as `PortError` and are never retried by the engine.
#[async_trait]
pub trait EnrollmentPort: DomainPort {
    /// Lists the courses offered for selection
    async fn list_courses(&self) -> Result<Vec<SelectedCourse>, PortError>;

    /// Retrieves an admission record by ID
    ///
    /// # Returns
    ///
    /// The record if found, or `PortError::NotFound`
    async fn get_admission(&self, id: &AdmissionId) -> Result<EnrollmentRecord, PortError>;

    /// Posts a validated enrollment to the endpoint chosen by its target
    ///
    /// # Returns
    ///
    /// The record the backend created
    async fn submit_enrollment(&self, submission: &EnrollmentSubmission) -> Result<EnrollmentRecord, PortError>;
}

/// Extension trait for EnrollmentPort with convenience methods
#[async_trait]
pub trait EnrollmentPortExt: EnrollmentPort {
    /// Finds one course in the catalogue, or returns NotFound
    async fn get_course(&self, id: &CourseId) -> Result<SelectedCourse, PortError> {
        self.list_courses()
            .await?
            .into_iter()
            .find(|course| &course.id == id)
            .ok_or_else(|| PortError::not_found("course", id))
    }
}

impl<T: EnrollmentPort + ?Sized> EnrollmentPortExt for T {}
