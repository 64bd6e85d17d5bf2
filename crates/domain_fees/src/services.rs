//! Enrollment services
//!
//! `EnrollmentService` ties the pure fee engine to the backend port. Every
//! check the engine can make runs before the port is called, so a rejected
//! plan never produces a request.

use std::sync::Arc;

use core_kernel::{AdmissionId, CourseId, Currency};

use crate::course::SelectedCourse;
use crate::error::EnrollmentError;
use crate::fee_plan::FeePlan;
use crate::invoice::{Invoice, InvoiceProjector};
use crate::ports::EnrollmentPort;
use crate::record::EnrollmentRecord;
use crate::submission::{EnrollmentSubmission, EnrollmentTarget, StudentIdentity};

/// Service for enrolling students and viewing their invoices
pub struct EnrollmentService {
    port: Arc<dyn EnrollmentPort>,
}

impl EnrollmentService {
    pub fn new(port: Arc<dyn EnrollmentPort>) -> Self {
        Self { port }
    }

    /// Validates a fee plan and submits it
    ///
    /// # Errors
    ///
    /// * `EnrollmentError::Rejected` if the plan fails a local check; the
    ///   port is not called
    /// * `EnrollmentError::Backend` if the backend call fails
    pub async fn enroll(
        &self,
        identity: StudentIdentity,
        plan: &FeePlan,
        target: EnrollmentTarget,
    ) -> Result<EnrollmentRecord, EnrollmentError> {
        let submission = match EnrollmentSubmission::build(identity, plan, target) {
            Ok(submission) => submission,
            Err(err) => {
                tracing::warn!(error = %err, "enrollment rejected before submission");
                return Err(err.into());
            }
        };

        let record = self.port.submit_enrollment(&submission).await.map_err(|err| {
            tracing::warn!(error = %err, path = %submission.target.path(), "enrollment submission failed");
            err
        })?;

        tracing::info!(
            path = %submission.target.path(),
            total = %submission.payload.total_fees,
            option = %submission.payload.payment_option,
            "enrollment submitted"
        );

        Ok(record)
    }

    /// Loads an admission and projects its invoice
    pub async fn admission_invoice(
        &self,
        id: &AdmissionId,
        projector: &InvoiceProjector,
    ) -> Result<Invoice, EnrollmentError> {
        let record = self.port.get_admission(id).await?;
        Ok(projector.project(&record)?)
    }

    /// Opens a fee plan with the given catalogue courses pre-selected
    ///
    /// Unknown course IDs are skipped.
    pub async fn seed_plan(&self, currency: Currency, course_ids: &[CourseId]) -> Result<FeePlan, EnrollmentError> {
        let catalogue = self.port.list_courses().await?;
        let selected: Vec<&SelectedCourse> = course_ids
            .iter()
            .filter_map(|id| catalogue.iter().find(|course| &course.id == id))
            .collect();

        if selected.len() != course_ids.len() {
            tracing::warn!(
                requested = course_ids.len(),
                found = selected.len(),
                "some courses were not in the catalogue"
            );
        }

        Ok(FeePlan::with_courses(currency, selected)?)
    }
}
