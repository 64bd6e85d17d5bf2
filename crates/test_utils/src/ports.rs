//! In-memory enrollment port
//!
//! Serves a fixed catalogue and admission records, records every submission,
//! and counts calls so tests can assert that rejected plans never reach it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use core_kernel::{AdmissionId, DomainPort, PortError};
use domain_fees::{EnrollmentPort, EnrollmentRecord, EnrollmentSubmission, SelectedCourse};

use crate::fixtures::CourseFixtures;

#[derive(Default)]
pub struct InMemoryEnrollmentPort {
    courses: Vec<SelectedCourse>,
    admissions: HashMap<String, EnrollmentRecord>,
    submissions: Mutex<Vec<EnrollmentSubmission>>,
    failure: Option<fn() -> PortError>,
    calls: AtomicUsize,
}

impl InMemoryEnrollmentPort {
    /// Port serving the fixture catalogue
    pub fn new() -> Self {
        Self {
            courses: CourseFixtures::catalogue(),
            ..Default::default()
        }
    }

    pub fn with_admission(mut self, id: &AdmissionId, record: EnrollmentRecord) -> Self {
        self.admissions.insert(id.as_str().to_string(), record);
        self
    }

    /// Makes every call fail with the error built by `failure`
    pub fn failing_with(mut self, failure: fn() -> PortError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Number of port calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Submissions received so far
    pub fn submissions(&self) -> Vec<EnrollmentSubmission> {
        self.submissions.lock().expect("submissions lock poisoned").clone()
    }

    fn enter(&self) -> Result<(), PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            Some(failure) => Err(failure()),
            None => Ok(()),
        }
    }
}

impl DomainPort for InMemoryEnrollmentPort {}

#[async_trait]
impl EnrollmentPort for InMemoryEnrollmentPort {
    async fn list_courses(&self) -> Result<Vec<SelectedCourse>, PortError> {
        self.enter()?;
        Ok(self.courses.clone())
    }

    async fn get_admission(&self, id: &AdmissionId) -> Result<EnrollmentRecord, PortError> {
        self.enter()?;
        self.admissions
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| PortError::not_found("admission", id))
    }

    async fn submit_enrollment(&self, submission: &EnrollmentSubmission) -> Result<EnrollmentRecord, PortError> {
        self.enter()?;
        let sequence = {
            let mut submissions = self.submissions.lock().expect("submissions lock poisoned");
            submissions.push(submission.clone());
            submissions.len()
        };

        let payload = &submission.payload;
        Ok(EnrollmentRecord {
            id: Some(format!("enr-{}", sequence)),
            full_name: Some(payload.full_name.clone()),
            email: Some(payload.email.clone()),
            contact: Some(payload.contact.clone()),
            course_name: Some(payload.course_name.clone()),
            total_fees: payload.total_fees.parse().ok(),
            payment_mode: payload.payment_mode,
            payment_option: Some(payload.payment_option),
            ..Default::default()
        })
    }
}
