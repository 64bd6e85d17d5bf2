//! REST adapter for the enrollment port
//!
//! # Endpoints
//!
//! - `GET /courses` -> course catalogue
//! - `GET /admissions/{id}` -> admission record
//! - `POST /enquiries/{id}/enroll` -> enroll from an enquiry
//! - `POST /admissions/{id}/enroll` -> enroll a direct admission
//!
//! # Error Handling
//!
//! Backend errors are mapped to `PortError` variants:
//! - 404 -> `PortError::NotFound`
//! - 401/403 -> `PortError::Unauthorized`
//! - 400/422 -> `PortError::Validation`
//! - 409 -> `PortError::Conflict`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - Timeouts -> `PortError::Timeout`

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use core_kernel::{AdmissionId, CourseId, Currency, DomainPort, Money, PortError};
use domain_fees::record::lenient_amount;
use domain_fees::{EnrollmentPort, EnrollmentRecord, EnrollmentSubmission, SelectedCourse};

use crate::client::ApiClient;

/// Course as listed by the backend
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseDto {
    #[serde(alias = "_id")]
    id: String,
    #[serde(alias = "name")]
    title: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    price: Option<Decimal>,
}

impl CourseDto {
    fn into_course(self, currency: Currency) -> Result<SelectedCourse, PortError> {
        let id = CourseId::new(self.id).map_err(|e| PortError::transformation(e.to_string()))?;
        let price = Money::new(self.price.unwrap_or(Decimal::ZERO), currency);
        SelectedCourse::new(id, self.title, price).map_err(|e| PortError::transformation(e.to_string()))
    }
}

/// Enrollment port backed by the LMS REST API
#[derive(Debug, Clone)]
pub struct HttpEnrollmentAdapter {
    client: ApiClient,
    currency: Currency,
}

impl HttpEnrollmentAdapter {
    pub fn new(client: ApiClient, currency: Currency) -> Self {
        Self { client, currency }
    }
}

impl DomainPort for HttpEnrollmentAdapter {}

#[async_trait]
impl EnrollmentPort for HttpEnrollmentAdapter {
    async fn list_courses(&self) -> Result<Vec<SelectedCourse>, PortError> {
        let courses: Vec<CourseDto> = self.client.get("/courses", "courses").await?;
        courses
            .into_iter()
            .map(|dto| dto.into_course(self.currency))
            .collect()
    }

    async fn get_admission(&self, id: &AdmissionId) -> Result<EnrollmentRecord, PortError> {
        let path = format!("/admissions/{}", id);
        match self.client.get(&path, "admission").await {
            Err(PortError::NotFound { .. }) => Err(PortError::not_found("admission", id)),
            other => other,
        }
    }

    async fn submit_enrollment(&self, submission: &EnrollmentSubmission) -> Result<EnrollmentRecord, PortError> {
        let path = submission.target.path();
        let record: EnrollmentRecord = self
            .client
            .post(&path, &submission.payload, submission.target.kind())
            .await?;

        tracing::info!(%path, id = ?record.id, "enrollment created");
        Ok(record)
    }
}
