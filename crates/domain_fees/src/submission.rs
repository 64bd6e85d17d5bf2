//! Enrollment submission guard and wire payload
//!
//! A fee plan is checked here before anything is sent to the backend. A plan
//! that fails a check never leaves the process.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::temporal::optional_calendar_date;
use core_kernel::{AdmissionId, EnquiryId, Money};

use crate::error::FeeError;
use crate::fee_plan::{FeePlan, PaymentMode, PaymentOption};
use crate::installment::{InstallmentSchedule, InstallmentSlot};

/// Who is being enrolled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct StudentIdentity {
    #[validate(length(min = 1, message = "full name is required"))]
    pub full_name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    /// Phone number, with or without country code
    #[validate(length(min = 10, max = 15, message = "contact must be 10 to 15 characters"))]
    pub contact: String,
}

impl StudentIdentity {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            contact: contact.into().trim().to_string(),
        }
    }
}

/// Which backend flow the enrollment goes through
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnrollmentTarget {
    /// Converting an enquiry into an enrollment
    Enquiry(EnquiryId),
    /// Enrolling a direct admission
    DirectAdmission(AdmissionId),
}

impl EnrollmentTarget {
    /// Request path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            EnrollmentTarget::Enquiry(id) => format!("/enquiries/{}/enroll", id),
            EnrollmentTarget::DirectAdmission(id) => format!("/admissions/{}/enroll", id),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EnrollmentTarget::Enquiry(_) => "enquiry",
            EnrollmentTarget::DirectAdmission(_) => "admission",
        }
    }
}

fn fixed2(amount: Option<Money>) -> Option<String> {
    amount.map(|a| a.to_fixed2())
}

/// JSON body posted to the enroll endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentPayload {
    pub full_name: String,
    pub email: String,
    pub contact: String,
    pub course_name: String,
    pub total_fees: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<PaymentMode>,
    pub payment_option: PaymentOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advance_payment_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment1_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_calendar_date")]
    pub installment1_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment2_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_calendar_date")]
    pub installment2_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment3_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_calendar_date")]
    pub installment3_date: Option<NaiveDate>,
}

/// A validated enrollment ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentSubmission {
    pub target: EnrollmentTarget,
    pub payload: EnrollmentPayload,
}

impl EnrollmentSubmission {
    /// Checks a fee plan and builds the request for it
    ///
    /// # Errors
    ///
    /// * `MissingTotalFees` if the total was never set
    /// * `MissingPaymentOption` if no payment option was chosen
    /// * `MissingInstallmentData` if an installment plan lacks the first
    ///   amount or the second or third due date
    /// * `FirstInstallmentExceedsTotal` or `UnbalancedInstallments` if the
    ///   total was lowered after the installments were split
    /// * `InvalidIdentity` if the student details fail validation
    pub fn build(identity: StudentIdentity, plan: &FeePlan, target: EnrollmentTarget) -> Result<Self, FeeError> {
        let total = plan.total_fees().ok_or(FeeError::MissingTotalFees)?;
        let option = plan.payment_option().ok_or(FeeError::MissingPaymentOption)?;

        let schedule = match option {
            PaymentOption::PayInInstallments => {
                let schedule = plan.installments().copied().unwrap_or_else(InstallmentSchedule::empty);
                check_schedule(&schedule, &total)?;
                Some(schedule)
            }
            _ => None,
        };

        identity
            .validate()
            .map_err(|errors| FeeError::InvalidIdentity(errors.to_string()))?;

        let installment = |index: usize| {
            schedule
                .as_ref()
                .map(|s| *s.get(InstallmentSlot::ALL[index]))
                .unwrap_or_default()
        };

        let payload = EnrollmentPayload {
            full_name: identity.full_name,
            email: identity.email,
            contact: identity.contact,
            course_name: plan.courses().joined(),
            total_fees: total.to_fixed2(),
            payment_mode: plan.payment_mode(),
            payment_option: option,
            advance_payment_amount: fixed2(plan.advance_payment_amount()),
            installment1_amount: fixed2(installment(0).amount),
            installment1_date: installment(0).due_date,
            installment2_amount: fixed2(installment(1).amount),
            installment2_date: installment(1).due_date,
            installment3_amount: fixed2(installment(2).amount),
            installment3_date: installment(2).due_date,
        };

        tracing::debug!(target_kind = target.kind(), option = %option, "enrollment submission built");

        Ok(Self { target, payload })
    }
}

fn check_schedule(schedule: &InstallmentSchedule, total: &Money) -> Result<(), FeeError> {
    let Some(first) = schedule.first().amount else {
        return Err(FeeError::MissingInstallmentData {
            field: "installment1Amount",
        });
    };
    if schedule.second().due_date.is_none() {
        return Err(FeeError::MissingInstallmentData {
            field: "installment2Date",
        });
    }
    if schedule.third().due_date.is_none() {
        return Err(FeeError::MissingInstallmentData {
            field: "installment3Date",
        });
    }

    // The total may have been edited after the split was derived
    if total.checked_sub(&first)?.is_negative() {
        return Err(FeeError::FirstInstallmentExceedsTotal {
            first: first.amount(),
            total: total.amount(),
        });
    }
    if !schedule.is_balanced(total) {
        return Err(FeeError::UnbalancedInstallments {
            scheduled: schedule.scheduled_total(total)?.amount(),
            total: total.amount(),
        });
    }
    Ok(())
}
