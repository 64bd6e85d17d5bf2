//! Fee Domain - Installment Plans, Course Fees and Invoices
//!
//! This crate holds the billing rules of the enrollment form and the invoice
//! view of the admin console.
//!
//! # Components
//!
//! - **Installment calculator**: derives installments two and three as equal
//!   halves of what remains after the first
//! - **Course fee aggregator**: keeps the total fees in step with the course
//!   selection by adding or subtracting one price per toggle
//! - **Invoice projection**: turns an admission or enrollment record into a
//!   printable invoice
//! - **Submission guard**: rejects incomplete plans before any request is made
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_fees::{FeePlan, PaymentOption};
//! use core_kernel::{Money, Currency};
//!
//! let plan = FeePlan::new(Currency::INR)
//!     .set_total_fees(Money::new(dec!(9000), Currency::INR))?
//!     .set_payment_option(PaymentOption::PayInInstallments)
//!     .set_first_installment(Money::new(dec!(3000), Currency::INR))?;
//!
//! // Installments two and three are 3000.00 each
//! ```

pub mod installment;
pub mod course;
pub mod fee_plan;
pub mod record;
pub mod invoice;
pub mod submission;
pub mod ports;
pub mod services;
pub mod error;

pub use installment::{
    Installment, InstallmentCalculator, InstallmentSchedule, InstallmentSlot, DerivedInstallments,
};
pub use course::{CourseFeeAggregator, CourseSelection, CourseToggle, SelectedCourse, ToggleChange};
pub use fee_plan::{FeePlan, PaymentMode, PaymentOption};
pub use record::{EnrollmentRecord, EnrollmentRelation, PaymentRelation, InvoiceRelation, PENDING_INVOICE_NO};
pub use invoice::{
    BillTo, Invoice, InvoiceLineItem, InvoiceProjector, PaymentPlanSummary, ScheduledInstallment,
    REFERRAL_DISCOUNT_LABEL,
};
pub use submission::{EnrollmentPayload, EnrollmentSubmission, EnrollmentTarget, StudentIdentity};
pub use ports::{EnrollmentPort, EnrollmentPortExt};
pub use services::EnrollmentService;
pub use error::{EnrollmentError, FeeError};
