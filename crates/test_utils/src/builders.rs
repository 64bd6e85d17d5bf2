//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_fees::{
    EnrollmentRecord, EnrollmentRelation, FeePlan, InstallmentSlot, InvoiceRelation, PaymentMode,
    PaymentOption, PaymentRelation, SelectedCourse,
};
use rust_decimal::Decimal;

/// Builder for admission and enrollment records
#[derive(Debug, Clone, Default)]
pub struct EnrollmentRecordBuilder {
    record: EnrollmentRecord,
}

impl EnrollmentRecordBuilder {
    /// Creates a builder for an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-filled with a student
    pub fn student() -> Self {
        Self::new()
            .with_full_name("Asha Verma")
            .with_email("asha.verma@example.com")
            .with_contact("9876543210")
            .with_address("12 MG Road, Pune")
    }

    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.record.full_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.record.email = Some(email.into());
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.record.contact = Some(contact.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.record.address = Some(address.into());
        self
    }

    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.record.course_name = Some(course.into());
        self
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.record.batch_timing = Some(batch.into());
        self
    }

    pub fn with_total_fees(mut self, total: Decimal) -> Self {
        self.record.total_fees = Some(total);
        self
    }

    pub fn with_original_fees(mut self, original: Decimal) -> Self {
        self.record.original_fees = Some(original);
        self
    }

    pub fn with_referral(mut self, referral: Decimal) -> Self {
        self.record.referral_amount = Some(referral);
        self
    }

    pub fn with_payment_mode(mut self, mode: PaymentMode) -> Self {
        self.record.payment_mode = Some(mode);
        self
    }

    pub fn with_payment_option(mut self, option: PaymentOption) -> Self {
        self.record.payment_option = Some(option);
        self
    }

    pub fn with_advance(mut self, advance: Decimal) -> Self {
        self.record.advance_payment_amount = Some(advance);
        self
    }

    /// Sets one recorded installment
    pub fn with_installment(mut self, slot: InstallmentSlot, amount: Decimal, due: NaiveDate) -> Self {
        match slot {
            InstallmentSlot::First => {
                self.record.installment1_amount = Some(amount);
                self.record.installment1_date = Some(due);
            }
            InstallmentSlot::Second => {
                self.record.installment2_amount = Some(amount);
                self.record.installment2_date = Some(due);
            }
            InstallmentSlot::Third => {
                self.record.installment3_amount = Some(amount);
                self.record.installment3_date = Some(due);
            }
        }
        self
    }

    pub fn with_invoice_no(mut self, invoice_no: impl Into<String>) -> Self {
        self.record.invoice_no = Some(invoice_no.into());
        self
    }

    pub fn with_invoice_date(mut self, date: NaiveDate) -> Self {
        self.record.invoice_date = Some(date);
        self
    }

    /// Adds an enrollment whose first payment carries an invoice
    pub fn with_nested_invoice(mut self, invoice_no: Option<&str>, created_at: Option<NaiveDate>) -> Self {
        self.record.enrollments.push(EnrollmentRelation {
            payments: vec![PaymentRelation {
                invoice: Some(InvoiceRelation {
                    invoice_no: invoice_no.map(str::to_string),
                    created_at,
                }),
            }],
        });
        self
    }

    pub fn build(self) -> EnrollmentRecord {
        self.record
    }
}

/// Builder for fee plans, applying edits in form order
pub struct FeePlanBuilder {
    currency: Currency,
    courses: Vec<SelectedCourse>,
    total: Option<Decimal>,
    mode: Option<PaymentMode>,
    option: Option<PaymentOption>,
    first_installment: Option<Decimal>,
    due_dates: Vec<(InstallmentSlot, NaiveDate)>,
    advance: Option<Decimal>,
}

impl Default for FeePlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeePlanBuilder {
    pub fn new() -> Self {
        Self {
            currency: Currency::INR,
            courses: Vec::new(),
            total: None,
            mode: None,
            option: None,
            first_installment: None,
            due_dates: Vec::new(),
            advance: None,
        }
    }

    /// Toggles a course on before any other edit
    pub fn with_course(mut self, course: SelectedCourse) -> Self {
        self.courses.push(course);
        self
    }

    /// Overrides the total after the courses are toggled
    pub fn with_total(mut self, total: Decimal) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_mode(mut self, mode: PaymentMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_option(mut self, option: PaymentOption) -> Self {
        self.option = Some(option);
        self
    }

    pub fn with_first_installment(mut self, amount: Decimal) -> Self {
        self.first_installment = Some(amount);
        self
    }

    pub fn with_due_date(mut self, slot: InstallmentSlot, date: NaiveDate) -> Self {
        self.due_dates.push((slot, date));
        self
    }

    pub fn with_advance(mut self, amount: Decimal) -> Self {
        self.advance = Some(amount);
        self
    }

    /// Builds the plan
    ///
    /// # Panics
    ///
    /// Panics if any edit is rejected; tests for rejections drive `FeePlan` directly.
    pub fn build(self) -> FeePlan {
        let money = |amount: Decimal| Money::new(amount, self.currency);
        let mut plan = FeePlan::new(self.currency);

        for course in &self.courses {
            plan = plan.toggle_course(course).expect("course toggle rejected");
        }
        if let Some(total) = self.total {
            plan = plan.set_total_fees(money(total)).expect("total rejected");
        }
        if let Some(mode) = self.mode {
            plan = plan.set_payment_mode(mode);
        }
        if let Some(option) = self.option {
            plan = plan.set_payment_option(option);
        }
        if let Some(first) = self.first_installment {
            plan = plan.set_first_installment(money(first)).expect("first installment rejected");
        }
        for (slot, date) in &self.due_dates {
            plan = plan.set_due_date(*slot, Some(*date)).expect("due date rejected");
        }
        if let Some(advance) = self.advance {
            plan = plan.set_advance_payment(money(advance)).expect("advance rejected");
        }
        plan
    }
}
