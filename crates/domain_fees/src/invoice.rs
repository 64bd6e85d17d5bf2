//! Invoice projection
//!
//! An invoice is never stored or edited on the client. It is projected on
//! demand from an admission or enrollment record and discarded after display.
//! The projection copies the recorded figures; the only amount it computes
//! is the balance left after an advance payment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Currency, DateLocale, Money, Timezone};

use crate::error::FeeError;
use crate::fee_plan::{PaymentMode, PaymentOption};
use crate::installment::InstallmentSlot;
use crate::record::EnrollmentRecord;

pub use crate::record::PENDING_INVOICE_NO;

/// Description of the discount line
pub const REFERRAL_DISCOUNT_LABEL: &str = "Referral Discount";

/// Who the invoice is addressed to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTo {
    pub full_name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
}

/// A single invoice line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub description: String,
    pub amount: Money,
}

/// An installment as printed on the invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub slot: InstallmentSlot,
    pub amount: Option<Money>,
    pub due_date: Option<NaiveDate>,
}

/// Payment plan section of the invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPlanSummary {
    PayInFull,
    /// Paid partly in advance; `remaining_balance` is never negative
    Advance {
        advance: Money,
        remaining_balance: Money,
    },
    /// Recorded installments, copied as-is
    Installments([ScheduledInstallment; 3]),
    /// No payment option on the record, or advance chosen without an amount
    Unspecified(Option<PaymentOption>),
}

/// A display-ready invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    /// `invoice_date` rendered in the display locale
    pub invoice_date_display: String,
    pub bill_to: BillTo,
    pub line_items: Vec<InvoiceLineItem>,
    pub referral_discount: Option<Money>,
    /// Taken from the record's total fees, not recomputed from the lines
    pub total_payable: Money,
    pub payment_mode: Option<PaymentMode>,
    pub payment_plan: PaymentPlanSummary,
}

impl Invoice {
    /// Remaining balance with exactly two decimals, for advance plans
    pub fn remaining_balance_display(&self) -> Option<String> {
        match &self.payment_plan {
            PaymentPlanSummary::Advance {
                remaining_balance, ..
            } => Some(remaining_balance.to_fixed2()),
            _ => None,
        }
    }

    /// Sum of the line items; may differ from `total_payable`
    pub fn line_total(&self) -> Result<Money, FeeError> {
        Ok(Money::sum(
            self.line_items.iter().map(|item| &item.amount),
            self.total_payable.currency(),
        )?)
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Invoice {}", self.invoice_no)?;
        writeln!(f, "Date: {}", self.invoice_date_display)?;
        writeln!(f)?;
        writeln!(f, "Bill to:")?;
        for line in [
            &self.bill_to.full_name,
            &self.bill_to.address,
            &self.bill_to.email,
            &self.bill_to.contact,
        ]
        .into_iter()
        .flatten()
        {
            writeln!(f, "  {}", line)?;
        }
        writeln!(f)?;
        for item in &self.line_items {
            writeln!(f, "{:<40} {:>14}", item.description, item.amount.to_string())?;
        }
        writeln!(f, "{:<40} {:>14}", "Total Payable", self.total_payable.to_string())?;

        if let Some(mode) = self.payment_mode {
            writeln!(f, "Payment mode: {}", mode)?;
        }
        match &self.payment_plan {
            PaymentPlanSummary::PayInFull => writeln!(f, "Payment plan: {}", PaymentOption::PayInFull.label())?,
            PaymentPlanSummary::Advance {
                advance,
                remaining_balance,
            } => {
                writeln!(f, "Payment plan: {}", PaymentOption::PaymentInAdvance.label())?;
                writeln!(f, "  Advance paid: {}", advance)?;
                writeln!(f, "  Remaining balance: {}", remaining_balance)?;
            }
            PaymentPlanSummary::Installments(installments) => {
                writeln!(f, "Payment plan: {}", PaymentOption::PayInInstallments.label())?;
                for installment in installments {
                    let amount = installment
                        .amount
                        .map(|a| a.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    let due = installment
                        .due_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    writeln!(
                        f,
                        "  Installment {}: {} due {}",
                        installment.slot.number(),
                        amount,
                        due
                    )?;
                }
            }
            PaymentPlanSummary::Unspecified(_) => writeln!(f, "Payment plan: not specified")?,
        }
        Ok(())
    }
}

/// Projects records into invoices
///
/// `today` is the fallback invoice date. It is injected so that projection
/// stays a pure function of its inputs.
#[derive(Debug, Clone)]
pub struct InvoiceProjector {
    currency: Currency,
    locale: DateLocale,
    today: NaiveDate,
}

impl InvoiceProjector {
    pub fn new(currency: Currency, locale: DateLocale, today: NaiveDate) -> Self {
        Self {
            currency,
            locale,
            today,
        }
    }

    /// Creates a projector dated today in the business timezone
    pub fn for_today(currency: Currency, locale: DateLocale, timezone: &Timezone) -> Self {
        Self::new(currency, locale, timezone.today())
    }

    /// Projects an invoice from a record
    ///
    /// # Errors
    ///
    /// * `MissingTotalFees` if the record carries no total fees
    /// * `NegativeAmount` if the referral or advance amount is negative
    pub fn project(&self, record: &EnrollmentRecord) -> Result<Invoice, FeeError> {
        let currency = self.currency;
        let total = EnrollmentRecord::money(record.total_fees, currency).ok_or(FeeError::MissingTotalFees)?;

        let description = match (record.resolve_course_name(), record.batch()) {
            (Some(course), Some(batch)) => format!("{} ({})", course, batch),
            (Some(course), None) => course.to_string(),
            (None, Some(batch)) => format!("({})", batch),
            (None, None) => String::new(),
        };
        let list_price = EnrollmentRecord::money(record.original_fees, currency).unwrap_or(total);

        let mut line_items = vec![InvoiceLineItem {
            description,
            amount: list_price,
        }];

        let referral_discount = match EnrollmentRecord::money(record.referral_amount, currency) {
            Some(referral) if referral.is_negative() => {
                return Err(FeeError::NegativeAmount(referral.amount()));
            }
            Some(referral) if referral.is_positive() => Some(referral),
            _ => None,
        };
        if let Some(referral) = referral_discount {
            line_items.push(InvoiceLineItem {
                description: REFERRAL_DISCOUNT_LABEL.to_string(),
                amount: -referral,
            });
        }

        let payment_plan = self.summarize_plan(record, &total)?;
        let invoice_date = record.resolve_invoice_date(self.today);

        let invoice = Invoice {
            invoice_no: record.resolve_invoice_no(),
            invoice_date,
            invoice_date_display: self.locale.format(invoice_date),
            bill_to: BillTo {
                full_name: record.full_name.clone(),
                address: record.address.clone(),
                email: record.email.clone(),
                contact: record.resolve_contact().map(str::to_string),
            },
            line_items,
            referral_discount,
            total_payable: total,
            payment_mode: record.payment_mode,
            payment_plan,
        };

        tracing::debug!(
            invoice_no = %invoice.invoice_no,
            total = %invoice.total_payable.amount(),
            "invoice projected"
        );

        Ok(invoice)
    }

    /// Projects an invoice only when a record is present
    pub fn project_optional(&self, record: Option<&EnrollmentRecord>) -> Option<Result<Invoice, FeeError>> {
        record.map(|r| self.project(r))
    }

    fn summarize_plan(&self, record: &EnrollmentRecord, total: &Money) -> Result<PaymentPlanSummary, FeeError> {
        let currency = self.currency;
        let summary = match record.payment_option {
            Some(PaymentOption::PayInFull) => PaymentPlanSummary::PayInFull,
            Some(PaymentOption::PaymentInAdvance) => {
                match EnrollmentRecord::money(record.advance_payment_amount, currency) {
                    Some(advance) if advance.is_negative() => {
                        return Err(FeeError::NegativeAmount(advance.amount()));
                    }
                    Some(advance) => PaymentPlanSummary::Advance {
                        advance,
                        remaining_balance: total.saturating_sub(&advance)?,
                    },
                    None => PaymentPlanSummary::Unspecified(Some(PaymentOption::PaymentInAdvance)),
                }
            }
            Some(PaymentOption::PayInInstallments) => {
                PaymentPlanSummary::Installments(record.recorded_installments().map(|recorded| {
                    ScheduledInstallment {
                        slot: recorded.slot,
                        amount: EnrollmentRecord::money(recorded.amount, currency),
                        due_date: recorded.due_date,
                    }
                }))
            }
            None => PaymentPlanSummary::Unspecified(None),
        };
        Ok(summary)
    }
}
