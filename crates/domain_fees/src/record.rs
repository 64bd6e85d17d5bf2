//! Admission and enrollment records as the backend sends them
//!
//! Every field the backend may omit is an `Option`. Fields that appear under
//! more than one name, and values nested deep inside relations, are read
//! through one resolution method each so the fallback order lives in a
//! single place.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use core_kernel::temporal::optional_calendar_date;
use core_kernel::{Currency, Money};

use crate::course::CourseSelection;
use crate::fee_plan::{PaymentMode, PaymentOption};
use crate::installment::InstallmentSlot;

/// Invoice number shown until the backend has issued one
pub const PENDING_INVOICE_NO: &str = "INV-PENDING";

/// Deserializes an amount sent as a number, a numeric string, `""` or `null`
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Number(Decimal),
    }

    match Option::<RawAmount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawAmount::Number(value)) => Ok(Some(value)),
        Some(RawAmount::Text(text)) => {
            let cleaned: String = text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
            if cleaned.is_empty() {
                return Ok(None);
            }
            Decimal::from_str(&cleaned)
                .or_else(|_| Decimal::from_scientific(&cleaned))
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Deserializes a labelled enum, treating `""` and `null` as absent
fn lenient_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Invoice issued for a payment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRelation {
    #[serde(default)]
    pub invoice_no: Option<String>,
    #[serde(default, with = "optional_calendar_date")]
    pub created_at: Option<NaiveDate>,
}

/// Payment made against an enrollment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRelation {
    #[serde(default)]
    pub invoice: Option<InvoiceRelation>,
}

/// Enrollment created from an admission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRelation {
    #[serde(default)]
    pub payments: Vec<PaymentRelation>,
}

/// One installment exactly as recorded by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedInstallment {
    pub slot: InstallmentSlot,
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
}

/// An admission or enrollment record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub preferred_courses: Option<String>,
    #[serde(default)]
    pub batch_timing: Option<String>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_fees: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub original_fees: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub referral_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub payment_mode: Option<PaymentMode>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub payment_option: Option<PaymentOption>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub advance_payment_amount: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub installment1_amount: Option<Decimal>,
    #[serde(default, with = "optional_calendar_date")]
    pub installment1_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub installment2_amount: Option<Decimal>,
    #[serde(default, with = "optional_calendar_date")]
    pub installment2_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub installment3_amount: Option<Decimal>,
    #[serde(default, with = "optional_calendar_date")]
    pub installment3_date: Option<NaiveDate>,

    #[serde(default)]
    pub invoice_no: Option<String>,
    #[serde(default, with = "optional_calendar_date")]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub enrollments: Vec<EnrollmentRelation>,
}

/// Returns the trimmed value if it is present and not blank
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl EnrollmentRecord {
    /// Invoice of the first payment of the first enrollment, if any
    pub fn nested_invoice(&self) -> Option<&InvoiceRelation> {
        self.enrollments
            .first()?
            .payments
            .first()?
            .invoice
            .as_ref()
    }

    /// Invoice number: the record's own, then the nested invoice's, then `INV-PENDING`
    pub fn resolve_invoice_no(&self) -> String {
        non_blank(&self.invoice_no)
            .or_else(|| self.nested_invoice().and_then(|inv| non_blank(&inv.invoice_no)))
            .unwrap_or(PENDING_INVOICE_NO)
            .to_string()
    }

    /// Invoice date: the record's own, then the nested invoice's creation date, then `today`
    pub fn resolve_invoice_date(&self, today: NaiveDate) -> NaiveDate {
        self.invoice_date
            .or_else(|| self.nested_invoice().and_then(|inv| inv.created_at))
            .unwrap_or(today)
    }

    /// Contact number under either of its field names
    pub fn resolve_contact(&self) -> Option<&str> {
        non_blank(&self.contact).or_else(|| non_blank(&self.contact_number))
    }

    /// Course name under either of its field names
    pub fn resolve_course_name(&self) -> Option<&str> {
        non_blank(&self.course_name).or_else(|| non_blank(&self.preferred_courses))
    }

    /// Course titles as an ordered selection
    pub fn course_selection(&self) -> CourseSelection {
        self.resolve_course_name()
            .map(CourseSelection::parse)
            .unwrap_or_default()
    }

    pub fn batch(&self) -> Option<&str> {
        non_blank(&self.batch_timing)
    }

    /// The three installments exactly as recorded
    pub fn recorded_installments(&self) -> [RecordedInstallment; 3] {
        [
            RecordedInstallment {
                slot: InstallmentSlot::First,
                amount: self.installment1_amount,
                due_date: self.installment1_date,
            },
            RecordedInstallment {
                slot: InstallmentSlot::Second,
                amount: self.installment2_amount,
                due_date: self.installment2_date,
            },
            RecordedInstallment {
                slot: InstallmentSlot::Third,
                amount: self.installment3_amount,
                due_date: self.installment3_date,
            },
        ]
    }

    /// Converts an optional recorded amount to money
    pub fn money(amount: Option<Decimal>, currency: Currency) -> Option<Money> {
        amount.map(|a| Money::new(a, currency))
    }
}
