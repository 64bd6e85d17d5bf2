//! Fee plan form state
//!
//! A `FeePlan` is the billing state of one enrollment form while it is being
//! edited. It is a value: every edit returns a new snapshot, and a rejected
//! edit returns an error and leaves the snapshot it was called on untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, Money};

use crate::course::{CourseFeeAggregator, CourseSelection, CourseToggle, SelectedCourse};
use crate::error::FeeError;
use crate::installment::{InstallmentCalculator, InstallmentSchedule, InstallmentSlot};

/// Normalizes a label for lenient matching: lowercase ASCII alphanumerics only
fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// How the student pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentMode {
    Cash,
    Online,
    UPI,
    BankTransfer,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 4] = [
        PaymentMode::Cash,
        PaymentMode::Online,
        PaymentMode::UPI,
        PaymentMode::BankTransfer,
    ];

    /// Wire name used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Online => "Online",
            PaymentMode::UPI => "UPI",
            PaymentMode::BankTransfer => "BankTransfer",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::BankTransfer => "Bank Transfer",
            other => other.as_str(),
        }
    }
}

impl FromStr for PaymentMode {
    type Err = String;

    /// Accepts the wire name or the label in any case, e.g. `"Bank Transfer"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "cash" => Ok(PaymentMode::Cash),
            "online" => Ok(PaymentMode::Online),
            "upi" => Ok(PaymentMode::UPI),
            "banktransfer" => Ok(PaymentMode::BankTransfer),
            _ => Err(format!("unknown payment mode: {}", s)),
        }
    }
}

impl TryFrom<String> for PaymentMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaymentMode> for String {
    fn from(mode: PaymentMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the fees are split over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentOption {
    PayInFull,
    PayInInstallments,
    PaymentInAdvance,
}

impl PaymentOption {
    pub const ALL: [PaymentOption; 3] = [
        PaymentOption::PayInFull,
        PaymentOption::PayInInstallments,
        PaymentOption::PaymentInAdvance,
    ];

    /// Wire name used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOption::PayInFull => "PayInFull",
            PaymentOption::PayInInstallments => "PayInInstallments",
            PaymentOption::PaymentInAdvance => "PaymentInAdvance",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            PaymentOption::PayInFull => "Pay in Full",
            PaymentOption::PayInInstallments => "Pay in Installments",
            PaymentOption::PaymentInAdvance => "Payment in Advance",
        }
    }
}

impl FromStr for PaymentOption {
    type Err = String;

    /// Accepts the wire name or the label in any case, e.g. `"Pay in Installments"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "payinfull" | "fullpayment" => Ok(PaymentOption::PayInFull),
            "payininstallments" | "payininstalments" | "installments" => {
                Ok(PaymentOption::PayInInstallments)
            }
            "paymentinadvance" | "advancepayment" | "advance" => Ok(PaymentOption::PaymentInAdvance),
            _ => Err(format!("unknown payment option: {}", s)),
        }
    }
}

impl TryFrom<String> for PaymentOption {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaymentOption> for String {
    fn from(option: PaymentOption) -> Self {
        option.as_str().to_string()
    }
}

impl fmt::Display for PaymentOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing state of one enrollment form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePlan {
    currency: Currency,
    total_fees: Option<Money>,
    payment_mode: Option<PaymentMode>,
    payment_option: Option<PaymentOption>,
    installments: Option<InstallmentSchedule>,
    advance_payment_amount: Option<Money>,
    courses: CourseSelection,
}

impl FeePlan {
    /// Creates an empty plan in the given currency
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            total_fees: None,
            payment_mode: None,
            payment_option: None,
            installments: None,
            advance_payment_amount: None,
            courses: CourseSelection::new(),
        }
    }

    /// Creates a plan with courses pre-selected and the total set to their prices
    pub fn with_courses<'a, I>(currency: Currency, courses: I) -> Result<Self, FeeError>
    where
        I: IntoIterator<Item = &'a SelectedCourse>,
    {
        let courses: Vec<&SelectedCourse> = courses.into_iter().collect();
        let total = CourseFeeAggregator::sum_prices(courses.iter().copied(), currency)?;
        let selection = courses.iter().map(|c| c.title.as_str()).collect();

        Ok(Self {
            total_fees: Some(total),
            courses: selection,
            ..Self::new(currency)
        })
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn total_fees(&self) -> Option<Money> {
        self.total_fees
    }

    pub fn payment_mode(&self) -> Option<PaymentMode> {
        self.payment_mode
    }

    pub fn payment_option(&self) -> Option<PaymentOption> {
        self.payment_option
    }

    /// The installment schedule, present only for `PayInInstallments`
    pub fn installments(&self) -> Option<&InstallmentSchedule> {
        self.installments.as_ref()
    }

    pub fn advance_payment_amount(&self) -> Option<Money> {
        self.advance_payment_amount
    }

    pub fn courses(&self) -> &CourseSelection {
        &self.courses
    }

    fn ensure_amount(&self, amount: &Money) -> Result<(), FeeError> {
        if amount.currency() != self.currency {
            return Err(core_kernel::MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                amount.currency().to_string(),
            )
            .into());
        }
        if amount.is_negative() {
            return Err(FeeError::NegativeAmount(amount.amount()));
        }
        Ok(())
    }

    /// Overrides the total fees by hand
    ///
    /// Installment amounts are not recomputed; only an edit of the first
    /// installment does that.
    pub fn set_total_fees(&self, total: Money) -> Result<Self, FeeError> {
        self.ensure_amount(&total)?;
        Ok(Self {
            total_fees: Some(total),
            ..self.clone()
        })
    }

    pub fn set_payment_mode(&self, mode: PaymentMode) -> Self {
        Self {
            payment_mode: Some(mode),
            ..self.clone()
        }
    }

    /// Chooses the payment option
    ///
    /// Switching to `PayInInstallments` opens an empty schedule (or keeps the
    /// existing one); switching away discards it. The advance amount is only
    /// kept while the option is `PaymentInAdvance`.
    pub fn set_payment_option(&self, option: PaymentOption) -> Self {
        let installments = match option {
            PaymentOption::PayInInstallments => {
                Some(self.installments.unwrap_or_else(InstallmentSchedule::empty))
            }
            _ => None,
        };
        let advance_payment_amount = match option {
            PaymentOption::PaymentInAdvance => self.advance_payment_amount,
            _ => None,
        };

        Self {
            payment_option: Some(option),
            installments,
            advance_payment_amount,
            ..self.clone()
        }
    }

    /// Enters the first installment and derives the other two
    ///
    /// # Errors
    ///
    /// * `WrongPaymentOption` unless the plan pays in installments
    /// * `FirstInstallmentExceedsTotal` if the amount is above the total fees
    pub fn set_first_installment(&self, amount: Money) -> Result<Self, FeeError> {
        let schedule = self.installments.ok_or(FeeError::WrongPaymentOption {
            expected: PaymentOption::PayInInstallments,
        })?;
        self.ensure_amount(&amount)?;

        let total = self.total_fees.unwrap_or_else(|| Money::zero(self.currency));
        let derived = match InstallmentCalculator::split_remainder(&total, &amount) {
            Ok(derived) => derived,
            Err(err) => {
                tracing::warn!(
                    first = %amount.amount(),
                    total = %total.amount(),
                    "first installment rejected"
                );
                return Err(err);
            }
        };

        tracing::debug!(
            first = %amount.amount(),
            second = %derived.second.amount(),
            third = %derived.third.amount(),
            "installments recomputed"
        );

        Ok(Self {
            installments: Some(schedule.with_amounts(amount, &derived)),
            ..self.clone()
        })
    }

    /// Sets or clears the due date of any installment
    pub fn set_due_date(&self, slot: InstallmentSlot, due_date: Option<NaiveDate>) -> Result<Self, FeeError> {
        let schedule = self.installments.ok_or(FeeError::WrongPaymentOption {
            expected: PaymentOption::PayInInstallments,
        })?;

        Ok(Self {
            installments: Some(schedule.with_due_date(slot, due_date)),
            ..self.clone()
        })
    }

    /// Records the amount paid in advance
    pub fn set_advance_payment(&self, amount: Money) -> Result<Self, FeeError> {
        if self.payment_option != Some(PaymentOption::PaymentInAdvance) {
            return Err(FeeError::WrongPaymentOption {
                expected: PaymentOption::PaymentInAdvance,
            });
        }
        self.ensure_amount(&amount)?;

        Ok(Self {
            advance_payment_amount: Some(amount),
            ..self.clone()
        })
    }

    /// Balance left after the advance payment, clamped at zero
    pub fn remaining_balance(&self) -> Result<Option<Money>, FeeError> {
        match (self.total_fees, self.advance_payment_amount) {
            (Some(total), Some(advance)) => Ok(Some(total.saturating_sub(&advance)?)),
            _ => Ok(None),
        }
    }

    /// Toggles a course and adjusts the total fees incrementally
    pub fn toggle_course(&self, course: &SelectedCourse) -> Result<Self, FeeError> {
        let total = self.total_fees.unwrap_or_else(|| Money::zero(self.currency));
        let CourseToggle {
            selection,
            total_fees,
            change,
        } = CourseFeeAggregator::toggle(&self.courses, &total, course)?;

        tracing::debug!(course = %course.title, ?change, total = %total_fees.amount(), "course toggled");

        Ok(Self {
            total_fees: Some(total_fees),
            courses: selection,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inr(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    fn installment_plan(total: rust_decimal::Decimal) -> FeePlan {
        FeePlan::new(Currency::INR)
            .set_total_fees(inr(total))
            .unwrap()
            .set_payment_option(PaymentOption::PayInInstallments)
    }

    #[test]
    fn test_first_installment_derives_the_rest() {
        let plan = installment_plan(dec!(9000)).set_first_installment(inr(dec!(3000))).unwrap();
        let schedule = plan.installments().unwrap();

        assert_eq!(schedule.second().amount.unwrap().to_fixed2(), "3000.00");
        assert_eq!(schedule.third().amount.unwrap().to_fixed2(), "3000.00");
    }

    #[test]
    fn test_rejected_edit_leaves_plan_unchanged() {
        let plan = installment_plan(dec!(9000)).set_first_installment(inr(dec!(3000))).unwrap();
        let before = plan.clone();

        let result = plan.set_first_installment(inr(dec!(9000.50)));
        assert!(matches!(result, Err(FeeError::FirstInstallmentExceedsTotal { .. })));
        assert_eq!(plan, before);
    }

    #[test]
    fn test_first_installment_requires_installment_option() {
        let plan = FeePlan::new(Currency::INR).set_payment_option(PaymentOption::PayInFull);
        assert!(matches!(
            plan.set_first_installment(inr(dec!(10))),
            Err(FeeError::WrongPaymentOption { .. })
        ));
    }

    #[test]
    fn test_switching_away_from_installments_drops_schedule() {
        let plan = installment_plan(dec!(9000)).set_payment_option(PaymentOption::PayInFull);
        assert!(plan.installments().is_none());
    }

    #[test]
    fn test_payment_labels_parse() {
        assert_eq!("Bank Transfer".parse::<PaymentMode>().unwrap(), PaymentMode::BankTransfer);
        assert_eq!("upi".parse::<PaymentMode>().unwrap(), PaymentMode::UPI);
        assert_eq!(
            "Pay in Installments".parse::<PaymentOption>().unwrap(),
            PaymentOption::PayInInstallments
        );
        assert!("Barter".parse::<PaymentOption>().is_err());
    }
}
