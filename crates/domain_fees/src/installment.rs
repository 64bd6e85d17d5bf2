//! Installment schedules and the installment plan calculator
//!
//! An installment plan always has three installments. The admin enters the
//! first amount; the second and third are derived as equal halves of what
//! remains, so the three always add back up to the total fees (to the cent).

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::error::FeeError;

/// Number of installments in a plan
pub const INSTALLMENT_COUNT: usize = 3;

/// Position of an installment within a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentSlot {
    First,
    Second,
    Third,
}

impl InstallmentSlot {
    /// All slots in due order
    pub const ALL: [InstallmentSlot; INSTALLMENT_COUNT] = [
        InstallmentSlot::First,
        InstallmentSlot::Second,
        InstallmentSlot::Third,
    ];

    /// Zero-based index into the schedule
    pub fn index(&self) -> usize {
        match self {
            InstallmentSlot::First => 0,
            InstallmentSlot::Second => 1,
            InstallmentSlot::Third => 2,
        }
    }

    /// One-based number as shown on forms and in field names
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }
}

/// A single installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Installment {
    /// Amount due; `None` until entered (first) or derived (second, third)
    pub amount: Option<Money>,
    /// Due date; `None` until picked
    pub due_date: Option<NaiveDate>,
}

/// The three installments of a `PayInInstallments` plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstallmentSchedule {
    installments: [Installment; INSTALLMENT_COUNT],
}

impl InstallmentSchedule {
    /// Creates a schedule with nothing entered yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the installment in the given slot
    pub fn get(&self, slot: InstallmentSlot) -> &Installment {
        &self.installments[slot.index()]
    }

    pub fn first(&self) -> &Installment {
        self.get(InstallmentSlot::First)
    }

    pub fn second(&self) -> &Installment {
        self.get(InstallmentSlot::Second)
    }

    pub fn third(&self) -> &Installment {
        self.get(InstallmentSlot::Third)
    }

    /// Iterates installments in due order
    pub fn iter(&self) -> impl Iterator<Item = (InstallmentSlot, &Installment)> {
        InstallmentSlot::ALL
            .into_iter()
            .map(move |slot| (slot, &self.installments[slot.index()]))
    }

    /// Returns a copy with the amounts replaced and due dates kept
    pub(crate) fn with_amounts(&self, first: Money, derived: &DerivedInstallments) -> Self {
        let mut next = *self;
        next.installments[0].amount = Some(first);
        next.installments[1].amount = Some(derived.second);
        next.installments[2].amount = Some(derived.third);
        next
    }

    /// Returns a copy with one due date replaced
    pub(crate) fn with_due_date(&self, slot: InstallmentSlot, due_date: Option<NaiveDate>) -> Self {
        let mut next = *self;
        next.installments[slot.index()].due_date = due_date;
        next
    }

    /// Sum of the amounts entered so far
    pub fn scheduled_total(&self, total: &Money) -> Result<Money, FeeError> {
        let amounts: Vec<Money> = self.installments.iter().filter_map(|i| i.amount).collect();
        Ok(Money::sum(&amounts, total.currency())?)
    }

    /// True when all amounts are present and add up to `total` within one cent
    pub fn is_balanced(&self, total: &Money) -> bool {
        if self.installments.iter().any(|i| i.amount.is_none()) {
            return false;
        }
        match self
            .scheduled_total(total)
            .and_then(|sum| sum.checked_sub(total).map_err(FeeError::from))
        {
            Ok(diff) => diff.abs().amount() <= dec!(0.01),
            Err(_) => false,
        }
    }
}

/// Amounts derived for the second and third installments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedInstallments {
    pub second: Money,
    pub third: Money,
}

/// Calculator deriving the later installments from the first
pub struct InstallmentCalculator;

impl InstallmentCalculator {
    /// Splits what remains after the first installment into two equal halves
    ///
    /// # Arguments
    ///
    /// * `total` - Total fees for the enrollment
    /// * `first` - Amount entered for the first installment
    ///
    /// # Errors
    ///
    /// * `FirstInstallmentExceedsTotal` if `first > total`; callers keep
    ///   their previous state
    /// * `NegativeAmount` if either input is negative
    /// * `Money` on currency mismatch
    ///
    /// # Example
    ///
    /// ```rust
    /// use core_kernel::{Money, Currency};
    /// use domain_fees::installment::InstallmentCalculator;
    /// use rust_decimal_macros::dec;
    ///
    /// let total = Money::new(dec!(9000), Currency::INR);
    /// let first = Money::new(dec!(3000), Currency::INR);
    /// let derived = InstallmentCalculator::split_remainder(&total, &first).unwrap();
    /// assert_eq!(derived.second.to_fixed2(), "3000.00");
    /// assert_eq!(derived.third.to_fixed2(), "3000.00");
    /// ```
    pub fn split_remainder(total: &Money, first: &Money) -> Result<DerivedInstallments, FeeError> {
        if total.is_negative() {
            return Err(FeeError::NegativeAmount(total.amount()));
        }
        if first.is_negative() {
            return Err(FeeError::NegativeAmount(first.amount()));
        }
        let remaining = total.checked_sub(first)?;
        if remaining.is_negative() {
            return Err(FeeError::FirstInstallmentExceedsTotal {
                first: first.amount(),
                total: total.amount(),
            });
        }

        let each = if remaining.is_positive() {
            remaining.divide(dec!(2))?
        } else {
            Money::zero(total.currency())
        };
        let each = each.round_to_cents();

        Ok(DerivedInstallments {
            second: each,
            third: each,
        })
    }
}
