//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use core_kernel::Money;
use domain_fees::{Invoice, InstallmentSchedule, PaymentPlanSummary};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts a money value prints as the given two-decimal string
pub fn assert_fixed2(money: &Money, expected: &str) {
    assert_eq!(
        money.to_fixed2(),
        expected,
        "Expected {} but amount was {}",
        expected,
        money.amount()
    );
}

/// Asserts that all three installments are present, equal in the last two,
/// and add up to `total` within one cent
pub fn assert_schedule_balanced(schedule: &InstallmentSchedule, total: &Money) {
    let amounts: Vec<Money> = schedule
        .iter()
        .map(|(slot, installment)| {
            installment
                .amount
                .unwrap_or_else(|| panic!("Installment {} has no amount", slot.number()))
        })
        .collect();

    assert_eq!(
        amounts[1], amounts[2],
        "Second and third installments differ: {} vs {}",
        amounts[1], amounts[2]
    );

    let sum = Money::sum(&amounts, total.currency()).expect("Currency mismatch in schedule");
    assert_money_approx_eq(&sum, total, dec!(0.01));
}

/// Asserts the invoice's advance plan leaves the given balance
pub fn assert_remaining_balance(invoice: &Invoice, expected: &str) {
    match &invoice.payment_plan {
        PaymentPlanSummary::Advance { .. } => {
            assert_eq!(invoice.remaining_balance_display().as_deref(), Some(expected));
        }
        other => panic!("Expected an advance payment plan, got {:?}", other),
    }
}
