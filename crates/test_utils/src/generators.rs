//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use core_kernel::{CourseId, Currency, Money};
use domain_fees::SelectedCourse;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for fee amounts in paise, up to 10 lakh rupees
pub fn fee_minor_strategy() -> impl Strategy<Value = i64> {
    0i64..100_000_000i64
}

/// Strategy for non-negative INR fee amounts
pub fn inr_fee_strategy() -> impl Strategy<Value = Money> {
    fee_minor_strategy().prop_map(|minor| Money::from_minor(minor, Currency::INR))
}

/// Strategy for a total and a first installment not above it
pub fn total_and_first_strategy() -> impl Strategy<Value = (Money, Money)> {
    fee_minor_strategy()
        .prop_flat_map(|total| (Just(total), 0i64..=total))
        .prop_map(|(total, first)| {
            (
                Money::from_minor(total, Currency::INR),
                Money::from_minor(first, Currency::INR),
            )
        })
}

/// Strategy for a total and a first installment strictly above it
pub fn total_and_excess_first_strategy() -> impl Strategy<Value = (Money, Money)> {
    (fee_minor_strategy(), 1i64..10_000_000i64).prop_map(|(total, excess)| {
        (
            Money::from_minor(total, Currency::INR),
            Money::from_minor(total + excess, Currency::INR),
        )
    })
}

/// Strategy for course prices with up to two decimals
pub fn price_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000i64).prop_map(|minor| Decimal::new(minor, 2))
}

/// Strategy for a catalogue of uniquely titled courses
pub fn catalogue_strategy() -> impl Strategy<Value = Vec<SelectedCourse>> {
    prop::collection::vec(price_strategy(), 1..8).prop_map(|prices| {
        prices
            .into_iter()
            .enumerate()
            .map(|(i, price)| {
                SelectedCourse::new(
                    CourseId::new(format!("course-{}", i)).unwrap(),
                    format!("Course {}", i),
                    Money::new(price, Currency::INR),
                )
                .unwrap()
            })
            .collect()
    })
}

/// Strategy for a sequence of toggles as indices into a catalogue
pub fn toggle_sequence_strategy(catalogue_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..catalogue_len, 0..20)
}
