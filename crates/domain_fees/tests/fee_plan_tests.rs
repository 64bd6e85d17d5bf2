//! Tests for installment plans, course toggles and fee plan edits

use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};
use domain_fees::{
    CourseFeeAggregator, CourseSelection, FeeError, FeePlan, InstallmentCalculator, InstallmentSlot,
    PaymentOption, ToggleChange,
};
use test_utils::{
    assert_fixed2, assert_money_approx_eq, assert_money_zero, assert_schedule_balanced,
    catalogue_strategy, inr_fee_strategy, toggle_sequence_strategy, total_and_excess_first_strategy,
    total_and_first_strategy, CourseFixtures, DateFixtures, FeePlanBuilder, MoneyFixtures,
};

// ============================================================================
// Installment Calculator Tests
// ============================================================================

mod installment_tests {
    use super::*;

    #[test]
    fn test_nine_thousand_with_three_thousand_first() {
        let derived = InstallmentCalculator::split_remainder(
            &MoneyFixtures::inr(dec!(9000)),
            &MoneyFixtures::inr(dec!(3000)),
        )
        .unwrap();

        assert_fixed2(&derived.second, "3000.00");
        assert_fixed2(&derived.third, "3000.00");
    }

    #[test]
    fn test_first_equals_total() {
        let derived = InstallmentCalculator::split_remainder(
            &MoneyFixtures::inr(dec!(5000)),
            &MoneyFixtures::inr(dec!(5000)),
        )
        .unwrap();

        assert_fixed2(&derived.second, "0.00");
        assert_fixed2(&derived.third, "0.00");
    }

    #[test]
    fn test_zero_total() {
        let derived =
            InstallmentCalculator::split_remainder(&MoneyFixtures::inr_zero(), &MoneyFixtures::inr_zero()).unwrap();
        assert_money_zero(&derived.second);
        assert_money_zero(&derived.third);
    }

    #[test]
    fn test_negative_first_is_rejected() {
        let result = InstallmentCalculator::split_remainder(
            &MoneyFixtures::inr(dec!(100)),
            &MoneyFixtures::inr(dec!(-1)),
        );
        assert_eq!(result, Err(FeeError::NegativeAmount(dec!(-1))));
    }

    #[test]
    fn test_currency_mismatch_is_rejected() {
        let result = InstallmentCalculator::split_remainder(&MoneyFixtures::inr_10000(), &MoneyFixtures::usd_100());
        assert!(matches!(result, Err(FeeError::Money(_))));
    }

    proptest! {
        #[test]
        fn installments_add_back_to_total((total, first) in total_and_first_strategy()) {
            let derived = InstallmentCalculator::split_remainder(&total, &first).unwrap();
            prop_assert_eq!(derived.second, derived.third);

            let sum = first.checked_add(&derived.second).unwrap().checked_add(&derived.third).unwrap();
            let diff = (sum.amount() - total.amount()).abs();
            prop_assert!(diff <= dec!(0.01), "sum {} total {}", sum.amount(), total.amount());
        }

        #[test]
        fn excess_first_is_rejected_and_plan_kept((total, first) in total_and_excess_first_strategy()) {
            let plan = FeePlan::new(Currency::INR)
                .set_total_fees(total)
                .unwrap()
                .set_payment_option(PaymentOption::PayInInstallments)
                .set_first_installment(Money::zero(Currency::INR))
                .unwrap();
            let before = plan.clone();

            let result = plan.set_first_installment(first);
            let rejected = matches!(result, Err(FeeError::FirstInstallmentExceedsTotal { .. }));
            prop_assert!(rejected);
            prop_assert_eq!(plan, before);
        }
    }
}

// ============================================================================
// Course Fee Aggregator Tests
// ============================================================================

mod course_tests {
    use super::*;

    #[test]
    fn test_toggling_two_courses_adds_both_prices() {
        let plan = FeePlan::new(Currency::INR)
            .toggle_course(&CourseFixtures::python())
            .unwrap()
            .toggle_course(&CourseFixtures::data_science())
            .unwrap();

        assert_eq!(plan.total_fees().unwrap().amount(), dec!(37000));
        assert_eq!(plan.courses().joined(), "Python, Data Science");
    }

    #[test]
    fn test_manual_override_survives_later_toggles() {
        let plan = FeePlan::new(Currency::INR)
            .toggle_course(&CourseFixtures::python())
            .unwrap()
            .set_total_fees(MoneyFixtures::inr(dec!(10000)))
            .unwrap()
            .toggle_course(&CourseFixtures::web_development())
            .unwrap();

        assert_eq!(plan.total_fees().unwrap().amount(), dec!(28000.50));
    }

    #[test]
    fn test_removing_after_discount_clamps_at_zero() {
        let python = CourseFixtures::python();
        let plan = FeePlan::new(Currency::INR)
            .toggle_course(&python)
            .unwrap()
            .set_total_fees(MoneyFixtures::inr(dec!(5000)))
            .unwrap()
            .toggle_course(&python)
            .unwrap();

        assert_money_zero(&plan.total_fees().unwrap());
        assert!(plan.courses().is_empty());
    }

    #[test]
    fn test_free_course_changes_selection_only() {
        let toggle = CourseFeeAggregator::toggle(
            &CourseSelection::new(),
            &MoneyFixtures::inr_10000(),
            &CourseFixtures::orientation(),
        )
        .unwrap();

        assert_eq!(toggle.change, ToggleChange::Added);
        assert_eq!(toggle.total_fees, MoneyFixtures::inr_10000());
        assert!(toggle.selection.contains("Orientation"));
    }

    #[test]
    fn test_plan_seeded_from_courses() {
        let catalogue = CourseFixtures::catalogue();
        let plan = FeePlan::with_courses(Currency::INR, &catalogue[..2]).unwrap();

        assert_eq!(plan.total_fees().unwrap().amount(), dec!(37000));
        assert_eq!(plan.courses().len(), 2);
    }

    #[test]
    fn test_resolve_keeps_selection_order() {
        let catalogue = CourseFixtures::catalogue();
        let selection = CourseSelection::parse("Web Development, Python, Unknown");
        let resolved = CourseFeeAggregator::resolve(&selection, &catalogue);

        let titles: Vec<&str> = resolved.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Web Development", "Python"]);
    }

    proptest! {
        #[test]
        fn toggle_on_then_off_is_identity(start in inr_fee_strategy(), catalogue in catalogue_strategy()) {
            let course = &catalogue[0];
            let on = CourseFeeAggregator::toggle(&CourseSelection::new(), &start, course).unwrap();
            let off = CourseFeeAggregator::toggle(&on.selection, &on.total_fees, course).unwrap();

            prop_assert_eq!(off.total_fees, start);
            prop_assert!(!off.selection.contains(&course.title));
        }

        #[test]
        fn total_tracks_selected_prices(
            (catalogue, toggles) in catalogue_strategy()
                .prop_flat_map(|c| { let len = c.len(); (Just(c), toggle_sequence_strategy(len)) })
        ) {
            let mut plan = FeePlan::new(Currency::INR);
            for index in toggles {
                plan = plan.toggle_course(&catalogue[index]).unwrap();
            }

            let selected = CourseFeeAggregator::resolve(plan.courses(), &catalogue);
            let expected = CourseFeeAggregator::sum_prices(selected, Currency::INR).unwrap();
            let actual = plan.total_fees().unwrap_or_else(|| Money::zero(Currency::INR));
            prop_assert_eq!(actual.amount(), expected.amount());
        }
    }
}

// ============================================================================
// Fee Plan Tests
// ============================================================================

mod fee_plan_tests {
    use super::*;

    #[test]
    fn test_full_installment_plan_is_balanced() {
        let plan = FeePlanBuilder::new()
            .with_course(CourseFixtures::python())
            .with_option(PaymentOption::PayInInstallments)
            .with_first_installment(dec!(5000))
            .with_due_date(InstallmentSlot::First, DateFixtures::first_due())
            .with_due_date(InstallmentSlot::Second, DateFixtures::second_due())
            .with_due_date(InstallmentSlot::Third, DateFixtures::third_due())
            .build();

        let schedule = plan.installments().unwrap();
        assert_schedule_balanced(schedule, &plan.total_fees().unwrap());
        assert_fixed2(&schedule.second().amount.unwrap(), "3500.00");
        assert_eq!(schedule.third().due_date, Some(DateFixtures::third_due()));
    }

    #[test]
    fn test_total_override_does_not_recompute_installments() {
        let plan = FeePlanBuilder::new()
            .with_total(dec!(9000))
            .with_option(PaymentOption::PayInInstallments)
            .with_first_installment(dec!(3000))
            .build()
            .set_total_fees(MoneyFixtures::inr(dec!(12000)))
            .unwrap();

        let schedule = plan.installments().unwrap();
        assert_fixed2(&schedule.second().amount.unwrap(), "3000.00");
    }

    #[test]
    fn test_due_dates_kept_when_first_changes() {
        let plan = FeePlanBuilder::new()
            .with_total(dec!(9000))
            .with_option(PaymentOption::PayInInstallments)
            .with_first_installment(dec!(3000))
            .with_due_date(InstallmentSlot::Second, DateFixtures::second_due())
            .build()
            .set_first_installment(MoneyFixtures::inr(dec!(1000)))
            .unwrap();

        let schedule = plan.installments().unwrap();
        assert_eq!(schedule.second().due_date, Some(DateFixtures::second_due()));
        assert_fixed2(&schedule.second().amount.unwrap(), "4000.00");
    }

    #[test]
    fn test_advance_remaining_balance() {
        let plan = FeePlanBuilder::new()
            .with_total(dec!(10000))
            .with_option(PaymentOption::PaymentInAdvance)
            .with_advance(dec!(4000))
            .build();

        let remaining = plan.remaining_balance().unwrap().unwrap();
        assert_fixed2(&remaining, "6000.00");
    }

    #[test]
    fn test_advance_above_total_leaves_zero_balance() {
        let plan = FeePlanBuilder::new()
            .with_total(dec!(1000))
            .with_option(PaymentOption::PaymentInAdvance)
            .with_advance(dec!(1500))
            .build();

        assert_money_zero(&plan.remaining_balance().unwrap().unwrap());
    }

    #[test]
    fn test_advance_requires_advance_option() {
        let plan = FeePlanBuilder::new().with_total(dec!(1000)).build();
        assert_eq!(
            plan.set_advance_payment(MoneyFixtures::inr(dec!(10))),
            Err(FeeError::WrongPaymentOption {
                expected: PaymentOption::PaymentInAdvance
            })
        );
    }

    #[test]
    fn test_negative_total_is_rejected() {
        let plan = FeePlan::new(Currency::INR);
        assert_eq!(
            plan.set_total_fees(MoneyFixtures::inr(dec!(-5))),
            Err(FeeError::NegativeAmount(dec!(-5)))
        );
    }

    #[test]
    fn test_plan_without_total_treats_first_against_zero() {
        let plan = FeePlan::new(Currency::INR).set_payment_option(PaymentOption::PayInInstallments);
        assert!(matches!(
            plan.set_first_installment(MoneyFixtures::inr(dec!(1))),
            Err(FeeError::FirstInstallmentExceedsTotal { .. })
        ));
    }

    #[test]
    fn test_odd_remainder_is_within_a_cent() {
        let plan = FeePlanBuilder::new()
            .with_total(dec!(1000))
            .with_option(PaymentOption::PayInInstallments)
            .with_first_installment(dec!(333.33))
            .build();

        let schedule = plan.installments().unwrap();
        let sum = schedule.scheduled_total(&plan.total_fees().unwrap()).unwrap();
        assert_money_approx_eq(&sum, &MoneyFixtures::inr(dec!(1000)), dec!(0.01));
        assert!(schedule.is_balanced(&plan.total_fees().unwrap()));
    }
}
