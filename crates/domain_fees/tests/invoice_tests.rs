//! Tests for invoice projection from backend records

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{Currency, DateLocale};
use domain_fees::{
    EnrollmentRecord, FeeError, InstallmentSlot, InvoiceProjector, PaymentMode, PaymentOption,
    PaymentPlanSummary, PENDING_INVOICE_NO, REFERRAL_DISCOUNT_LABEL,
};
use test_utils::{assert_remaining_balance, DateFixtures, EnrollmentRecordBuilder, RecordJsonFixtures};

mod line_item_tests {
    use super::*;

    #[test]
    fn test_referral_discount_line() {
        let record = EnrollmentRecordBuilder::student()
            .with_course("Python")
            .with_total_fees(dec!(10000))
            .with_original_fees(dec!(12000))
            .with_referral(dec!(2000))
            .with_payment_mode(PaymentMode::UPI)
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();

        assert_eq!(invoice.payment_mode, Some(PaymentMode::UPI));
        assert_eq!(invoice.line_items.len(), 2);
        assert_eq!(invoice.line_items[0].description, "Python");
        assert_eq!(invoice.line_items[0].amount.amount(), dec!(12000));
        assert_eq!(invoice.line_items[1].description, REFERRAL_DISCOUNT_LABEL);
        assert_eq!(invoice.line_items[1].amount.amount(), dec!(-2000));
        assert_eq!(invoice.total_payable.amount(), dec!(10000));
        assert_eq!(invoice.referral_discount.unwrap().amount(), dec!(2000));
    }

    #[test]
    fn test_total_is_not_recomputed_from_lines() {
        let record = EnrollmentRecordBuilder::new()
            .with_course("Python")
            .with_total_fees(dec!(9500))
            .with_original_fees(dec!(12000))
            .with_referral(dec!(2000))
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();

        assert_eq!(invoice.total_payable.amount(), dec!(9500));
        assert_eq!(invoice.line_total().unwrap().amount(), dec!(10000));
    }

    #[test]
    fn test_list_price_falls_back_to_total() {
        let record = EnrollmentRecordBuilder::new()
            .with_course("Java")
            .with_batch("Weekend")
            .with_total_fees(dec!(8000))
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert_eq!(invoice.line_items[0].description, "Java (Weekend)");
        assert_eq!(invoice.line_items[0].amount.amount(), dec!(8000));
    }

    #[test]
    fn test_negative_referral_is_rejected() {
        let record = EnrollmentRecordBuilder::new()
            .with_total_fees(dec!(8000))
            .with_referral(dec!(-10))
            .build();

        assert_eq!(
            DateFixtures::projector().project(&record),
            Err(FeeError::NegativeAmount(dec!(-10)))
        );
    }
}

mod resolution_tests {
    use super::*;

    #[test]
    fn test_pending_invoice_number() {
        let record = EnrollmentRecordBuilder::new().with_total_fees(dec!(100)).build();
        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert_eq!(invoice.invoice_no, PENDING_INVOICE_NO);
        assert_eq!(invoice.invoice_no, "INV-PENDING");
    }

    #[test]
    fn test_record_invoice_number_wins() {
        let record = EnrollmentRecordBuilder::new()
            .with_total_fees(dec!(100))
            .with_invoice_no("INV-001")
            .with_nested_invoice(Some("INV-002"), None)
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert_eq!(invoice.invoice_no, "INV-001");
    }

    #[test]
    fn test_nested_invoice_number_and_date() {
        let created = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let record = EnrollmentRecordBuilder::new()
            .with_total_fees(dec!(100))
            .with_nested_invoice(Some("INV-002"), Some(created))
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert_eq!(invoice.invoice_no, "INV-002");
        assert_eq!(invoice.invoice_date, created);
    }

    #[test]
    fn test_record_invoice_date_wins() {
        let dated = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let record = EnrollmentRecordBuilder::new()
            .with_total_fees(dec!(100))
            .with_invoice_date(dated)
            .with_nested_invoice(None, NaiveDate::from_ymd_opt(2024, 2, 1))
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert_eq!(invoice.invoice_date, dated);
        assert_eq!(invoice.invoice_date_display, "5/1/2024");
    }

    #[test]
    fn test_date_display_follows_locale() {
        let record = EnrollmentRecordBuilder::new().with_total_fees(dec!(100)).build();
        let projector = InvoiceProjector::new(
            Currency::INR,
            DateLocale::parse("de-DE").unwrap(),
            DateFixtures::today(),
        );

        let invoice = projector.project(&record).unwrap();
        assert_eq!(invoice.invoice_date_display, "15.03.2024");
    }

    #[test]
    fn test_absent_record_is_skipped() {
        assert!(DateFixtures::projector().project_optional(None).is_none());

        let record = EnrollmentRecordBuilder::new().build();
        let result = DateFixtures::projector().project_optional(Some(&record));
        assert_eq!(result, Some(Err(FeeError::MissingTotalFees)));
    }
}

mod payment_plan_tests {
    use super::*;

    #[test]
    fn test_advance_remaining_balance() {
        let record = EnrollmentRecordBuilder::new()
            .with_payment_option(PaymentOption::PaymentInAdvance)
            .with_total_fees(dec!(10000))
            .with_advance(dec!(4000))
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert_remaining_balance(&invoice, "6000.00");
    }

    #[test]
    fn test_advance_above_total_is_clamped() {
        let record = EnrollmentRecordBuilder::new()
            .with_payment_option(PaymentOption::PaymentInAdvance)
            .with_total_fees(dec!(3000))
            .with_advance(dec!(4000))
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert_remaining_balance(&invoice, "0.00");
    }

    #[test]
    fn test_advance_without_amount_has_no_balance() {
        let record = EnrollmentRecordBuilder::new()
            .with_payment_option(PaymentOption::PaymentInAdvance)
            .with_total_fees(dec!(3000))
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert!(invoice.remaining_balance_display().is_none());
    }

    #[test]
    fn test_installments_copied_verbatim() {
        let record = EnrollmentRecordBuilder::new()
            .with_payment_option(PaymentOption::PayInInstallments)
            .with_total_fees(dec!(9000))
            .with_installment(InstallmentSlot::First, dec!(4000), DateFixtures::first_due())
            .with_installment(InstallmentSlot::Second, dec!(1000), DateFixtures::second_due())
            .with_installment(InstallmentSlot::Third, dec!(1000), DateFixtures::third_due())
            .build();

        let invoice = DateFixtures::projector().project(&record).unwrap();
        match invoice.payment_plan {
            PaymentPlanSummary::Installments(installments) => {
                assert_eq!(installments[0].amount.unwrap().amount(), dec!(4000));
                assert_eq!(installments[1].amount.unwrap().amount(), dec!(1000));
                assert_eq!(installments[2].due_date, Some(DateFixtures::third_due()));
            }
            other => panic!("expected installments, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_option_is_unspecified() {
        let record = EnrollmentRecordBuilder::new().with_total_fees(dec!(100)).build();
        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert_eq!(invoice.payment_plan, PaymentPlanSummary::Unspecified(None));
    }
}

mod backend_json_tests {
    use super::*;

    #[test]
    fn test_projects_backend_admission() {
        let record: EnrollmentRecord =
            serde_json::from_value(RecordJsonFixtures::installment_admission()).unwrap();

        assert_eq!(record.id.as_deref(), Some("6650f1c2a9e4b0017c3d2e42"));
        assert_eq!(record.payment_mode, Some(PaymentMode::UPI));
        assert_eq!(record.course_selection().titles(), ["Python", "Data Science"]);

        let invoice = DateFixtures::projector().project(&record).unwrap();
        assert_eq!(invoice.invoice_no, "INV-2024-0042");
        assert_eq!(invoice.invoice_date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
        assert_eq!(invoice.bill_to.contact.as_deref(), Some("9876543210"));
        assert_eq!(invoice.line_items[0].description, "Python, Data Science (Evening)");
        assert_eq!(invoice.total_payable.amount(), dec!(37000));

        let printed = invoice.to_string();
        assert!(printed.contains("Invoice INV-2024-0042"));
        assert!(printed.contains("Installment 1"));
        assert!(printed.contains("2024-04-01"));
    }
}
