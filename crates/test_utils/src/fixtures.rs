//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the fee engine. These fixtures are
//! consistent and predictable so tests can assert exact figures.

use chrono::NaiveDate;
use core_kernel::{AdmissionId, CourseId, Currency, DateLocale, EnquiryId, Money};
use domain_fees::{InvoiceProjector, SelectedCourse, StudentIdentity};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates an INR amount
    pub fn inr(amount: Decimal) -> Money {
        Money::new(amount, Currency::INR)
    }

    /// Typical course fee
    pub fn inr_10000() -> Money {
        Self::inr(dec!(10000))
    }

    /// Creates a zero amount
    pub fn inr_zero() -> Money {
        Money::zero(Currency::INR)
    }

    /// Creates a USD amount for currency mismatch tests
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }
}

/// Fixture for the course catalogue
pub struct CourseFixtures;

impl CourseFixtures {
    fn course(id: &str, title: &str, price: Decimal) -> SelectedCourse {
        SelectedCourse::new(
            CourseId::new(id).unwrap(),
            title,
            MoneyFixtures::inr(price),
        )
        .unwrap()
    }

    pub fn python() -> SelectedCourse {
        Self::course("course-python", "Python", dec!(12000))
    }

    pub fn data_science() -> SelectedCourse {
        Self::course("course-ds", "Data Science", dec!(25000))
    }

    pub fn web_development() -> SelectedCourse {
        Self::course("course-web", "Web Development", dec!(18000.50))
    }

    /// Free orientation course
    pub fn orientation() -> SelectedCourse {
        Self::course("course-orientation", "Orientation", dec!(0))
    }

    /// The full catalogue in listing order
    pub fn catalogue() -> Vec<SelectedCourse> {
        vec![
            Self::python(),
            Self::data_science(),
            Self::web_development(),
            Self::orientation(),
        ]
    }
}

/// Fixture for dates
pub struct DateFixtures;

impl DateFixtures {
    /// Date used as "today" by projectors in tests (Mar 15, 2024)
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    pub fn first_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    pub fn second_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    pub fn third_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// Projector in INR, en-IN, dated `today()`
    pub fn projector() -> InvoiceProjector {
        InvoiceProjector::new(Currency::INR, DateLocale::default(), Self::today())
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn enquiry_id() -> EnquiryId {
        EnquiryId::new("6650f1c2a9e4b0017c3d2e11").unwrap()
    }

    pub fn admission_id() -> AdmissionId {
        AdmissionId::new("6650f1c2a9e4b0017c3d2e42").unwrap()
    }
}

/// Fixture for students
pub struct StudentFixtures;

impl StudentFixtures {
    /// A fixed, valid student
    pub fn asha() -> StudentIdentity {
        StudentIdentity::new("Asha Verma", "asha.verma@example.com", "9876543210")
    }

    /// A random, valid student
    pub fn random() -> StudentIdentity {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        let contact: String = NumberWithFormat("98########").fake();
        StudentIdentity::new(name, email, contact)
    }
}

/// Fixture for raw backend JSON
pub struct RecordJsonFixtures;

impl RecordJsonFixtures {
    /// An admission paid in installments, as the backend sends it
    pub fn installment_admission() -> serde_json::Value {
        serde_json::json!({
            "_id": "6650f1c2a9e4b0017c3d2e42",
            "fullName": "Asha Verma",
            "email": "asha.verma@example.com",
            "contactNumber": "9876543210",
            "address": "12 MG Road, Pune",
            "preferredCourses": "Python, Data Science",
            "batchTiming": "Evening",
            "totalFees": "37000",
            "paymentMode": "UPI",
            "paymentOption": "PayInInstallments",
            "installment1Amount": 17000,
            "installment1Date": "2024-04-01T00:00:00.000Z",
            "installment2Amount": "10000.00",
            "installment2Date": "2024-05-01",
            "installment3Amount": "10000.00",
            "installment3Date": "2024-06-01",
            "enrollments": [
                { "payments": [ { "invoice": { "invoiceNo": "INV-2024-0042", "createdAt": "2024-03-20T09:30:00.000Z" } } ] }
            ]
        })
    }
}
