//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating ledger inputs that keep the
//! catalog and payment invariants.

use core_kernel::{AcademicPeriod, ClassId, Money, SchoolId};
use domain_fees::{FeeType, Student};
use proptest::prelude::*;

/// Strategy for fee amounts between 0.01 and 10,000.00
pub fn fee_amount_strategy() -> impl Strategy<Value = Money> {
    (1i64..1_000_000i64).prop_map(Money::from_minor)
}

/// Strategy for a fee amount together with a payment in `(0, amount]`
pub fn amount_and_payment_strategy() -> impl Strategy<Value = (Money, Money)> {
    (1i64..1_000_000i64).prop_flat_map(|amount| {
        (Just(Money::from_minor(amount)), (1i64..=amount).prop_map(Money::from_minor))
    })
}

/// Strategy for an amount split into instalments that sum to it
pub fn instalments_strategy() -> impl Strategy<Value = (Money, Vec<Money>)> {
    prop::collection::vec(1i64..50_000i64, 1..6).prop_map(|parts| {
        let total: i64 = parts.iter().sum();
        (
            Money::from_minor(total),
            parts.into_iter().map(Money::from_minor).collect(),
        )
    })
}

/// Strategy for `<year> <term>` period labels
pub fn period_strategy() -> impl Strategy<Value = AcademicPeriod> {
    (2015i32..2035i32, prop_oneof![Just("Winter"), Just("Spring"), Just("Summer"), Just("Fall")])
        .prop_map(|(year, term)| {
            AcademicPeriod::new(format!("{} {}", year, term)).expect("non-empty label")
        })
}

/// Strategy for student display names
pub fn student_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10} [A-Z][a-z]{2,12}"
}

/// Strategy for a class roster of 0 to 30 students
pub fn roster_strategy(class_id: ClassId) -> impl Strategy<Value = Vec<Student>> {
    prop::collection::vec(student_name_strategy(), 0..30).prop_map(move |names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Student::new(class_id, name, format!("S-{:04}", i + 1)))
            .collect()
    })
}

/// Strategy for a flat catalog of 1 to 5 active fee types
pub fn flat_catalog_strategy(school_id: SchoolId) -> impl Strategy<Value = Vec<FeeType>> {
    prop::collection::vec(fee_amount_strategy(), 1..5).prop_map(move |amounts| {
        amounts
            .into_iter()
            .enumerate()
            .map(|(i, amount)| FeeType::new(school_id, format!("Fee {}", i + 1), amount))
            .collect()
    })
}
