//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use core_kernel::{AcademicPeriod, ClassId, CollectorId, FeeRecordId, FeeTypeId, Money, SchoolId, StudentId};
use domain_fees::{CollectorRef, FeeRecord, FeeType, PaymentStatus, Student};

use crate::fixtures::PeriodFixtures;

/// Builder for catalog fee types
pub struct FeeTypeBuilder {
    fee_type: FeeType,
}

impl FeeTypeBuilder {
    /// Creates a flat 100.00 fee named `name`
    pub fn new(school_id: SchoolId, name: &str) -> Self {
        Self {
            fee_type: FeeType::new(school_id, name, Money::from_major(100)),
        }
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.fee_type.amount = amount;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.fee_type = self.fee_type.with_due_date(due_date);
        self
    }

    /// Restricts the fee to `classes`
    pub fn for_classes(mut self, classes: &[ClassId]) -> Self {
        self.fee_type = self.fee_type.for_classes(classes.iter().copied());
        self
    }

    pub fn with_class_price(mut self, class_id: ClassId, amount: Money) -> Self {
        self.fee_type = self.fee_type.with_class_price(class_id, amount);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.fee_type = self.fee_type.deactivate();
        self
    }

    pub fn build(self) -> FeeType {
        self.fee_type
    }
}

/// Builder for stored fee records
///
/// Bypasses payment validation, so it can produce records a recorder would
/// never write (orphans, overpayments from legacy data).
pub struct FeeRecordBuilder {
    record: FeeRecord,
}

impl FeeRecordBuilder {
    /// A fully paid 100.00 record for `student` and `fee_type_id`
    pub fn new(school_id: SchoolId, student_id: StudentId, fee_type_id: FeeTypeId) -> Self {
        Self {
            record: FeeRecord {
                id: FeeRecordId::new(),
                school_id,
                student_id,
                fee_type_id,
                amount: Money::from_major(100),
                paid: Money::from_major(100),
                due_date: None,
                status: PaymentStatus::Paid,
                period: PeriodFixtures::spring_2025(),
                collector: CollectorRef::teacher(CollectorId::new()),
                created_at: Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
            },
        }
    }

    /// Record against a catalog fee type, snapshotting its amount and due date
    pub fn for_fee_type(school_id: SchoolId, student: &Student, fee_type: &FeeType) -> Self {
        let mut builder = Self::new(school_id, student.id, fee_type.id);
        builder.record.amount = fee_type.amount;
        builder.record.paid = fee_type.amount;
        builder.record.due_date = fee_type.due_date;
        builder
    }

    /// Sets both the full amount and the paid amount; status follows
    pub fn amounts(mut self, amount: Money, paid: Money) -> Self {
        self.record.amount = amount;
        self.record.paid = paid;
        self.record.status = PaymentStatus::from_amounts(paid, amount);
        self
    }

    pub fn paid(self, paid: Money) -> Self {
        let amount = self.record.amount;
        self.amounts(amount, paid)
    }

    pub fn in_period(mut self, period: AcademicPeriod) -> Self {
        self.record.period = period;
        self
    }

    pub fn collected_by(mut self, collector: CollectorRef) -> Self {
        self.record.collector = collector;
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.record.due_date = Some(due_date);
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.record.created_at = created_at;
        self
    }

    /// Shifts the timestamp forward, for ordering several records
    pub fn minutes_later(mut self, minutes: i64) -> Self {
        self.record.created_at += Duration::minutes(minutes);
        self
    }

    pub fn build(self) -> FeeRecord {
        self.record
    }
}
