//! Status aggregation
//!
//! Derives per-student and per-class payment status from the raw record set.
//! Nothing here is cached: every call works from the records it is handed.
//!
//! Records are grouped by fee type name, with records whose fee type left
//! the catalog sharing one `Unknown` group. A group with records owes the
//! amount snapshotted on its first record; a catalog fee type nobody has
//! paid yet owes the student's resolved amount. Fee types that resolve to
//! zero for the student's class are left out entirely.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use core_kernel::{AcademicPeriod, ClassId, FeeTypeId, Money, StudentId};

use crate::catalog::{FeeCatalog, FeeType};
use crate::record::{FeeRecord, PaymentStatus};
use crate::resolver::FeeResolver;
use crate::school::Student;

/// Label used wherever a referenced entity cannot be found
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Overall fee status of a student in one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentFeeStatus {
    None,
    Partial,
    Full,
}

impl StudentFeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentFeeStatus::None => "none",
            StudentFeeStatus::Partial => "partial",
            StudentFeeStatus::Full => "full",
        }
    }
}

impl fmt::Display for StudentFeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summed position of one fee type for one student and period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBalance {
    pub fee_type_id: FeeTypeId,
    pub fee_type_name: String,
    /// Snapshot from the group's first record, or the resolved amount while
    /// nothing has been paid
    pub amount: Money,
    pub paid: Money,
    pub outstanding: Money,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub in_catalog: bool,
}

impl FeeBalance {
    fn open(fee_type_id: FeeTypeId, name: String, amount: Money, due_date: Option<NaiveDate>, in_catalog: bool) -> Self {
        Self {
            fee_type_id,
            fee_type_name: name,
            amount,
            paid: Money::zero(),
            outstanding: amount,
            status: PaymentStatus::Unpaid,
            due_date,
            in_catalog,
        }
    }

    // The first record fixes what the group owes.
    fn adopt_snapshot(&mut self, record: &FeeRecord) {
        self.amount = record.amount;
        self.due_date = record.due_date.or(self.due_date);
    }

    fn apply(&mut self, paid: Money) {
        self.paid += paid;
        self.outstanding = (self.amount - self.paid).non_negative();
        self.status = PaymentStatus::from_amounts(self.paid, self.amount);
    }

    pub fn is_fully_paid(&self) -> bool {
        self.paid >= self.amount
    }

    /// Something is still owed and the due date has passed
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.outstanding.is_positive() && self.due_date.map_or(false, |due| due < as_of)
    }
}

/// Collection figures for one class in one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStatistics {
    pub class_id: ClassId,
    pub period: AcademicPeriod,
    pub student_count: usize,
    /// Planned revenue at list price
    pub total_fees: Money,
    pub total_collected: Money,
    /// `total_fees - total_collected`; negative when more was collected than
    /// the nominal plan
    pub pending_amount: Money,
    /// Whole percentage, 0 when there is nothing to collect
    pub payment_rate: i64,
}

/// One student's line in a class breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStatusRow {
    pub student_id: StudentId,
    pub name: String,
    pub code: String,
    pub status: StudentFeeStatus,
    pub total_paid: Money,
    pub outstanding: Money,
}

/// Per-student statuses of a class with headcounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStatusBreakdown {
    pub class_id: ClassId,
    pub period: AcademicPeriod,
    pub rows: Vec<StudentStatusRow>,
    pub full_count: usize,
    pub partial_count: usize,
    pub none_count: usize,
}

/// Stateless aggregation over fee records
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusAggregator;

impl StatusAggregator {
    /// Per-fee-type balances of `student` in `period`
    ///
    /// Catalog fee types come first, in catalog order, followed by names
    /// only seen on records, in record order. Same-named fee types share a
    /// group. Records of other students or periods are ignored.
    pub fn fee_balances(
        student: &Student,
        period: &AcademicPeriod,
        catalog: &FeeCatalog,
        records: &[FeeRecord],
    ) -> Vec<FeeBalance> {
        let mut balances: Vec<FeeBalance> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();
        let mut recorded: HashSet<usize> = HashSet::new();

        for fee_type in catalog.applicable_to(student.class_id) {
            let amount = FeeResolver::resolve_amount(student, fee_type);
            if !amount.is_positive() || position.contains_key(&fee_type.name) {
                continue;
            }
            position.insert(fee_type.name.clone(), balances.len());
            balances.push(FeeBalance::open(
                fee_type.id,
                fee_type.name.clone(),
                amount,
                fee_type.due_date,
                true,
            ));
        }

        let relevant = records
            .iter()
            .filter(|r| r.student_id == student.id && &r.period == period);

        for record in relevant {
            let Some((name, in_catalog)) = Self::group_name(student, catalog, record) else {
                continue;
            };
            let index = match position.get(name) {
                Some(&index) => index,
                None => {
                    position.insert(name.to_string(), balances.len());
                    balances.push(FeeBalance::open(
                        record.fee_type_id,
                        name.to_string(),
                        record.amount,
                        record.due_date,
                        in_catalog,
                    ));
                    balances.len() - 1
                }
            };
            if recorded.insert(index) {
                balances[index].adopt_snapshot(record);
            }
            balances[index].apply(record.paid);
        }

        balances
    }

    // Name of the group a record belongs to, and whether its fee type is
    // still in the catalog. `None` when the fee type resolves to zero.
    fn group_name<'c>(student: &Student, catalog: &'c FeeCatalog, record: &FeeRecord) -> Option<(&'c str, bool)> {
        match catalog.get(&record.fee_type_id) {
            Some(fee_type) => FeeResolver::resolve_amount(student, fee_type)
                .is_positive()
                .then_some((fee_type.name.as_str(), true)),
            None => Some((UNKNOWN_LABEL, false)),
        }
    }

    /// Classifies a set of balances
    ///
    /// `Full` needs at least one group and every group fully paid. Any money
    /// paid short of that is `Partial`.
    pub fn status_of(balances: &[FeeBalance]) -> StudentFeeStatus {
        if balances.is_empty() {
            return StudentFeeStatus::None;
        }
        if balances.iter().all(FeeBalance::is_fully_paid) {
            StudentFeeStatus::Full
        } else if balances.iter().any(|b| b.paid.is_positive()) {
            StudentFeeStatus::Partial
        } else {
            StudentFeeStatus::None
        }
    }

    /// Overall status of `student` in `period`
    pub fn student_fee_status(
        student: &Student,
        period: &AcademicPeriod,
        catalog: &FeeCatalog,
        records: &[FeeRecord],
    ) -> StudentFeeStatus {
        Self::status_of(&Self::fee_balances(student, period, catalog, records))
    }

    /// Collection statistics for a class
    ///
    /// `total_fees` multiplies each fee type's nominal amount by the class
    /// size, so class overrides are deliberately not reflected in it.
    /// Students outside `class_id` and records outside `period` are ignored.
    pub fn class_statistics(
        class_id: ClassId,
        period: &AcademicPeriod,
        fee_types: &[FeeType],
        students: &[Student],
        records: &[FeeRecord],
    ) -> ClassStatistics {
        let members: HashSet<StudentId> = students
            .iter()
            .filter(|s| s.class_id == class_id)
            .map(|s| s.id)
            .collect();
        let student_count = members.len();

        let total_fees: Money = fee_types.iter().map(|f| f.amount.times(student_count)).sum();
        let total_collected: Money = records
            .iter()
            .filter(|r| &r.period == period && members.contains(&r.student_id))
            .map(|r| r.paid)
            .sum();

        ClassStatistics {
            class_id,
            period: period.clone(),
            student_count,
            total_fees,
            total_collected,
            pending_amount: total_fees - total_collected,
            payment_rate: total_collected.percentage_of(total_fees).unwrap_or(0),
        }
    }

    /// Status of every student of a class, in roster order
    pub fn class_status_breakdown(
        class_id: ClassId,
        period: &AcademicPeriod,
        catalog: &FeeCatalog,
        students: &[Student],
        records: &[FeeRecord],
    ) -> ClassStatusBreakdown {
        let mut breakdown = ClassStatusBreakdown {
            class_id,
            period: period.clone(),
            rows: Vec::new(),
            full_count: 0,
            partial_count: 0,
            none_count: 0,
        };

        for student in students.iter().filter(|s| s.class_id == class_id) {
            let balances = Self::fee_balances(student, period, catalog, records);
            let status = Self::status_of(&balances);
            match status {
                StudentFeeStatus::Full => breakdown.full_count += 1,
                StudentFeeStatus::Partial => breakdown.partial_count += 1,
                StudentFeeStatus::None => breakdown.none_count += 1,
            }
            breakdown.rows.push(StudentStatusRow {
                student_id: student.id,
                name: student.name.clone(),
                code: student.code.clone(),
                status,
                total_paid: balances.iter().map(|b| b.paid).sum(),
                outstanding: balances.iter().map(|b| b.outstanding).sum(),
            });
        }

        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewFeeRecord;
    use crate::school::CollectorRef;
    use chrono::Utc;
    use core_kernel::{CollectorId, SchoolId};

    fn period(label: &str) -> AcademicPeriod {
        AcademicPeriod::new(label).unwrap()
    }

    fn paid(student: &Student, fee: &FeeType, amount: Money, paid: i64, label: &str) -> FeeRecord {
        NewFeeRecord {
            school_id: fee.school_id,
            student_id: student.id,
            fee_type_id: fee.id,
            amount,
            paid: Money::from_major(paid),
            due_date: fee.due_date,
            status: PaymentStatus::from_amounts(Money::from_major(paid), amount),
            period: period(label),
            collector: CollectorRef::admin(CollectorId::new()),
        }
        .into_record(Utc::now())
    }

    struct Setup {
        class_a: ClassId,
        tuition: FeeType,
        books: FeeType,
        student: Student,
    }

    fn setup() -> Setup {
        let school = SchoolId::new();
        let class_a = ClassId::new();
        Setup {
            class_a,
            tuition: FeeType::new(school, "Tuition", Money::from_major(100)),
            books: FeeType::new(school, "Books", Money::from_major(50)),
            student: Student::new(class_a, "Ada", "R-01"),
        }
    }

    fn catalog(s: &Setup) -> FeeCatalog {
        FeeCatalog::new(vec![s.tuition.clone(), s.books.clone()])
    }

    #[test]
    fn test_no_records_is_none() {
        let s = setup();
        let status = StatusAggregator::student_fee_status(&s.student, &period("2025 Spring"), &catalog(&s), &[]);
        assert_eq!(status, StudentFeeStatus::None);
    }

    #[test]
    fn test_one_fee_paid_other_missing_is_partial_then_full() {
        let s = setup();
        let spring = period("2025 Spring");
        let mut records = vec![paid(&s.student, &s.tuition, s.tuition.amount, 100, "2025 Spring")];
        assert_eq!(
            StatusAggregator::student_fee_status(&s.student, &spring, &catalog(&s), &records),
            StudentFeeStatus::Partial
        );

        records.push(paid(&s.student, &s.books, s.books.amount, 50, "2025 Spring"));
        assert_eq!(
            StatusAggregator::student_fee_status(&s.student, &spring, &catalog(&s), &records),
            StudentFeeStatus::Full
        );
    }

    #[test]
    fn test_instalments_are_summed() {
        let s = setup();
        let spring = period("2025 Spring");
        let records = vec![
            paid(&s.student, &s.tuition, s.tuition.amount, 60, "2025 Spring"),
            paid(&s.student, &s.tuition, s.tuition.amount, 40, "2025 Spring"),
        ];
        let balances = StatusAggregator::fee_balances(&s.student, &spring, &catalog(&s), &records);

        assert_eq!(balances[0].paid, Money::from_major(100));
        assert_eq!(balances[0].status, PaymentStatus::Paid);
        assert_eq!(balances[1].status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_other_periods_are_ignored() {
        let s = setup();
        let records = vec![paid(&s.student, &s.tuition, s.tuition.amount, 100, "2024 Fall")];
        let status = StatusAggregator::student_fee_status(&s.student, &period("2025 Spring"), &catalog(&s), &records);
        assert_eq!(status, StudentFeeStatus::None);
    }

    #[test]
    fn test_inapplicable_fee_does_not_affect_status() {
        let mut s = setup();
        s.books = s.books.clone().for_classes([ClassId::new()]);
        let records = vec![paid(&s.student, &s.tuition, s.tuition.amount, 100, "2025 Spring")];
        let balances = StatusAggregator::fee_balances(&s.student, &period("2025 Spring"), &catalog(&s), &records);

        assert_eq!(balances.len(), 1);
        assert_eq!(StatusAggregator::status_of(&balances), StudentFeeStatus::Full);
    }

    #[test]
    fn test_orphan_record_uses_snapshot_and_unknown_label() {
        let s = setup();
        let removed = FeeType::new(s.tuition.school_id, "Trip", Money::from_major(30));
        let records = vec![paid(&s.student, &removed, removed.amount, 10, "2025 Spring")];
        let balances = StatusAggregator::fee_balances(&s.student, &period("2025 Spring"), &catalog(&s), &records);

        let orphan = balances.iter().find(|b| b.fee_type_id == removed.id).unwrap();
        assert_eq!(orphan.fee_type_name, UNKNOWN_LABEL);
        assert_eq!(orphan.amount, Money::from_major(30));
        assert_eq!(orphan.outstanding, Money::from_major(20));
        assert!(!orphan.in_catalog);
    }

    #[test]
    fn test_same_named_fee_types_share_a_group() {
        let s = setup();
        let second_tuition = FeeType::new(s.tuition.school_id, "Tuition", Money::from_major(100));
        let catalog = FeeCatalog::new(vec![s.tuition.clone(), second_tuition]);
        let records = vec![paid(&s.student, &s.tuition, s.tuition.amount, 100, "2025 Spring")];

        let balances = StatusAggregator::fee_balances(&s.student, &period("2025 Spring"), &catalog, &records);

        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].fee_type_name, "Tuition");
        assert_eq!(StatusAggregator::status_of(&balances), StudentFeeStatus::Full);
    }

    #[test]
    fn test_repriced_fee_keeps_record_snapshot() {
        let mut s = setup();
        let records = vec![paid(&s.student, &s.tuition, s.tuition.amount, 100, "2025 Spring")];
        s.tuition.amount = Money::from_major(120);
        let catalog = FeeCatalog::new(vec![s.tuition.clone()]);

        let balances = StatusAggregator::fee_balances(&s.student, &period("2025 Spring"), &catalog, &records);

        assert_eq!(balances[0].amount, Money::from_major(100));
        assert_eq!(balances[0].outstanding, Money::zero());
        assert_eq!(StatusAggregator::status_of(&balances), StudentFeeStatus::Full);

        let unpaid = StatusAggregator::fee_balances(&s.student, &period("2025 Fall"), &catalog, &records);
        assert_eq!(unpaid[0].amount, Money::from_major(120));
    }

    #[test]
    fn test_orphans_share_the_unknown_group() {
        let s = setup();
        let trip = FeeType::new(s.tuition.school_id, "Trip", Money::from_major(30));
        let camp = FeeType::new(s.tuition.school_id, "Camp", Money::from_major(80));
        let records = vec![
            paid(&s.student, &trip, trip.amount, 10, "2025 Spring"),
            paid(&s.student, &camp, camp.amount, 15, "2025 Spring"),
        ];

        let balances = StatusAggregator::fee_balances(&s.student, &period("2025 Spring"), &catalog(&s), &records);
        let unknown: Vec<&FeeBalance> = balances.iter().filter(|b| b.fee_type_name == UNKNOWN_LABEL).collect();

        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].paid, Money::from_major(25));
        assert_eq!(unknown[0].amount, Money::from_major(30));
    }

    #[test]
    fn test_overdue_requires_outstanding_and_past_due() {
        let mut s = setup();
        let due = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        s.tuition = s.tuition.clone().with_due_date(due);
        let balances = StatusAggregator::fee_balances(&s.student, &period("2025 Spring"), &catalog(&s), &[]);

        assert!(balances[0].is_overdue(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()));
        assert!(!balances[0].is_overdue(due));
        assert!(!balances[1].is_overdue(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }

    #[test]
    fn test_class_statistics_reconcile_without_overrides() {
        let s = setup();
        let spring = period("2025 Spring");
        let other = Student::new(s.class_a, "Grace", "R-02");
        let records = vec![
            paid(&s.student, &s.tuition, s.tuition.amount, 100, "2025 Spring"),
            paid(&other, &s.books, s.books.amount, 20, "2025 Spring"),
        ];
        let stats = StatusAggregator::class_statistics(
            s.class_a,
            &spring,
            &[s.tuition.clone(), s.books.clone()],
            &[s.student.clone(), other],
            &records,
        );

        assert_eq!(stats.student_count, 2);
        assert_eq!(stats.total_fees, Money::from_major(300));
        assert_eq!(stats.total_collected, Money::from_major(120));
        assert_eq!(stats.total_collected + stats.pending_amount, stats.total_fees);
        assert_eq!(stats.payment_rate, 40);
    }

    #[test]
    fn test_class_statistics_empty_catalog_rate_is_zero() {
        let s = setup();
        let stats = StatusAggregator::class_statistics(s.class_a, &period("2025 Spring"), &[], &[s.student.clone()], &[]);
        assert_eq!(stats.total_fees, Money::zero());
        assert_eq!(stats.payment_rate, 0);
    }

    #[test]
    fn test_class_statistics_nominal_price_diverges_from_override() {
        let mut s = setup();
        s.tuition = s.tuition.clone().with_class_price(s.class_a, Money::from_major(150));
        let records = vec![paid(&s.student, &s.tuition, Money::from_major(150), 150, "2025 Spring")];
        let stats = StatusAggregator::class_statistics(
            s.class_a,
            &period("2025 Spring"),
            &[s.tuition.clone()],
            &[s.student.clone()],
            &records,
        );

        assert_eq!(stats.total_fees, Money::from_major(100));
        assert_eq!(stats.pending_amount, Money::from_major(-50));
        assert_eq!(stats.payment_rate, 150);
    }

    #[test]
    fn test_breakdown_counts_each_status() {
        let s = setup();
        let spring = period("2025 Spring");
        let partial = Student::new(s.class_a, "Grace", "R-02");
        let none = Student::new(s.class_a, "Alan", "R-03");
        let outsider = Student::new(ClassId::new(), "Edsger", "R-04");
        let records = vec![
            paid(&s.student, &s.tuition, s.tuition.amount, 100, "2025 Spring"),
            paid(&s.student, &s.books, s.books.amount, 50, "2025 Spring"),
            paid(&partial, &s.books, s.books.amount, 10, "2025 Spring"),
        ];
        let breakdown = StatusAggregator::class_status_breakdown(
            s.class_a,
            &spring,
            &catalog(&s),
            &[s.student.clone(), partial, none, outsider],
            &records,
        );

        assert_eq!(breakdown.rows.len(), 3);
        assert_eq!((breakdown.full_count, breakdown.partial_count, breakdown.none_count), (1, 1, 1));
        assert_eq!(breakdown.rows[1].total_paid, Money::from_major(10));
        assert_eq!(breakdown.rows[1].outstanding, Money::from_major(140));
    }
}
