//! Fee records
//!
//! A fee record is one payment event, not one obligation. Several records
//! for the same student, fee type and period are successive partial
//! payments and are summed by the aggregator. Records are immutable once
//! stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AcademicPeriod, FeeRecordId, FeeTypeId, Money, SchoolId, StudentId};

use crate::school::CollectorRef;

/// Payment state of one record, or of a summed fee-type group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    /// Classifies `paid` against `amount`
    pub fn from_amounts(paid: Money, amount: Money) -> Self {
        if paid.is_positive() && paid >= amount {
            PaymentStatus::Paid
        } else if paid.is_positive() {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "partial" => Ok(PaymentStatus::Partial),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

/// A stored payment event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRecord {
    pub id: FeeRecordId,
    pub school_id: SchoolId,
    pub student_id: StudentId,
    pub fee_type_id: FeeTypeId,
    /// Full resolved amount owed at the time of payment
    pub amount: Money,
    /// Amount paid in this event
    pub paid: Money,
    pub due_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub period: AcademicPeriod,
    pub collector: CollectorRef,
    pub created_at: DateTime<Utc>,
}

/// A record about to be written; the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeeRecord {
    pub school_id: SchoolId,
    pub student_id: StudentId,
    pub fee_type_id: FeeTypeId,
    pub amount: Money,
    pub paid: Money,
    pub due_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub period: AcademicPeriod,
    pub collector: CollectorRef,
}

impl NewFeeRecord {
    /// Materialises the record with a fresh id and timestamp
    ///
    /// Used by stores that do not generate ids themselves.
    pub fn into_record(self, created_at: DateTime<Utc>) -> FeeRecord {
        FeeRecord {
            id: FeeRecordId::new_v7(),
            school_id: self.school_id,
            student_id: self.student_id,
            fee_type_id: self.fee_type_id,
            amount: self.amount,
            paid: self.paid,
            due_date: self.due_date,
            status: self.status,
            period: self.period,
            collector: self.collector,
            created_at,
        }
    }
}

/// Filters for querying the record store
///
/// `school_id` is mandatory: records never cross tenant boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeRecordQuery {
    pub school_id: SchoolId,
    pub student_id: Option<StudentId>,
    pub fee_type_id: Option<FeeTypeId>,
    pub period: Option<AcademicPeriod>,
}

impl FeeRecordQuery {
    /// All records of a school
    pub fn for_school(school_id: SchoolId) -> Self {
        Self {
            school_id,
            student_id: None,
            fee_type_id: None,
            period: None,
        }
    }

    pub fn student(mut self, student_id: StudentId) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn fee_type(mut self, fee_type_id: FeeTypeId) -> Self {
        self.fee_type_id = Some(fee_type_id);
        self
    }

    pub fn period(mut self, period: AcademicPeriod) -> Self {
        self.period = Some(period);
        self
    }

    /// Applies the filters to an in-memory record
    pub fn matches(&self, record: &FeeRecord) -> bool {
        record.school_id == self.school_id
            && self.student_id.map_or(true, |id| record.student_id == id)
            && self.fee_type_id.map_or(true, |id| record.fee_type_id == id)
            && self.period.as_ref().map_or(true, |p| &record.period == p)
    }
}
