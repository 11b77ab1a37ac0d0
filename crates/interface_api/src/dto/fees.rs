//! Fee ledger DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{AcademicPeriod, ClassId, CollectorId, FeeTypeId, Money, StudentId};
use domain_fees::{
    Class, ClassPrice, CollectorRef, CollectorRole, FeeBalance, FeeRecord, FeeType, PeriodBucket,
    StudentFeeStatus,
};

use crate::error::ApiError;

/// A student as supplied by the caller
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudentDto {
    pub id: Uuid,
    pub class_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub code: String,
}

impl From<StudentDto> for domain_fees::Student {
    fn from(dto: StudentDto) -> Self {
        Self {
            id: StudentId::from(dto.id),
            class_id: ClassId::from(dto.class_id),
            name: dto.name,
            code: dto.code,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    #[validate(nested)]
    pub student: StudentDto,
    pub fee_type_id: Uuid,
    pub collector_role: CollectorRole,
    pub collector_id: Uuid,
    #[validate(length(min = 1, max = 50))]
    pub period: String,
    pub amount: Decimal,
}

impl RecordPaymentRequest {
    pub fn collector(&self) -> CollectorRef {
        CollectorRef::new(self.collector_role, CollectorId::from(self.collector_id))
    }

    pub fn fee_type(&self) -> FeeTypeId {
        FeeTypeId::from(self.fee_type_id)
    }

    pub fn amount(&self) -> Money {
        Money::new(self.amount)
    }
}

/// Query identifying a student by id (path) plus class and period
#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    /// Needed wherever amounts are resolved; statements do without it
    pub class_id: Option<Uuid>,
    pub period: Option<String>,
    pub name: Option<String>,
    pub code: Option<String>,
    /// Reference date for overdue flags; defaults to today
    pub as_of: Option<NaiveDate>,
}

impl StudentQuery {
    /// The student with their class, for routes that resolve fee amounts
    pub fn student(&self, student_id: Uuid) -> Result<domain_fees::Student, ApiError> {
        let class_id = self
            .class_id
            .ok_or_else(|| ApiError::BadRequest("class_id query parameter is required".to_string()))?;
        Ok(self.student_in(student_id, class_id))
    }

    /// The student's identity only; the class is nil unless supplied
    pub fn identity(&self, student_id: Uuid) -> domain_fees::Student {
        self.student_in(student_id, self.class_id.unwrap_or_else(Uuid::nil))
    }

    fn student_in(&self, student_id: Uuid, class_id: Uuid) -> domain_fees::Student {
        domain_fees::Student {
            id: StudentId::from(student_id),
            class_id: ClassId::from(class_id),
            name: self.name.clone().unwrap_or_default(),
            code: self.code.clone().unwrap_or_default(),
        }
    }

    pub fn period(&self) -> Result<AcademicPeriod, ApiError> {
        let label = self
            .period
            .as_deref()
            .ok_or_else(|| ApiError::BadRequest("period query parameter is required".to_string()))?;
        Ok(AcademicPeriod::new(label)?)
    }
}

/// Bucket ordering of the history endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySort {
    /// Order in which periods first appear in the stored records
    #[default]
    Discovery,
    Chronological,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub sort: HistorySort,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClassStatisticsRequest {
    #[validate(length(min = 1, max = 50))]
    pub period: String,
    #[validate(nested)]
    pub students: Vec<StudentDto>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClassReportRequest {
    #[validate(length(min = 1, max = 100))]
    pub class_name: String,
    #[validate(length(max = 50))]
    pub grade: String,
    #[validate(length(min = 1, max = 50))]
    pub period: String,
    #[validate(nested)]
    pub students: Vec<StudentDto>,
}

impl ClassReportRequest {
    pub fn class(&self, class_id: Uuid) -> Class {
        Class {
            id: ClassId::from(class_id),
            name: self.class_name.clone(),
            grade: self.grade.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassPriceResponse {
    pub class_id: Uuid,
    pub amount: Decimal,
}

impl From<&ClassPrice> for ClassPriceResponse {
    fn from(price: &ClassPrice) -> Self {
        Self {
            class_id: price.class_id.into(),
            amount: price.amount.round_to_display().amount(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeeTypeResponse {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub is_active: bool,
    pub is_class_specific: bool,
    pub applicable_classes: Vec<Uuid>,
    pub class_prices: Vec<ClassPriceResponse>,
    pub description: Option<String>,
}

impl From<&FeeType> for FeeTypeResponse {
    fn from(fee_type: &FeeType) -> Self {
        Self {
            id: fee_type.id.into(),
            name: fee_type.name.clone(),
            amount: fee_type.amount.round_to_display().amount(),
            due_date: fee_type.due_date,
            is_active: fee_type.is_active,
            is_class_specific: fee_type.is_class_specific,
            applicable_classes: fee_type.applicable_classes.iter().map(|c| (*c).into()).collect(),
            class_prices: fee_type.class_prices.iter().map(ClassPriceResponse::from).collect(),
            description: fee_type.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeeRecordResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub fee_type_id: Uuid,
    pub amount: Decimal,
    pub paid: Decimal,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub period: String,
    pub collector_role: String,
    pub collector_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&FeeRecord> for FeeRecordResponse {
    fn from(record: &FeeRecord) -> Self {
        Self {
            id: record.id.into(),
            student_id: record.student_id.into(),
            fee_type_id: record.fee_type_id.into(),
            amount: record.amount.round_to_display().amount(),
            paid: record.paid.round_to_display().amount(),
            status: record.status.as_str().to_string(),
            due_date: record.due_date,
            period: record.period.label().to_string(),
            collector_role: record.collector.role.as_str().to_string(),
            collector_id: record.collector.id.into(),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub fee_type_id: Uuid,
    pub fee_type_name: String,
    pub amount: Decimal,
    pub paid: Decimal,
    pub outstanding: Decimal,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub overdue: bool,
    pub in_catalog: bool,
}

impl BalanceResponse {
    pub fn new(balance: &FeeBalance, as_of: NaiveDate) -> Self {
        Self {
            fee_type_id: balance.fee_type_id.into(),
            fee_type_name: balance.fee_type_name.clone(),
            amount: balance.amount.round_to_display().amount(),
            paid: balance.paid.round_to_display().amount(),
            outstanding: balance.outstanding.round_to_display().amount(),
            status: balance.status.as_str().to_string(),
            due_date: balance.due_date,
            overdue: balance.is_overdue(as_of),
            in_catalog: balance.in_catalog,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BalancesResponse {
    pub student_id: Uuid,
    pub period: String,
    pub status: StudentFeeStatus,
    pub balances: Vec<BalanceResponse>,
    pub total_outstanding: Decimal,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub student_id: Uuid,
    pub period: String,
    pub status: StudentFeeStatus,
}

#[derive(Debug, Serialize)]
pub struct HistoryBucketResponse {
    pub period: String,
    pub total_paid: Decimal,
    pub records: Vec<FeeRecordResponse>,
}

impl From<&PeriodBucket> for HistoryBucketResponse {
    fn from(bucket: &PeriodBucket) -> Self {
        Self {
            period: bucket.period.label().to_string(),
            total_paid: bucket.total_paid.round_to_display().amount(),
            records: bucket.records.iter().map(FeeRecordResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub student_id: Uuid,
    pub periods: Vec<HistoryBucketResponse>,
    pub total_paid: Decimal,
}

impl HistoryResponse {
    pub fn new(student_id: Uuid, buckets: &[PeriodBucket]) -> Self {
        let total_paid: Money = buckets.iter().map(|b| b.total_paid).sum();
        Self {
            student_id,
            periods: buckets.iter().map(HistoryBucketResponse::from).collect(),
            total_paid: total_paid.round_to_display().amount(),
        }
    }
}
