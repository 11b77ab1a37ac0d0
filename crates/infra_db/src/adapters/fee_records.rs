//! PostgreSQL Fee Record Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AcademicPeriod, CollectorId, DomainPort, FeeRecordId, FeeTypeId, HealthCheckResult, HealthCheckable,
    Money, PortError, SchoolId, StudentId,
};
use domain_fees::{
    CollectorRef, CollectorRole, FeeRecord, FeeRecordQuery, FeeRecordStore, NewFeeRecord, PaymentStatus,
};

use crate::error::{db_to_port_error, DatabaseError};
use crate::repositories::fee_records::{FeeRecordFilter, FeeRecordRepository, FeeRecordRow, NewFeeRecordRow};

/// PostgreSQL-backed implementation of [`FeeRecordStore`]
///
/// Only inserts and selects; the table itself rejects updates and deletes.
#[derive(Debug, Clone)]
pub struct PostgresFeeRecordStore {
    repository: FeeRecordRepository,
    pool: PgPool,
}

impl PostgresFeeRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FeeRecordRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresFeeRecordStore {}

#[async_trait]
impl HealthCheckable for PostgresFeeRecordStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-fee-records").await
    }
}

#[async_trait]
impl FeeRecordStore for PostgresFeeRecordStore {
    #[instrument(skip(self, record), fields(student_id = %record.student_id, fee_type_id = %record.fee_type_id))]
    async fn insert(&self, record: NewFeeRecord) -> Result<FeeRecord, PortError> {
        debug!("Inserting fee record");
        let row = self
            .repository
            .insert(new_record_to_row(record))
            .await
            .map_err(db_to_port_error)?;
        row_to_record(row).map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn query(&self, query: FeeRecordQuery) -> Result<Vec<FeeRecord>, PortError> {
        let rows = self
            .repository
            .find(&query_to_filter(&query))
            .await
            .map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Fetched fee records");

        rows.into_iter()
            .map(|row| row_to_record(row).map_err(db_to_port_error))
            .collect()
    }
}

// ============================================================================
// Conversion Functions
// ============================================================================

fn new_record_to_row(record: NewFeeRecord) -> NewFeeRecordRow {
    NewFeeRecordRow {
        school_id: record.school_id.into(),
        student_id: record.student_id.into(),
        fee_type_id: record.fee_type_id.into(),
        amount: record.amount.amount(),
        paid: record.paid.amount(),
        due_date: record.due_date,
        status: record.status.as_str().to_string(),
        period: record.period.label().to_string(),
        collector_role: record.collector.role.as_str().to_string(),
        collector_id: record.collector.id.into(),
    }
}

fn query_to_filter(query: &FeeRecordQuery) -> FeeRecordFilter {
    FeeRecordFilter {
        school_id: query.school_id.into(),
        student_id: query.student_id.map(Into::into),
        fee_type_id: query.fee_type_id.map(Into::into),
        period: query.period.as_ref().map(|p| p.label().to_string()),
    }
}

fn row_to_record(row: FeeRecordRow) -> Result<FeeRecord, DatabaseError> {
    let status = row.status.parse::<PaymentStatus>().map_err(DatabaseError::invalid_data)?;
    let role = row.collector_role.parse::<CollectorRole>().map_err(DatabaseError::invalid_data)?;
    let period = AcademicPeriod::new(row.period)
        .map_err(|e| DatabaseError::invalid_data(format!("record {}: {}", row.record_id, e)))?;

    Ok(FeeRecord {
        id: FeeRecordId::from(row.record_id),
        school_id: SchoolId::from(row.school_id),
        student_id: StudentId::from(row.student_id),
        fee_type_id: FeeTypeId::from(row.fee_type_id),
        amount: Money::new(row.amount),
        paid: Money::new(row.paid),
        due_date: row.due_date,
        status,
        period,
        collector: CollectorRef::new(role, CollectorId::from(row.collector_id)),
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn row() -> FeeRecordRow {
        FeeRecordRow {
            record_id: Uuid::now_v7(),
            school_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            fee_type_id: Uuid::new_v4(),
            amount: dec!(100),
            paid: dec!(40),
            due_date: None,
            status: "partial".to_string(),
            period: "2025 Spring".to_string(),
            collector_role: "teacher".to_string(),
            collector_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_to_record() {
        let record = row_to_record(row()).unwrap();
        assert_eq!(record.status, PaymentStatus::Partial);
        assert_eq!(record.collector.role, CollectorRole::Teacher);
        assert_eq!(record.paid, Money::from_major(40));
        assert_eq!(record.period.label(), "2025 Spring");
    }

    #[test]
    fn test_unknown_status_is_invalid_data() {
        let mut bad = row();
        bad.status = "void".to_string();
        assert!(matches!(row_to_record(bad), Err(DatabaseError::InvalidData(_))));
    }

    #[test]
    fn test_query_to_filter_keeps_optional_filters() {
        let school = SchoolId::new();
        let student = StudentId::new();
        let filter = query_to_filter(&FeeRecordQuery::for_school(school).student(student));

        assert_eq!(filter.school_id, *school.as_uuid());
        assert_eq!(filter.student_id, Some(*student.as_uuid()));
        assert!(filter.fee_type_id.is_none());
        assert!(filter.period.is_none());
    }
}
