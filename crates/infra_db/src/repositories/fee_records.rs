//! Fee record repository
//!
//! Insert and filtered select over the append-only `fee_records` table.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::DatabaseError;

const RECORD_COLUMNS: &str = "record_id, school_id, student_id, fee_type_id, amount, paid, \
     due_date, status, period, collector_role, collector_id, created_at";

/// A row of `fee_records`
#[derive(Debug, Clone, FromRow)]
pub struct FeeRecordRow {
    pub record_id: Uuid,
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub fee_type_id: Uuid,
    pub amount: Decimal,
    pub paid: Decimal,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub period: String,
    pub collector_role: String,
    pub collector_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Values for a new row; id and timestamp are assigned on insert
#[derive(Debug, Clone)]
pub struct NewFeeRecordRow {
    pub school_id: Uuid,
    pub student_id: Uuid,
    pub fee_type_id: Uuid,
    pub amount: Decimal,
    pub paid: Decimal,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub period: String,
    pub collector_role: String,
    pub collector_id: Uuid,
}

/// Optional filters on top of the mandatory school
#[derive(Debug, Clone, Default)]
pub struct FeeRecordFilter {
    pub school_id: Uuid,
    pub student_id: Option<Uuid>,
    pub fee_type_id: Option<Uuid>,
    pub period: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FeeRecordRepository {
    pool: PgPool,
}

impl FeeRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a record and returns the stored row
    pub async fn insert(&self, row: NewFeeRecordRow) -> Result<FeeRecordRow, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO fee_records (
                record_id, school_id, student_id, fee_type_id, amount, paid,
                due_date, status, period, collector_role, collector_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let stored = sqlx::query_as::<_, FeeRecordRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(row.school_id)
            .bind(row.student_id)
            .bind(row.fee_type_id)
            .bind(row.amount)
            .bind(row.paid)
            .bind(row.due_date)
            .bind(&row.status)
            .bind(&row.period)
            .bind(&row.collector_role)
            .bind(row.collector_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    /// Selects matching rows, oldest first
    pub async fn find(&self, filter: &FeeRecordFilter) -> Result<Vec<FeeRecordRow>, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {RECORD_COLUMNS} FROM fee_records WHERE school_id = "));
        builder.push_bind(filter.school_id);

        if let Some(student_id) = filter.student_id {
            builder.push(" AND student_id = ").push_bind(student_id);
        }
        if let Some(fee_type_id) = filter.fee_type_id {
            builder.push(" AND fee_type_id = ").push_bind(fee_type_id);
        }
        if let Some(period) = &filter.period {
            builder.push(" AND period = ").push_bind(period.clone());
        }
        builder.push(" ORDER BY created_at, record_id");

        let rows = builder
            .build_query_as::<FeeRecordRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
