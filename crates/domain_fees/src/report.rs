//! Report assembly
//!
//! Builds the data structures handed to a [`ReportRenderer`]. Assembly never
//! fails on missing reference data: unknown fee types and collectors are
//! labelled [`UNKNOWN_LABEL`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use core_kernel::{AcademicPeriod, FeeRecordId, FeeTypeId, Money, StudentId};

use crate::aggregator::{ClassStatistics, ClassStatusBreakdown, UNKNOWN_LABEL};
use crate::catalog::FeeCatalog;
use crate::error::FeeError;
use crate::history::group_by_period;
use crate::ports::ReportRenderer;
use crate::record::{FeeRecord, PaymentStatus};
use crate::school::{Class, Collector, CollectorRef, CollectorRole, Student};

/// One payment line of a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub record_id: FeeRecordId,
    pub fee_type_id: FeeTypeId,
    pub fee_type_name: String,
    pub amount: Money,
    pub paid: Money,
    pub status: PaymentStatus,
    pub due_date: Option<NaiveDate>,
    pub collector_role: CollectorRole,
    pub collector_name: String,
    pub recorded_at: DateTime<Utc>,
}

/// The lines of one academic period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    pub period: AcademicPeriod,
    pub lines: Vec<StatementLine>,
    pub total_paid: Money,
}

/// A student's payment history, period by period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentStatement {
    pub student_id: StudentId,
    pub student_name: String,
    pub student_code: String,
    pub sections: Vec<StatementSection>,
    pub total_paid: Money,
}

/// Class summary for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFeeReport {
    pub class: Class,
    pub period: AcademicPeriod,
    pub statistics: ClassStatistics,
    pub breakdown: ClassStatusBreakdown,
}

/// Assembles report structures from ledger data
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    /// Statement of every record of `student`, grouped by period in
    /// discovery order
    pub fn student_statement(
        student: &Student,
        records: &[FeeRecord],
        catalog: &FeeCatalog,
        collectors: &[Collector],
    ) -> StudentStatement {
        let names: HashMap<CollectorRef, &str> = collectors
            .iter()
            .map(|c| (c.reference(), c.name.as_str()))
            .collect();

        let own: Vec<FeeRecord> = records
            .iter()
            .filter(|r| r.student_id == student.id)
            .cloned()
            .collect();

        let sections: Vec<StatementSection> = group_by_period(&own)
            .into_iter()
            .map(|group| {
                let total_paid = group.total_paid();
                StatementSection {
                    period: group.period.clone(),
                    lines: group
                        .records
                        .into_iter()
                        .map(|record| Self::line(record, catalog, &names))
                        .collect(),
                    total_paid,
                }
            })
            .collect();

        StudentStatement {
            student_id: student.id,
            student_name: student.name.clone(),
            student_code: student.code.clone(),
            total_paid: sections.iter().map(|s| s.total_paid).sum(),
            sections,
        }
    }

    fn line(record: &FeeRecord, catalog: &FeeCatalog, names: &HashMap<CollectorRef, &str>) -> StatementLine {
        StatementLine {
            record_id: record.id,
            fee_type_id: record.fee_type_id,
            fee_type_name: catalog
                .name_of(&record.fee_type_id)
                .unwrap_or(UNKNOWN_LABEL)
                .to_string(),
            amount: record.amount,
            paid: record.paid,
            status: record.status,
            due_date: record.due_date,
            collector_role: record.collector.role,
            collector_name: names
                .get(&record.collector)
                .copied()
                .unwrap_or(UNKNOWN_LABEL)
                .to_string(),
            recorded_at: record.created_at,
        }
    }

    pub fn class_report(
        class: &Class,
        period: &AcademicPeriod,
        statistics: ClassStatistics,
        breakdown: ClassStatusBreakdown,
    ) -> ClassFeeReport {
        ClassFeeReport {
            class: class.clone(),
            period: period.clone(),
            statistics,
            breakdown,
        }
    }
}

/// Renders reports as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportRenderer;

impl ReportRenderer for JsonReportRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render_statement(&self, statement: &StudentStatement) -> Result<Vec<u8>, FeeError> {
        serde_json::to_vec_pretty(statement).map_err(|e| FeeError::render(e.to_string()))
    }

    fn render_class_report(&self, report: &ClassFeeReport) -> Result<Vec<u8>, FeeError> {
        serde_json::to_vec_pretty(report).map_err(|e| FeeError::render(e.to_string()))
    }
}
