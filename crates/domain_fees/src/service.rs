//! Store-backed ledger operations
//!
//! [`FeeLedgerService`] wires the pure components to the store ports. Each
//! call loads what it needs afresh; nothing is cached between calls.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use core_kernel::{AcademicPeriod, ClassId, FeeTypeId, HealthCheckResult, Money, SchoolId, StudentId};

use crate::aggregator::{ClassStatistics, ClassStatusBreakdown, FeeBalance, StatusAggregator, StudentFeeStatus};
use crate::catalog::{FeeCatalog, FeeType};
use crate::error::FeeError;
use crate::history::{group_by_period, PeriodBucket};
use crate::ports::{CatalogStore, CollectorDirectory, FeeRecordStore, ReportRenderer};
use crate::record::{FeeRecord, FeeRecordQuery};
use crate::recorder::{PaymentRecorder, PaymentRequest};
use crate::report::{ClassFeeReport, JsonReportRenderer, ReportAssembler, StudentStatement};
use crate::school::{Class, Collector, CollectorRef, Student};

/// Fee ledger over injected stores
#[derive(Clone)]
pub struct FeeLedgerService {
    records: Arc<dyn FeeRecordStore>,
    catalog: Arc<dyn CatalogStore>,
    collectors: Arc<dyn CollectorDirectory>,
    renderer: Arc<dyn ReportRenderer>,
    recorder: PaymentRecorder,
}

impl FeeLedgerService {
    /// Creates a service rendering reports as JSON
    pub fn new(
        records: Arc<dyn FeeRecordStore>,
        catalog: Arc<dyn CatalogStore>,
        collectors: Arc<dyn CollectorDirectory>,
    ) -> Self {
        Self {
            recorder: PaymentRecorder::new(records.clone()),
            records,
            catalog,
            collectors,
            renderer: Arc::new(JsonReportRenderer),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ReportRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn renderer(&self) -> &dyn ReportRenderer {
        self.renderer.as_ref()
    }

    /// Loads a school's fee catalog
    #[instrument(skip(self))]
    pub async fn load_catalog(&self, school_id: SchoolId) -> Result<FeeCatalog, FeeError> {
        let fee_types = self.catalog.list_fee_types(school_id).await?;
        debug!(count = fee_types.len(), "Loaded fee catalog");
        Ok(FeeCatalog::new(fee_types))
    }

    /// Records a payment against a catalog fee type
    ///
    /// Fails with `CatalogInconsistent` when the fee type id is not in the
    /// school's catalog.
    #[instrument(skip(self, student), fields(student = %student.id))]
    pub async fn record_payment(
        &self,
        school_id: SchoolId,
        student: &Student,
        fee_type_id: FeeTypeId,
        collector: CollectorRef,
        period: AcademicPeriod,
        amount: Money,
    ) -> Result<FeeRecord, FeeError> {
        let catalog = self.load_catalog(school_id).await?;
        let fee_type = catalog
            .get(&fee_type_id)
            .ok_or(FeeError::CatalogInconsistent(fee_type_id))?;

        self.recorder
            .record_payment(PaymentRequest {
                school_id,
                student,
                fee_type,
                collector,
                period,
                amount,
            })
            .await
    }

    async fn student_records(
        &self,
        school_id: SchoolId,
        student_id: StudentId,
        period: Option<AcademicPeriod>,
    ) -> Result<Vec<FeeRecord>, FeeError> {
        let mut query = FeeRecordQuery::for_school(school_id).student(student_id);
        if let Some(period) = period {
            query = query.period(period);
        }
        Ok(self.records.query(query).await?)
    }

    /// Per-fee-type balances of a student in a period
    #[instrument(skip(self, student), fields(student = %student.id))]
    pub async fn student_balances(
        &self,
        school_id: SchoolId,
        student: &Student,
        period: &AcademicPeriod,
    ) -> Result<Vec<FeeBalance>, FeeError> {
        let catalog = self.load_catalog(school_id).await?;
        let records = self
            .student_records(school_id, student.id, Some(period.clone()))
            .await?;
        Ok(StatusAggregator::fee_balances(student, period, &catalog, &records))
    }

    /// Overall status of a student in a period
    pub async fn student_status(
        &self,
        school_id: SchoolId,
        student: &Student,
        period: &AcademicPeriod,
    ) -> Result<StudentFeeStatus, FeeError> {
        let balances = self.student_balances(school_id, student, period).await?;
        Ok(StatusAggregator::status_of(&balances))
    }

    async fn period_records(&self, school_id: SchoolId, period: &AcademicPeriod) -> Result<Vec<FeeRecord>, FeeError> {
        Ok(self
            .records
            .query(FeeRecordQuery::for_school(school_id).period(period.clone()))
            .await?)
    }

    /// Collection statistics of a class, planned at the active catalog's
    /// nominal prices
    #[instrument(skip(self, students), fields(students = students.len()))]
    pub async fn class_statistics(
        &self,
        school_id: SchoolId,
        class_id: ClassId,
        period: &AcademicPeriod,
        students: &[Student],
    ) -> Result<ClassStatistics, FeeError> {
        let catalog = self.load_catalog(school_id).await?;
        let fee_types: Vec<FeeType> = catalog.active().cloned().collect();
        let records = self.period_records(school_id, period).await?;
        Ok(StatusAggregator::class_statistics(class_id, period, &fee_types, students, &records))
    }

    /// Per-student statuses of a class
    #[instrument(skip(self, students), fields(students = students.len()))]
    pub async fn class_breakdown(
        &self,
        school_id: SchoolId,
        class_id: ClassId,
        period: &AcademicPeriod,
        students: &[Student],
    ) -> Result<ClassStatusBreakdown, FeeError> {
        let catalog = self.load_catalog(school_id).await?;
        let records = self.period_records(school_id, period).await?;
        Ok(StatusAggregator::class_status_breakdown(class_id, period, &catalog, students, &records))
    }

    /// A student's records grouped by period
    #[instrument(skip(self))]
    pub async fn student_history(
        &self,
        school_id: SchoolId,
        student_id: StudentId,
        chronological: bool,
    ) -> Result<Vec<PeriodBucket>, FeeError> {
        let records = self.student_records(school_id, student_id, None).await?;
        let history = group_by_period(&records);
        let history = if chronological {
            history.sorted_chronologically()
        } else {
            history
        };
        Ok(history.to_buckets())
    }

    /// Collectors of a school, or none when the directory cannot be read
    async fn collectors_or_empty(&self, school_id: SchoolId) -> Vec<Collector> {
        match self.collectors.list_collectors(school_id).await {
            Ok(collectors) => collectors,
            Err(e) => {
                warn!(error = %e, "Collector directory unavailable, names fall back to Unknown");
                Vec::new()
            }
        }
    }

    /// Multi-period statement of a student
    #[instrument(skip(self, student), fields(student = %student.id))]
    pub async fn student_statement(&self, school_id: SchoolId, student: &Student) -> Result<StudentStatement, FeeError> {
        let catalog = self.load_catalog(school_id).await?;
        let records = self.student_records(school_id, student.id, None).await?;
        let collectors = self.collectors_or_empty(school_id).await;
        Ok(ReportAssembler::student_statement(student, &records, &catalog, &collectors))
    }

    /// Statistics and per-student breakdown of a class
    #[instrument(skip(self, class, students), fields(class = %class.id))]
    pub async fn class_report(
        &self,
        school_id: SchoolId,
        class: &Class,
        period: &AcademicPeriod,
        students: &[Student],
    ) -> Result<ClassFeeReport, FeeError> {
        let catalog = self.load_catalog(school_id).await?;
        let records = self.period_records(school_id, period).await?;
        let fee_types: Vec<FeeType> = catalog.active().cloned().collect();

        let statistics = StatusAggregator::class_statistics(class.id, period, &fee_types, students, &records);
        let breakdown = StatusAggregator::class_status_breakdown(class.id, period, &catalog, students, &records);
        Ok(ReportAssembler::class_report(class, period, statistics, breakdown))
    }

    /// Health of every backing store
    pub async fn health(&self) -> Vec<HealthCheckResult> {
        vec![
            self.records.health_check().await,
            self.catalog.health_check().await,
            self.collectors.health_check().await,
        ]
    }
}
