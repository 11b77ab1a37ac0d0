//! Fee Domain - Student Fee Ledger & Reconciliation
//!
//! This crate determines, for any student in any academic period, what is
//! owed, what has been paid, and how collection adds up per class.
//!
//! # Components
//!
//! - **FeeCatalog**: fee types with class-specific price overrides
//! - **FeeResolver**: the amount a given student owes for a fee type
//! - **PaymentRecorder**: validates and appends payment events
//! - **StatusAggregator**: per-student status and per-class statistics
//! - **HistoryGrouper**: a student's records bucketed by period
//! - **ReportAssembler**: statement and class report structures
//!
//! # Ledger Rules
//!
//! - A fee record is one payment event; instalments are summed per fee type
//! - Records are never updated or deleted
//! - A class-specific fee owes nothing for classes it does not list
//! - Class planned revenue uses the nominal catalog price, so it can differ
//!   from the sum of resolved amounts
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_fees::{FeeLedgerService, StudentFeeStatus};
//!
//! let ledger = FeeLedgerService::new(records, catalog, collectors);
//!
//! ledger
//!     .record_payment(school_id, &student, tuition_id, collector, period.clone(), amount)
//!     .await?;
//!
//! let status = ledger.student_status(school_id, &student, &period).await?;
//! assert_eq!(status, StudentFeeStatus::Partial);
//! ```

pub mod school;
pub mod catalog;
pub mod resolver;
pub mod record;
pub mod recorder;
pub mod aggregator;
pub mod history;
pub mod report;
pub mod ports;
pub mod memory;
pub mod service;
pub mod error;

pub use school::{Class, Collector, CollectorRef, CollectorRole, Student};
pub use catalog::{ClassPrice, FeeCatalog, FeeType};
pub use resolver::{FeeResolver, ResolvedAmount};
pub use record::{FeeRecord, FeeRecordQuery, NewFeeRecord, PaymentStatus};
pub use recorder::{prepare_payment, PaymentRecorder, PaymentRequest};
pub use aggregator::{
    ClassStatistics, ClassStatusBreakdown, FeeBalance, StatusAggregator, StudentFeeStatus,
    StudentStatusRow, UNKNOWN_LABEL,
};
pub use history::{group_by_period, PeriodBucket, PeriodGroup, PeriodHistory};
pub use report::{
    ClassFeeReport, JsonReportRenderer, ReportAssembler, StatementLine, StatementSection,
    StudentStatement,
};
pub use ports::{CatalogStore, CollectorDirectory, FeeRecordStore, ReportRenderer};
pub use service::FeeLedgerService;
pub use error::FeeError;
