//! Fee Domain Ports
//!
//! The ledger depends on four collaborators, all declared here so that the
//! domain compiles against nothing but `core_kernel`:
//!
//! - **FeeRecordStore**: append-only persistence of payment events
//! - **CatalogStore**: fee types with their class overrides
//! - **CollectorDirectory**: staff names for `(role, id)` pairs
//! - **ReportRenderer**: turns assembled statements into a document
//!
//! Store adapters live in `infra_db` (PostgreSQL) and in [`crate::memory`]
//! (in-process, used by tests and local runs).
//!
//! ```rust,ignore
//! let records: Arc<dyn FeeRecordStore> = Arc::new(PostgresFeeRecordStore::new(pool.clone()));
//! let service = FeeLedgerService::new(records, catalog, collectors);
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, SchoolId};

use crate::catalog::FeeType;
use crate::error::FeeError;
use crate::record::{FeeRecord, FeeRecordQuery, NewFeeRecord};
use crate::report::{ClassFeeReport, StudentStatement};
use crate::school::Collector;

/// Persistence for fee records
///
/// Only insert and query are required. Implementations must never update or
/// delete a stored record.
#[async_trait]
pub trait FeeRecordStore: DomainPort + HealthCheckable {
    /// Persists a new record and returns it with id and timestamp assigned
    async fn insert(&self, record: NewFeeRecord) -> Result<FeeRecord, PortError>;

    /// Returns every record matching the filters, oldest first
    async fn query(&self, query: FeeRecordQuery) -> Result<Vec<FeeRecord>, PortError>;
}

/// Source of fee type definitions
#[async_trait]
pub trait CatalogStore: DomainPort + HealthCheckable {
    /// Lists a school's fee types including class overrides and
    /// applicable classes
    async fn list_fee_types(&self, school_id: SchoolId) -> Result<Vec<FeeType>, PortError>;
}

/// Read-only staff directory used to label collectors
#[async_trait]
pub trait CollectorDirectory: DomainPort + HealthCheckable {
    /// Lists teachers and admins of a school
    async fn list_collectors(&self, school_id: SchoolId) -> Result<Vec<Collector>, PortError>;
}

/// Consumer of assembled report structures
///
/// Format and delivery are the renderer's business; the ledger only hands
/// over data.
pub trait ReportRenderer: Send + Sync {
    /// MIME type of the produced document
    fn content_type(&self) -> &'static str;

    fn render_statement(&self, statement: &StudentStatement) -> Result<Vec<u8>, FeeError>;

    fn render_class_report(&self, report: &ClassFeeReport) -> Result<Vec<u8>, FeeError>;
}
