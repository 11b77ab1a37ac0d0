//! Domain Adapters
//!
//! PostgreSQL implementations of the fee domain ports. Each adapter:
//! - Implements one port trait from `domain_fees`
//! - Translates between row types and domain types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresCatalogStore, PostgresCollectorDirectory, PostgresFeeRecordStore};
//! use domain_fees::FeeLedgerService;
//! use std::sync::Arc;
//!
//! let ledger = FeeLedgerService::new(
//!     Arc::new(PostgresFeeRecordStore::new(pool.clone())),
//!     Arc::new(PostgresCatalogStore::new(pool.clone())),
//!     Arc::new(PostgresCollectorDirectory::new(pool)),
//! );
//! ```

pub mod fee_records;
pub mod catalog;
pub mod collectors;

pub use fee_records::PostgresFeeRecordStore;
pub use catalog::PostgresCatalogStore;
pub use collectors::PostgresCollectorDirectory;

use core_kernel::HealthCheckResult;
use sqlx::PgPool;

/// Runs `SELECT 1` and reports the outcome under `adapter_id`
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = std::time::Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}
