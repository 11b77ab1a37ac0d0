//! PostgreSQL Collector Directory Adapter

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

use core_kernel::{CollectorId, DomainPort, HealthCheckResult, HealthCheckable, PortError, SchoolId};
use domain_fees::{Collector, CollectorDirectory, CollectorRole};

use crate::error::db_to_port_error;
use crate::repositories::collectors::{CollectorRepository, CollectorRow};

/// Read-only directory over the `teachers` and `admins` tables
#[derive(Debug, Clone)]
pub struct PostgresCollectorDirectory {
    repository: CollectorRepository,
    pool: PgPool,
}

impl PostgresCollectorDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CollectorRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresCollectorDirectory {}

#[async_trait]
impl HealthCheckable for PostgresCollectorDirectory {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-collectors").await
    }
}

#[async_trait]
impl CollectorDirectory for PostgresCollectorDirectory {
    #[instrument(skip(self), fields(school_id = %school_id))]
    async fn list_collectors(&self, school_id: SchoolId) -> Result<Vec<Collector>, PortError> {
        let rows = self
            .repository
            .list_for_school(school_id.into())
            .await
            .map_err(db_to_port_error)?;
        Ok(rows.into_iter().filter_map(row_to_collector).collect())
    }
}

// Rows with an unrecognised role are skipped; their records then show as
// collected by "Unknown".
fn row_to_collector(row: CollectorRow) -> Option<Collector> {
    match row.role.parse::<CollectorRole>() {
        Ok(role) => Some(Collector {
            id: CollectorId::from(row.collector_id),
            name: row.name,
            role,
        }),
        Err(e) => {
            warn!(collector_id = %row.collector_id, error = %e, "Skipping collector row");
            None
        }
    }
}
