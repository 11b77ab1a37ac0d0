//! PostgreSQL Catalog Adapter
//!
//! Stitches the fee type, applicable class and class price rows of a
//! school back into domain [`FeeType`] values.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    ClassId, DomainPort, FeeTypeId, HealthCheckResult, HealthCheckable, Money, PortError, SchoolId,
};
use domain_fees::{CatalogStore, ClassPrice, FeeType};

use crate::error::db_to_port_error;
use crate::repositories::fee_catalog::{CatalogRows, FeeCatalogRepository};

/// PostgreSQL-backed implementation of [`CatalogStore`]
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    repository: FeeCatalogRepository,
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FeeCatalogRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresCatalogStore {}

#[async_trait]
impl HealthCheckable for PostgresCatalogStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-fee-catalog").await
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self), fields(school_id = %school_id))]
    async fn list_fee_types(&self, school_id: SchoolId) -> Result<Vec<FeeType>, PortError> {
        let rows = self
            .repository
            .load_school(school_id.into())
            .await
            .map_err(db_to_port_error)?;
        debug!(fee_types = rows.fee_types.len(), "Loaded catalog rows");
        Ok(rows_to_fee_types(rows))
    }
}

/// Assembles fee types, keeping the row order of `fee_types`
fn rows_to_fee_types(rows: CatalogRows) -> Vec<FeeType> {
    let mut classes: HashMap<Uuid, Vec<ClassId>> = HashMap::new();
    for row in rows.classes {
        classes.entry(row.fee_type_id).or_default().push(ClassId::from(row.class_id));
    }

    let mut prices: HashMap<Uuid, Vec<ClassPrice>> = HashMap::new();
    for row in rows.prices {
        prices.entry(row.fee_type_id).or_default().push(ClassPrice {
            class_id: ClassId::from(row.class_id),
            amount: Money::new(row.amount),
        });
    }

    rows.fee_types
        .into_iter()
        .map(|row| FeeType {
            id: FeeTypeId::from(row.fee_type_id),
            school_id: SchoolId::from(row.school_id),
            name: row.name,
            amount: Money::new(row.amount),
            due_date: row.due_date,
            is_active: row.is_active,
            is_class_specific: row.is_class_specific,
            class_prices: prices.remove(&row.fee_type_id).unwrap_or_default(),
            applicable_classes: classes.remove(&row.fee_type_id).unwrap_or_default(),
            description: row.description,
        })
        .collect()
}
