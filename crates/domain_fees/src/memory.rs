//! In-memory port implementations
//!
//! Process-local adapters for tests and local runs. Each can be switched
//! offline to exercise the ledger's handling of store failures.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, SchoolId};

use crate::catalog::FeeType;
use crate::ports::{CatalogStore, CollectorDirectory, FeeRecordStore};
use crate::record::{FeeRecord, FeeRecordQuery, NewFeeRecord};
use crate::school::Collector;

#[derive(Debug, Default)]
struct Availability(AtomicBool);

impl Availability {
    fn set_offline(&self, offline: bool) {
        self.0.store(offline, Ordering::SeqCst);
    }

    fn check(&self, service: &str) -> Result<(), PortError> {
        if self.0.load(Ordering::SeqCst) {
            return Err(PortError::ServiceUnavailable {
                service: service.to_string(),
            });
        }
        Ok(())
    }

    fn health(&self, adapter_id: &str) -> HealthCheckResult {
        if self.0.load(Ordering::SeqCst) {
            HealthCheckResult::unhealthy(adapter_id, 0, "adapter switched offline")
        } else {
            HealthCheckResult::healthy(adapter_id, 0)
        }
    }
}

/// Append-only record store held in a vector
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeeRecordStore {
    records: Arc<RwLock<Vec<FeeRecord>>>,
    availability: Arc<Availability>,
}

impl InMemoryFeeRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates with already stored records
    pub async fn with_records(records: Vec<FeeRecord>) -> Self {
        let store = Self::new();
        store.records.write().await.extend(records);
        store
    }

    /// Makes every subsequent call fail with `ServiceUnavailable`
    pub fn set_offline(&self, offline: bool) {
        self.availability.set_offline(offline);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

impl DomainPort for InMemoryFeeRecordStore {}

#[async_trait]
impl HealthCheckable for InMemoryFeeRecordStore {
    async fn health_check(&self) -> HealthCheckResult {
        self.availability.health("memory-fee-records")
    }
}

#[async_trait]
impl FeeRecordStore for InMemoryFeeRecordStore {
    async fn insert(&self, record: NewFeeRecord) -> Result<FeeRecord, PortError> {
        self.availability.check("fee_records")?;
        let stored = record.into_record(Utc::now());
        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn query(&self, query: FeeRecordQuery) -> Result<Vec<FeeRecord>, PortError> {
        self.availability.check("fee_records")?;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }
}

/// Catalog keyed by school
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    fee_types: Arc<RwLock<HashMap<SchoolId, Vec<FeeType>>>>,
    availability: Arc<Availability>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates with fee types, grouped by their school
    pub async fn with_fee_types(fee_types: Vec<FeeType>) -> Self {
        let store = Self::new();
        for fee_type in fee_types {
            store.put(fee_type).await;
        }
        store
    }

    /// Adds or replaces a fee type definition
    pub async fn put(&self, fee_type: FeeType) {
        let mut guard = self.fee_types.write().await;
        let entries = guard.entry(fee_type.school_id).or_default();
        entries.retain(|f| f.id != fee_type.id);
        entries.push(fee_type);
    }

    pub fn set_offline(&self, offline: bool) {
        self.availability.set_offline(offline);
    }
}

impl DomainPort for InMemoryCatalogStore {}

#[async_trait]
impl HealthCheckable for InMemoryCatalogStore {
    async fn health_check(&self) -> HealthCheckResult {
        self.availability.health("memory-fee-catalog")
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_fee_types(&self, school_id: SchoolId) -> Result<Vec<FeeType>, PortError> {
        self.availability.check("fee_catalog")?;
        Ok(self
            .fee_types
            .read()
            .await
            .get(&school_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Staff directory keyed by school
#[derive(Debug, Clone, Default)]
pub struct InMemoryCollectorDirectory {
    collectors: Arc<RwLock<HashMap<SchoolId, Vec<Collector>>>>,
    availability: Arc<Availability>,
}

impl InMemoryCollectorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, school_id: SchoolId, collector: Collector) {
        self.collectors
            .write()
            .await
            .entry(school_id)
            .or_default()
            .push(collector);
    }

    pub fn set_offline(&self, offline: bool) {
        self.availability.set_offline(offline);
    }
}

impl DomainPort for InMemoryCollectorDirectory {}

#[async_trait]
impl HealthCheckable for InMemoryCollectorDirectory {
    async fn health_check(&self) -> HealthCheckResult {
        self.availability.health("memory-collectors")
    }
}

#[async_trait]
impl CollectorDirectory for InMemoryCollectorDirectory {
    async fn list_collectors(&self, school_id: SchoolId) -> Result<Vec<Collector>, PortError> {
        self.availability.check("collectors")?;
        Ok(self
            .collectors
            .read()
            .await
            .get(&school_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{AcademicPeriod, CollectorId, FeeTypeId, Money, StudentId};
    use crate::record::PaymentStatus;
    use crate::school::CollectorRef;

    fn new_record(school_id: SchoolId) -> NewFeeRecord {
        NewFeeRecord {
            school_id,
            student_id: StudentId::new(),
            fee_type_id: FeeTypeId::new(),
            amount: Money::from_major(100),
            paid: Money::from_major(100),
            due_date: None,
            status: PaymentStatus::Paid,
            period: AcademicPeriod::new("2025 Spring").unwrap(),
            collector: CollectorRef::teacher(CollectorId::new()),
        }
    }

    #[tokio::test]
    async fn test_insert_then_query_scoped_by_school() {
        let store = InMemoryFeeRecordStore::new();
        let school = SchoolId::new();
        store.insert(new_record(school)).await.unwrap();
        store.insert(new_record(SchoolId::new())).await.unwrap();

        let found = store.query(FeeRecordQuery::for_school(school)).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_offline_store_fails_and_reports_unhealthy() {
        let store = InMemoryFeeRecordStore::new();
        store.set_offline(true);

        let err = store.insert(new_record(SchoolId::new())).await.unwrap_err();
        assert!(err.is_transient());
        assert!(!store.health_check().await.is_healthy());
    }

    #[tokio::test]
    async fn test_catalog_put_replaces_by_id() {
        let school = SchoolId::new();
        let fee = FeeType::new(school, "Tuition", Money::from_major(100));
        let store = InMemoryCatalogStore::with_fee_types(vec![fee.clone()]).await;

        let mut updated = fee.clone();
        updated.amount = Money::from_major(120);
        store.put(updated).await;

        let listed = store.list_fee_types(school).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].amount, Money::from_major(120));
    }
}
