//! Pre-built Test Fixtures
//!
//! A small, predictable school used across unit, service and HTTP tests:
//! two classes, a flat tuition fee, a books fee charged to class A only and
//! one collector of each role.

use chrono::NaiveDate;
use core_kernel::{AcademicPeriod, CollectorId, Money, SchoolId};
use domain_fees::memory::{InMemoryCatalogStore, InMemoryCollectorDirectory, InMemoryFeeRecordStore};
use domain_fees::{Class, Collector, CollectorRole, FeeCatalog, FeeLedgerService, FeeType, Student};
use std::sync::Arc;

/// Fixture for academic period labels
pub struct PeriodFixtures;

impl PeriodFixtures {
    pub fn spring_2025() -> AcademicPeriod {
        AcademicPeriod::new("2025 Spring").expect("valid fixture period")
    }

    pub fn fall_2025() -> AcademicPeriod {
        AcademicPeriod::new("2025 Fall").expect("valid fixture period")
    }

    pub fn winter_2026() -> AcademicPeriod {
        AcademicPeriod::new("2026 Winter").expect("valid fixture period")
    }

    /// Due date of the tuition fee
    pub fn tuition_due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid fixture date")
    }
}

/// The standard test school
#[derive(Debug, Clone)]
pub struct SchoolFixture {
    pub school_id: SchoolId,
    pub class_a: Class,
    pub class_b: Class,
    /// 100.00, every class
    pub tuition: FeeType,
    /// 50.00, class A only
    pub books: FeeType,
    pub teacher: Collector,
    pub admin: Collector,
}

impl Default for SchoolFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl SchoolFixture {
    pub fn new() -> Self {
        let school_id = SchoolId::new();
        let class_a = Class::new("Class A", "5");
        let class_b = Class::new("Class B", "5");

        let tuition = FeeType::new(school_id, "Tuition", Money::from_major(100))
            .with_description("Termly tuition")
            .with_due_date(PeriodFixtures::tuition_due());
        let books = FeeType::new(school_id, "Books", Money::from_major(50)).for_classes([class_a.id]);

        Self {
            school_id,
            class_a,
            class_b,
            tuition,
            books,
            teacher: Collector {
                id: CollectorId::new(),
                name: "Ms. Hopper".to_string(),
                role: CollectorRole::Teacher,
            },
            admin: Collector {
                id: CollectorId::new(),
                name: "Mr. Babbage".to_string(),
                role: CollectorRole::Admin,
            },
        }
    }

    pub fn fee_types(&self) -> Vec<FeeType> {
        vec![self.tuition.clone(), self.books.clone()]
    }

    pub fn catalog(&self) -> FeeCatalog {
        FeeCatalog::new(self.fee_types())
    }

    pub fn student_in_a(&self, name: &str, code: &str) -> Student {
        Student::new(self.class_a.id, name, code)
    }

    pub fn student_in_b(&self, name: &str, code: &str) -> Student {
        Student::new(self.class_b.id, name, code)
    }

    /// In-memory stores seeded with this school's catalog and collectors
    pub async fn stores(&self) -> MemoryStores {
        let collectors = InMemoryCollectorDirectory::new();
        collectors.add(self.school_id, self.teacher.clone()).await;
        collectors.add(self.school_id, self.admin.clone()).await;

        MemoryStores {
            records: InMemoryFeeRecordStore::new(),
            catalog: InMemoryCatalogStore::with_fee_types(self.fee_types()).await,
            collectors,
        }
    }
}

/// Handles to the in-memory stores behind a test ledger
///
/// The stores are cheap clones sharing state, so tests can keep these
/// handles to toggle availability after building the service.
#[derive(Clone)]
pub struct MemoryStores {
    pub records: InMemoryFeeRecordStore,
    pub catalog: InMemoryCatalogStore,
    pub collectors: InMemoryCollectorDirectory,
}

impl MemoryStores {
    pub fn ledger(&self) -> FeeLedgerService {
        FeeLedgerService::new(
            Arc::new(self.records.clone()),
            Arc::new(self.catalog.clone()),
            Arc::new(self.collectors.clone()),
        )
    }
}
