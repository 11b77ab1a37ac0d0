//! Core Kernel - Foundational types for the school fee ledger
//!
//! This crate provides the building blocks shared by the domain, storage and
//! HTTP crates:
//! - Money with precise decimal arithmetic
//! - Strongly-typed identifiers for schools, students, classes and fees
//! - Academic period labels with chronological ordering
//! - The port error model and health-check traits implemented by adapters

pub mod money;
pub mod period;
pub mod identifiers;
pub mod ports;

pub use money::{Money, MoneyError};
pub use period::{AcademicPeriod, PeriodError, Term};
pub use identifiers::{
    SchoolId, StudentId, ClassId, FeeTypeId, FeeRecordId, CollectorId,
};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
