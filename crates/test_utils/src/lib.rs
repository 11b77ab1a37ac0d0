//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! fee ledger test suites.
//!
//! # Modules
//!
//! - `fixtures`: A standard school with its catalog and in-memory stores
//! - `builders`: Builder patterns for fee types, students and records
//! - `database`: PostgreSQL container management for adapter tests
//! - `assertions`: Custom assertion helpers for ledger results
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
