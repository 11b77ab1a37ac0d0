//! Repository implementations
//!
//! Repositories own the SQL and speak in row types (`Uuid`, `Decimal`,
//! `String`). Conversion to domain types happens in the adapters.
//!
//! Queries are built at runtime (`sqlx::query_as` with `FromRow`, and
//! `QueryBuilder` for optional filters) so the crate builds without a
//! live database.

pub mod fee_records;
pub mod fee_catalog;
pub mod collectors;

pub use fee_records::{FeeRecordFilter, FeeRecordRepository, FeeRecordRow, NewFeeRecordRow};
pub use fee_catalog::{CatalogRows, FeeCatalogRepository, FeeTypeClassPriceRow, FeeTypeClassRow, FeeTypeRow};
pub use collectors::{CollectorRepository, CollectorRow};
