//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the fee ledger using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! return row types, adapters implement the `domain_fees` ports on top of
//! them and translate errors into `PortError`.
//!
//! # Tables
//!
//! - `fee_types`, `fee_type_classes`, `fee_type_class_prices`: the catalog
//! - `fee_records`: append-only payment events
//! - `teachers`, `admins`: read as the collector directory
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresFeeRecordStore;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/school_fees")).await?;
//! run_migrations(&pool).await?;
//! let records = PostgresFeeRecordStore::new(pool.clone());
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::{db_to_port_error, DatabaseError};
pub use adapters::{PostgresCatalogStore, PostgresCollectorDirectory, PostgresFeeRecordStore};
