//! Fee catalog repository
//!
//! Reads fee types together with their applicable classes and class price
//! overrides. The catalog is maintained by administrative pages; nothing
//! here writes to it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

#[derive(Debug, Clone, FromRow)]
pub struct FeeTypeRow {
    pub fee_type_id: Uuid,
    pub school_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub is_active: bool,
    pub is_class_specific: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct FeeTypeClassRow {
    pub fee_type_id: Uuid,
    pub class_id: Uuid,
}

#[derive(Debug, Clone, FromRow)]
pub struct FeeTypeClassPriceRow {
    pub fee_type_id: Uuid,
    pub class_id: Uuid,
    pub amount: Decimal,
}

/// A school's catalog as three flat row sets
#[derive(Debug, Clone, Default)]
pub struct CatalogRows {
    pub fee_types: Vec<FeeTypeRow>,
    pub classes: Vec<FeeTypeClassRow>,
    pub prices: Vec<FeeTypeClassPriceRow>,
}

#[derive(Debug, Clone)]
pub struct FeeCatalogRepository {
    pool: PgPool,
}

impl FeeCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads every fee type of a school, in creation order
    pub async fn load_school(&self, school_id: Uuid) -> Result<CatalogRows, DatabaseError> {
        let fee_types = sqlx::query_as::<_, FeeTypeRow>(
            r#"
            SELECT fee_type_id, school_id, name, amount, due_date,
                   is_active, is_class_specific, description
            FROM fee_types
            WHERE school_id = $1
            ORDER BY created_at, fee_type_id
            "#,
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;

        let classes = sqlx::query_as::<_, FeeTypeClassRow>(
            r#"
            SELECT c.fee_type_id, c.class_id
            FROM fee_type_classes c
            JOIN fee_types f ON f.fee_type_id = c.fee_type_id
            WHERE f.school_id = $1
            "#,
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;

        let prices = sqlx::query_as::<_, FeeTypeClassPriceRow>(
            r#"
            SELECT p.fee_type_id, p.class_id, p.amount
            FROM fee_type_class_prices p
            JOIN fee_types f ON f.fee_type_id = p.fee_type_id
            WHERE f.school_id = $1
            "#,
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CatalogRows {
            fee_types,
            classes,
            prices,
        })
    }
}
