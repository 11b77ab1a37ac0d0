//! Collector directory repository
//!
//! Teachers and admins live in separate tables; the directory is their
//! union tagged with the role.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

#[derive(Debug, Clone, FromRow)]
pub struct CollectorRow {
    pub collector_id: Uuid,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct CollectorRepository {
    pool: PgPool,
}

impl CollectorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_school(&self, school_id: Uuid) -> Result<Vec<CollectorRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, CollectorRow>(
            r#"
            SELECT teacher_id AS collector_id, name, 'teacher' AS role
            FROM teachers
            WHERE school_id = $1
            UNION ALL
            SELECT admin_id AS collector_id, name, 'admin' AS role
            FROM admins
            WHERE school_id = $1
            "#,
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
