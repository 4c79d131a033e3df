//! Successful returns repository
//!
//! Append-only. The unique constraint on `found_item_id` keeps a second
//! record for the same item out even if a caller misbehaves.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database row for a successful return
#[derive(Debug, Clone, FromRow)]
pub struct ReturnRow {
    pub return_id: Uuid,
    pub claim_id: Uuid,
    pub found_item_id: Uuid,
    pub lost_item_id: Option<Uuid>,
    pub return_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ReturnsRepository {
    pool: PgPool,
}

impl ReturnsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, row: &ReturnRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO successful_returns (
                return_id, claim_id, found_item_id, lost_item_id, return_date
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(row.return_id)
        .bind(row.claim_id)
        .bind(row.found_item_id)
        .bind(row.lost_item_id)
        .bind(row.return_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_found_item(&self, found_item_id: Uuid) -> Result<Vec<ReturnRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ReturnRow>(
            r#"
            SELECT return_id, claim_id, found_item_id, lost_item_id, return_date
            FROM successful_returns
            WHERE found_item_id = $1
            "#,
        )
        .bind(found_item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Returns referencing any of the found items or any of the lost items
    pub async fn find_involving(
        &self,
        found_item_ids: &[Uuid],
        lost_item_ids: &[Uuid],
    ) -> Result<Vec<ReturnRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ReturnRow>(
            r#"
            SELECT return_id, claim_id, found_item_id, lost_item_id, return_date
            FROM successful_returns
            WHERE found_item_id = ANY($1) OR lost_item_id = ANY($2)
            ORDER BY return_date DESC
            "#,
        )
        .bind(found_item_ids)
        .bind(lost_item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
