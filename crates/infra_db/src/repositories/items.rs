//! Found and lost item repository
//!
//! The `is_claimed` column of `found_items` is only ever changed through
//! [`ItemsRepository::try_mark_claimed`], a conditional update whose
//! `rows_affected` tells the caller whether it won.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database row for a found item report
#[derive(Debug, Clone, FromRow)]
pub struct FoundItemRow {
    pub found_item_id: Uuid,
    pub reporter_id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub location_found: String,
    pub time_found: DateTime<Utc>,
    pub contact_email: String,
    pub contact_phone: String,
    pub security_question: String,
    pub is_claimed: bool,
    pub created_at: DateTime<Utc>,
}

/// Database row for a lost item report
#[derive(Debug, Clone, FromRow)]
pub struct LostItemRow {
    pub lost_item_id: Uuid,
    pub reporter_id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub location_lost: String,
    pub time_lost: DateTime<Utc>,
    pub contact_email: String,
    pub contact_phone: String,
    pub reward: Option<String>,
    pub is_claimed: bool,
    pub created_at: DateTime<Utc>,
}

/// Combined found and lost count for one category
#[derive(Debug, Clone, FromRow)]
pub struct CategoryCountRow {
    pub category: String,
    pub count: i64,
}

/// Repository for found and lost item reports
#[derive(Debug, Clone)]
pub struct ItemsRepository {
    pool: PgPool,
}

impl ItemsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a found item by id
    pub async fn get_found(&self, id: Uuid) -> Result<FoundItemRow, DatabaseError> {
        sqlx::query_as::<_, FoundItemRow>(
            r#"
            SELECT
                found_item_id, reporter_id, name, category, description,
                location_found, time_found, contact_email, contact_phone,
                security_question, is_claimed, created_at
            FROM found_items
            WHERE found_item_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("FoundItem", id))
    }

    /// Retrieves a lost item by id
    pub async fn get_lost(&self, id: Uuid) -> Result<LostItemRow, DatabaseError> {
        sqlx::query_as::<_, LostItemRow>(
            r#"
            SELECT
                lost_item_id, reporter_id, name, category, description,
                location_lost, time_lost, contact_email, contact_phone,
                reward, is_claimed, created_at
            FROM lost_items
            WHERE lost_item_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("LostItem", id))
    }

    pub async fn insert_found(&self, row: &FoundItemRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO found_items (
                found_item_id, reporter_id, name, category, description,
                location_found, time_found, contact_email, contact_phone,
                security_question, is_claimed, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(row.found_item_id)
        .bind(row.reporter_id)
        .bind(&row.name)
        .bind(&row.category)
        .bind(&row.description)
        .bind(&row.location_found)
        .bind(row.time_found)
        .bind(&row.contact_email)
        .bind(&row.contact_phone)
        .bind(&row.security_question)
        .bind(row.is_claimed)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert_lost(&self, row: &LostItemRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO lost_items (
                lost_item_id, reporter_id, name, category, description,
                location_lost, time_lost, contact_email, contact_phone,
                reward, is_claimed, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(row.lost_item_id)
        .bind(row.reporter_id)
        .bind(&row.name)
        .bind(&row.category)
        .bind(&row.description)
        .bind(&row.location_lost)
        .bind(row.time_lost)
        .bind(&row.contact_email)
        .bind(&row.contact_phone)
        .bind(&row.reward)
        .bind(row.is_claimed)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Flips `is_claimed` to `!expected` if it currently equals `expected`
    ///
    /// Returns `Ok(false)` when the row exists but held the other value, and
    /// `NotFound` when there is no such row.
    pub async fn try_mark_claimed(&self, id: Uuid, expected: bool) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE found_items
            SET is_claimed = NOT is_claimed
            WHERE found_item_id = $1 AND is_claimed = $2
            "#,
        )
        .bind(id)
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        // distinguish a lost race from a missing row
        self.get_found(id).await?;
        Ok(false)
    }

    /// Unconditionally marks a lost item as claimed
    pub async fn mark_lost_claimed(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE lost_items
            SET is_claimed = TRUE
            WHERE lost_item_id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("LostItem", id));
        }
        Ok(())
    }

    /// Sets the lost item's status and returns the updated row
    pub async fn set_lost_claimed(&self, id: Uuid, claimed: bool) -> Result<LostItemRow, DatabaseError> {
        sqlx::query_as::<_, LostItemRow>(
            r#"
            UPDATE lost_items
            SET is_claimed = $2
            WHERE lost_item_id = $1
            RETURNING
                lost_item_id, reporter_id, name, category, description,
                location_lost, time_lost, contact_email, contact_phone,
                reward, is_claimed, created_at
            "#,
        )
        .bind(id)
        .bind(claimed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("LostItem", id))
    }

    pub async fn found_by_reporter(&self, reporter_id: Uuid) -> Result<Vec<FoundItemRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, FoundItemRow>(
            r#"
            SELECT
                found_item_id, reporter_id, name, category, description,
                location_found, time_found, contact_email, contact_phone,
                security_question, is_claimed, created_at
            FROM found_items
            WHERE reporter_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(reporter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn lost_by_reporter(&self, reporter_id: Uuid) -> Result<Vec<LostItemRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, LostItemRow>(
            r#"
            SELECT
                lost_item_id, reporter_id, name, category, description,
                location_lost, time_lost, contact_email, contact_phone,
                reward, is_claimed, created_at
            FROM lost_items
            WHERE reporter_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(reporter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Unclaimed found items, newest first
    pub async fn available_found(&self) -> Result<Vec<FoundItemRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, FoundItemRow>(
            r#"
            SELECT
                found_item_id, reporter_id, name, category, description,
                location_found, time_found, contact_email, contact_phone,
                security_question, is_claimed, created_at
            FROM found_items
            WHERE NOT is_claimed
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Unclaimed lost items, newest first
    pub async fn available_lost(&self) -> Result<Vec<LostItemRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, LostItemRow>(
            r#"
            SELECT
                lost_item_id, reporter_id, name, category, description,
                location_lost, time_lost, contact_email, contact_phone,
                reward, is_claimed, created_at
            FROM lost_items
            WHERE NOT is_claimed
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Categories with the most found and lost reports dated at or after `since`
    ///
    /// Found items count by `time_found`, lost items by `time_lost`. Ties are
    /// broken alphabetically.
    pub async fn trending_categories(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<CategoryCountRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r#"
            SELECT category, COUNT(*)::BIGINT AS count
            FROM (
                SELECT category FROM found_items WHERE time_found >= $1
                UNION ALL
                SELECT category FROM lost_items WHERE time_lost >= $1
            ) recent
            GROUP BY category
            ORDER BY count DESC, category ASC
            LIMIT $2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
