//! Claims repository implementation
//!
//! This module provides database access for claims: pending inserts guarded
//! by a partial unique index, conditional status updates, and the
//! transactional acceptance that spans claims, found items and returns.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repositories::returns::ReturnRow;

/// Database row for a claim
#[derive(Debug, Clone, FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub found_item_id: Uuid,
    pub lost_item_id: Option<Uuid>,
    pub claimant_id: Uuid,
    pub answer: String,
    /// One of `pending`, `accepted`, `rejected`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Outcome of [`ClaimsRepository::accept_with_return`]
#[derive(Debug, Clone)]
pub enum AcceptanceResult {
    Accepted(ClaimRow),
    ItemAlreadyClaimed,
    ClaimNoLongerPending,
}

/// Repository for managing claims data
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a claim by its identifier
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimRow, DatabaseError> {
        sqlx::query_as::<_, ClaimRow>(
            r#"
            SELECT
                claim_id, found_item_id, lost_item_id, claimant_id, answer,
                status, created_at, resolved_at
            FROM claims
            WHERE claim_id = $1
            "#,
        )
        .bind(claim_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Claim", claim_id))
    }

    /// Inserts a pending claim
    ///
    /// A second pending claim by the same claimant on the same item violates
    /// `uq_claims_pending_per_claimant` and fails with `DuplicateEntry`.
    pub async fn insert_pending(&self, row: &ClaimRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO claims (
                claim_id, found_item_id, lost_item_id, claimant_id, answer,
                status, created_at, resolved_at
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, NULL)
            "#,
        )
        .bind(row.claim_id)
        .bind(row.found_item_id)
        .bind(row.lost_item_id)
        .bind(row.claimant_id)
        .bind(&row.answer)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Conditional status update
    ///
    /// Returns `None` if the claim exists but its status was not `from`.
    pub async fn try_transition(
        &self,
        claim_id: Uuid,
        from: &str,
        to: &str,
    ) -> Result<Option<ClaimRow>, DatabaseError> {
        let updated = sqlx::query_as::<_, ClaimRow>(
            r#"
            UPDATE claims
            SET status = $3, resolved_at = NOW()
            WHERE claim_id = $1 AND status = $2
            RETURNING
                claim_id, found_item_id, lost_item_id, claimant_id, answer,
                status, created_at, resolved_at
            "#,
        )
        .bind(claim_id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_none() {
            self.get_by_id(claim_id).await?;
        }
        Ok(updated)
    }

    /// Claims submitted by a claimant, newest first
    pub async fn find_by_claimant(&self, claimant_id: Uuid) -> Result<Vec<ClaimRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ClaimRow>(
            r#"
            SELECT
                claim_id, found_item_id, lost_item_id, claimant_id, answer,
                status, created_at, resolved_at
            FROM claims
            WHERE claimant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(claimant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Claims on any of the given found items, newest first
    pub async fn find_by_found_items(&self, found_item_ids: &[Uuid]) -> Result<Vec<ClaimRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ClaimRow>(
            r#"
            SELECT
                claim_id, found_item_id, lost_item_id, claimant_id, answer,
                status, created_at, resolved_at
            FROM claims
            WHERE found_item_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(found_item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Accepts a claim and records its return in one transaction
    ///
    /// Reserves the found item, moves the claim from `pending` to `accepted`,
    /// inserts the return row and flags the lost item if one is referenced.
    /// Nothing is committed unless every step succeeds.
    pub async fn accept_with_return(&self, record: &ReturnRow) -> Result<AcceptanceResult, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let reserved = sqlx::query(
            r#"
            UPDATE found_items
            SET is_claimed = TRUE
            WHERE found_item_id = $1 AND is_claimed = FALSE
            "#,
        )
        .bind(record.found_item_id)
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(AcceptanceResult::ItemAlreadyClaimed);
        }

        let accepted = sqlx::query_as::<_, ClaimRow>(
            r#"
            UPDATE claims
            SET status = 'accepted', resolved_at = $2
            WHERE claim_id = $1 AND status = 'pending'
            RETURNING
                claim_id, found_item_id, lost_item_id, claimant_id, answer,
                status, created_at, resolved_at
            "#,
        )
        .bind(record.claim_id)
        .bind(record.return_date)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(accepted) = accepted else {
            tx.rollback().await?;
            return Ok(AcceptanceResult::ClaimNoLongerPending);
        };

        sqlx::query(
            r#"
            INSERT INTO successful_returns (
                return_id, claim_id, found_item_id, lost_item_id, return_date
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.return_id)
        .bind(record.claim_id)
        .bind(record.found_item_id)
        .bind(record.lost_item_id)
        .bind(record.return_date)
        .execute(&mut *tx)
        .await?;

        if let Some(lost_item_id) = record.lost_item_id {
            sqlx::query(
                r#"
                UPDATE lost_items
                SET is_claimed = TRUE
                WHERE lost_item_id = $1
                "#,
            )
            .bind(lost_item_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(AcceptanceResult::Accepted(accepted))
    }
}
