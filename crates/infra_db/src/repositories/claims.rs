//! Claims repository implementation
//!
//! Warranty claims and their append-only timeline. Every write that touches
//! both tables runs in a single transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Claim status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "kebab-case")]
pub enum ClaimStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

/// Issue type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "issue_type", rename_all = "lowercase")]
pub enum IssueType {
    Hardware,
    Software,
    Connectivity,
    Power,
    Display,
    Audio,
    Other,
}

/// Contact preference enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "contact_preference", rename_all = "lowercase")]
pub enum ContactPreference {
    Email,
    Phone,
    Sms,
}

/// Timeline entry kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "timeline_kind", rename_all = "kebab-case")]
pub enum TimelineKind {
    Created,
    StatusChange,
    Message,
}

/// Message sender enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "message_sender", rename_all = "lowercase")]
pub enum MessageSender {
    Customer,
    Business,
}

/// Database row for claim
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClaimRow {
    pub claim_id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub registration_id: Uuid,
    pub issue_type: IssueType,
    pub description: String,
    pub contact_preference: ContactPreference,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for timeline entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TimelineRow {
    pub entry_id: Uuid,
    pub claim_id: Uuid,
    pub kind: TimelineKind,
    pub description: String,
    pub sender: Option<MessageSender>,
    pub created_at: DateTime<Utc>,
}

const CLAIM_COLUMNS: &str = "claim_id, product_id, customer_id, registration_id, issue_type, \
     description, contact_preference, status, created_at, updated_at";

/// Repository for managing claims data
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a claim together with its first timeline entry
    pub async fn create_with_entry(&self, claim: &ClaimRow, entry: &TimelineRow) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO warranty_claims (
                claim_id, product_id, customer_id, registration_id, issue_type,
                description, contact_preference, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(claim.claim_id)
        .bind(claim.product_id)
        .bind(claim.customer_id)
        .bind(claim.registration_id)
        .bind(claim.issue_type)
        .bind(&claim.description)
        .bind(claim.contact_preference)
        .bind(claim.status)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_entry(&mut tx, entry).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Retrieves a claim by its identifier
    pub async fn get_by_id(&self, claim_id: Uuid) -> Result<ClaimRow, DatabaseError> {
        let sql = format!("SELECT {} FROM warranty_claims WHERE claim_id = $1", CLAIM_COLUMNS);
        sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("WarrantyClaim", claim_id))
    }

    /// A customer's claims, newest first
    pub async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM warranty_claims WHERE customer_id = $1 \
             ORDER BY created_at DESC, claim_id DESC",
            CLAIM_COLUMNS
        );
        let rows = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Claims against any of the given products, newest first
    pub async fn find_by_products(&self, product_ids: &[Uuid]) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM warranty_claims WHERE product_id = ANY($1) \
             ORDER BY created_at DESC, claim_id DESC",
            CLAIM_COLUMNS
        );
        let rows = sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(product_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// A claim's timeline, oldest entry first
    pub async fn timeline(&self, claim_id: Uuid) -> Result<Vec<TimelineRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, TimelineRow>(
            r#"
            SELECT entry_id, claim_id, kind, description, sender, created_at
            FROM claim_timeline
            WHERE claim_id = $1
            ORDER BY created_at, entry_id
            "#,
        )
        .bind(claim_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Updates a claim's status if it still equals `expected`, appending the
    /// status-change entry in the same transaction
    pub async fn update_status(
        &self,
        claim_id: Uuid,
        expected: ClaimStatus,
        status: ClaimStatus,
        updated_at: DateTime<Utc>,
        entry: &TimelineRow,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE warranty_claims
            SET status = $1, updated_at = $2
            WHERE claim_id = $3 AND status = $4
            "#,
        )
        .bind(status)
        .bind(updated_at)
        .bind(claim_id)
        .bind(expected)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            debug!(%claim_id, ?expected, "Status guard matched no row");
            tx.rollback().await?;
            let exists: Option<Uuid> =
                sqlx::query_scalar("SELECT claim_id FROM warranty_claims WHERE claim_id = $1")
                    .bind(claim_id)
                    .fetch_optional(&self.pool)
                    .await?;
            return Err(match exists {
                Some(_) => DatabaseError::StaleWrite(format!("Claim {} status changed", claim_id)),
                None => DatabaseError::not_found("WarrantyClaim", claim_id),
            });
        }

        insert_entry(&mut tx, entry).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Appends a timeline entry to an existing claim
    pub async fn append_entry(&self, entry: &TimelineRow) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        insert_entry(&mut tx, entry).await.map_err(|e| match e {
            DatabaseError::ForeignKeyViolation(_) => DatabaseError::not_found("WarrantyClaim", entry.claim_id),
            other => other,
        })?;
        tx.commit().await?;
        Ok(())
    }
}

async fn insert_entry(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    entry: &TimelineRow,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO claim_timeline (entry_id, claim_id, kind, description, sender, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(entry.entry_id)
    .bind(entry.claim_id)
    .bind(entry.kind)
    .bind(&entry.description)
    .bind(entry.sender)
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
