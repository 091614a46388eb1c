//! MySQL record store
//!
//! Durable implementation of the record store backed by a single
//! `verification_records` table. The primary key on `identity` carries the
//! one-record-per-identity constraint; `INSERT ... ON DUPLICATE KEY UPDATE`
//! makes the issue-time overwrite a single atomic statement, and the
//! full-row `UPDATE` in `save` is the atomic replace the redeem path
//! relies on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool, Row};
use tracing::{debug, error, info};
use uuid::Uuid;

use mp_core::domain::entities::VerificationRecord;
use mp_core::errors::{StoreError, StoreResult};
use mp_core::repositories::record::{PendingCredential, RecordStore};
use mp_shared::utils::email::mask_email;

/// MySQL-backed record store
pub struct MySqlRecordStore {
    /// Database connection pool
    pool: Pool<MySql>,
}

impl MySqlRecordStore {
    /// Create a new record store on the given pool
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    fn map_row(row: &MySqlRow) -> StoreResult<VerificationRecord> {
        let id: String = row.try_get("id").map_err(StoreError::transient)?;
        let id = Uuid::parse_str(&id).map_err(StoreError::transient)?;

        Ok(VerificationRecord {
            id,
            identity: row.try_get("identity").map_err(StoreError::transient)?,
            credential: row.try_get("credential").map_err(StoreError::transient)?,
            expires_at: row.try_get("expires_at").map_err(StoreError::transient)?,
            verified: row.try_get("verified").map_err(StoreError::transient)?,
            attempts: row.try_get("attempts").map_err(StoreError::transient)?,
            created_at: row.try_get("created_at").map_err(StoreError::transient)?,
            updated_at: row.try_get("updated_at").map_err(StoreError::transient)?,
        })
    }

    fn map_sqlx_error(err: sqlx::Error) -> StoreError {
        if let Some(db_err) = err.as_database_error() {
            // MySQL 1062: duplicate entry for a unique key
            if db_err.code().as_deref() == Some("23000") || db_err.message().contains("Duplicate")
            {
                return StoreError::ConstraintViolation {
                    message: db_err.message().to_string(),
                };
            }
        }
        StoreError::transient(err)
    }
}

#[async_trait]
impl RecordStore for MySqlRecordStore {
    async fn upsert(
        &self,
        identity: &str,
        pending: PendingCredential,
    ) -> StoreResult<VerificationRecord> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let query = r#"
            INSERT INTO verification_records
                (id, identity, credential, expires_at, verified, attempts, created_at, updated_at)
            VALUES (?, ?, ?, ?, FALSE, 0, ?, ?)
            ON DUPLICATE KEY UPDATE
                credential = VALUES(credential),
                expires_at = VALUES(expires_at),
                verified = FALSE,
                attempts = 0,
                updated_at = VALUES(updated_at)
        "#;

        sqlx::query(query)
            .bind(id.to_string())
            .bind(identity)
            .bind(&pending.value)
            .bind(pending.expires_at)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    identity = %mask_email(identity),
                    error = %e,
                    "Failed to upsert verification record"
                );
                Self::map_sqlx_error(e)
            })?;

        info!(
            identity = %mask_email(identity),
            "Stored pending verification record"
        );

        // Re-read for the bookkeeping fields (id and created_at survive a
        // replace); the caller never uses this row for the credential value.
        self.find(identity).await?.ok_or(StoreError::NotFound)
    }

    async fn find(&self, identity: &str) -> StoreResult<Option<VerificationRecord>> {
        let query = r#"
            SELECT id, identity, credential, expires_at, verified, attempts,
                   created_at, updated_at
            FROM verification_records
            WHERE identity = ?
        "#;

        let row = sqlx::query(query)
            .bind(identity)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_sqlx_error)?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn find_by_credential(&self, value: &str) -> StoreResult<Option<VerificationRecord>> {
        let query = r#"
            SELECT id, identity, credential, expires_at, verified, attempts,
                   created_at, updated_at
            FROM verification_records
            WHERE credential = ?
        "#;

        let row = sqlx::query(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_sqlx_error)?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn save(&self, record: VerificationRecord) -> StoreResult<VerificationRecord> {
        let query = r#"
            UPDATE verification_records
            SET credential = ?, expires_at = ?, verified = ?, attempts = ?, updated_at = ?
            WHERE identity = ?
        "#;

        let result = sqlx::query(query)
            .bind(&record.credential)
            .bind(record.expires_at)
            .bind(record.verified)
            .bind(record.attempts)
            .bind(record.updated_at)
            .bind(&record.identity)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    identity = %mask_email(&record.identity),
                    error = %e,
                    "Failed to save verification record"
                );
                Self::map_sqlx_error(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        debug!(
            identity = %mask_email(&record.identity),
            attempts = record.attempts,
            verified = record.verified,
            "Saved verification record state"
        );

        Ok(record)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let query = r#"
            DELETE FROM verification_records
            WHERE verified = FALSE
              AND expires_at IS NOT NULL
              AND expires_at <= ?
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(Self::map_sqlx_error)?;

        let purged = result.rows_affected();
        if purged > 0 {
            info!(purged, "Purged expired verification records");
        }

        Ok(purged)
    }
}
