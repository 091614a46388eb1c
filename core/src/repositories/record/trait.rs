//! Record store trait defining the interface for verification record
//! persistence.
//!
//! The store is the sole arbiter of concurrent access: `upsert` and `save`
//! are atomic whole-record writes, and identity uniqueness is enforced here
//! as a hard constraint rather than by callers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::VerificationRecord;
use crate::errors::StoreResult;

/// The pending fields written by an issue operation.
#[derive(Debug, Clone)]
pub struct PendingCredential {
    /// The freshly generated secret
    pub value: String,
    /// When the secret stops being redeemable
    pub expires_at: DateTime<Utc>,
}

/// Repository trait for verification record persistence.
///
/// Implementations must guarantee that `upsert` is an atomic
/// create-or-replace keyed on the identity, and that `save` replaces the
/// whole record in a single write. There is exactly one record per identity
/// at any time.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Atomically create or overwrite the pending state for an identity.
    ///
    /// On an existing record this invalidates any prior credential, clears
    /// `verified`, and resets `attempts`; `created_at` is preserved. Two
    /// racing upserts leave the record wholly matching one of them.
    ///
    /// # Errors
    /// * `ConstraintViolation` - a uniqueness conflict the caller may retry
    /// * `Transient` - storage failure
    async fn upsert(
        &self,
        identity: &str,
        pending: PendingCredential,
    ) -> StoreResult<VerificationRecord>;

    /// Find the record for a normalized identity.
    async fn find(&self, identity: &str) -> StoreResult<Option<VerificationRecord>>;

    /// Find the record holding the given pending credential value.
    ///
    /// Used in token mode, where the unguessable token doubles as the
    /// lookup key. A consumed or replaced credential no longer resolves.
    async fn find_by_credential(&self, value: &str) -> StoreResult<Option<VerificationRecord>>;

    /// Persist a mutated record as a single atomic replace.
    ///
    /// # Errors
    /// * `NotFound` - the record no longer exists
    /// * `Transient` - storage failure
    async fn save(&self, record: VerificationRecord) -> StoreResult<VerificationRecord>;

    /// Remove expired, never-verified records.
    ///
    /// Housekeeping only: redemption re-checks expiry regardless of whether
    /// a purge has run. Returns the number of records removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> StoreResult<u64>;
}
