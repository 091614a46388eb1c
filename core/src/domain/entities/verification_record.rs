//! Verification record entity for email ownership verification.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of redemption attempts allowed per credential
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default expiration time for issued credentials (5 minutes)
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// Persistent verification state for one email identity.
///
/// At most one record exists per identity. `credential` and `expires_at` are
/// both present while a verification is pending and both absent otherwise;
/// a verified record holds no redeemable secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Normalized email address this record is bound to
    pub identity: String,

    /// The pending secret matched on redemption; cleared on success
    pub credential: Option<String>,

    /// Timestamp after which the pending credential is no longer redeemable
    pub expires_at: Option<DateTime<Utc>>,

    /// Whether the identity has been successfully verified
    pub verified: bool,

    /// Redemption attempts made against the current credential
    pub attempts: u32,

    /// Timestamp when the record was first created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last mutation
    pub updated_at: DateTime<Utc>,
}

/// Outcome of applying a redemption to a record.
///
/// `LockedOut`, `Mismatch`, and `Verified` carry a state change that must be
/// persisted before the outcome is reported; `AlreadyVerified` and `Expired`
/// leave the record untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemTransition {
    /// The record was already verified; redemption is idempotent
    AlreadyVerified,
    /// The pending credential is past its expiry; no attempt is consumed
    Expired,
    /// The attempt ceiling was exceeded; only a fresh issue recovers
    LockedOut,
    /// The presented value did not match; an attempt was consumed
    Mismatch,
    /// The presented value matched; the record is now verified
    Verified,
}

impl RedeemTransition {
    /// Whether this transition mutated the record and must be persisted
    pub fn requires_persist(&self) -> bool {
        matches!(
            self,
            RedeemTransition::LockedOut | RedeemTransition::Mismatch | RedeemTransition::Verified
        )
    }
}

impl VerificationRecord {
    /// Create a fresh pending record for an identity.
    pub fn pending(
        identity: impl Into<String>,
        credential: impl Into<String>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity: identity.into(),
            credential: Some(credential.into()),
            expires_at: Some(expires_at),
            verified: false,
            attempts: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-issue a credential onto an existing record.
    ///
    /// Overwrites all pending state: the previous credential (if any) is
    /// invalidated, `verified` is cleared, and `attempts` resets to 0.
    /// `id`, `identity`, and `created_at` are preserved.
    pub fn reissued(
        &self,
        credential: impl Into<String>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: self.id,
            identity: self.identity.clone(),
            credential: Some(credential.into()),
            expires_at: Some(expires_at),
            verified: false,
            attempts: 0,
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Whether a credential is pending on this record
    pub fn is_pending(&self) -> bool {
        self.credential.is_some() && !self.verified
    }

    /// Whether the pending credential has expired at `now`
    ///
    /// A record with no expiry set is treated as expired: there is nothing
    /// left to redeem.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now > expires_at,
            None => true,
        }
    }

    /// Remaining attempts before the ceiling, given the configured maximum
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    /// Adjudicate a redemption attempt against this record.
    ///
    /// Pure next-state function: returns the record as it must be persisted
    /// together with the transition taken, without mutating `self`. The
    /// ordering is fixed: already-verified short-circuits idempotently,
    /// expiry is checked before the attempt counter moves, and the counter
    /// moves before the credential comparison so a mismatch is always
    /// accounted for. The comparison itself is constant-time.
    pub fn apply_redeem(
        &self,
        presented: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> (Self, RedeemTransition) {
        if self.verified {
            return (self.clone(), RedeemTransition::AlreadyVerified);
        }

        if self.is_expired(now) {
            return (self.clone(), RedeemTransition::Expired);
        }

        let mut next = self.clone();
        next.attempts += 1;
        next.updated_at = now;

        if next.attempts > max_attempts {
            return (next, RedeemTransition::LockedOut);
        }

        let matched = match &self.credential {
            Some(stored) => {
                stored.len() == presented.len()
                    && constant_time_eq(stored.as_bytes(), presented.as_bytes())
            }
            None => false,
        };

        if matched {
            next.verified = true;
            next.credential = None;
            next.expires_at = None;
            next.attempts = 0;
            (next, RedeemTransition::Verified)
        } else {
            (next, RedeemTransition::Mismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn pending_record(credential: &str) -> VerificationRecord {
        let now = Utc::now();
        VerificationRecord::pending(
            "user@example.com",
            credential,
            now + Duration::minutes(DEFAULT_TTL_MINUTES),
            now,
        )
    }

    #[test]
    fn test_pending_record() {
        let record = pending_record("123456");

        assert_eq!(record.identity, "user@example.com");
        assert_eq!(record.credential.as_deref(), Some("123456"));
        assert!(record.expires_at.is_some());
        assert!(!record.verified);
        assert_eq!(record.attempts, 0);
        assert!(record.is_pending());
        assert!(!record.is_expired(Utc::now()));
    }

    #[test]
    fn test_redeem_success_clears_pending_fields() {
        let record = pending_record("123456");

        let (next, transition) = record.apply_redeem("123456", Utc::now(), DEFAULT_MAX_ATTEMPTS);

        assert_eq!(transition, RedeemTransition::Verified);
        assert!(transition.requires_persist());
        assert!(next.verified);
        assert!(next.credential.is_none());
        assert!(next.expires_at.is_none());
        assert_eq!(next.attempts, 0);
        // the input record is untouched
        assert!(!record.verified);
    }

    #[test]
    fn test_redeem_mismatch_consumes_attempt() {
        let record = pending_record("123456");

        let (next, transition) = record.apply_redeem("000000", Utc::now(), DEFAULT_MAX_ATTEMPTS);

        assert_eq!(transition, RedeemTransition::Mismatch);
        assert!(transition.requires_persist());
        assert_eq!(next.attempts, 1);
        assert!(!next.verified);
        assert_eq!(next.credential.as_deref(), Some("123456"));
        assert_eq!(next.remaining_attempts(DEFAULT_MAX_ATTEMPTS), 4);
    }

    #[test]
    fn test_redeem_already_verified_is_idempotent() {
        let record = pending_record("123456");
        let (verified, _) = record.apply_redeem("123456", Utc::now(), DEFAULT_MAX_ATTEMPTS);

        let (next, transition) =
            verified.apply_redeem("123456", Utc::now(), DEFAULT_MAX_ATTEMPTS);

        assert_eq!(transition, RedeemTransition::AlreadyVerified);
        assert!(!transition.requires_persist());
        assert_eq!(next, verified);
    }

    #[test]
    fn test_redeem_expired_consumes_no_attempt() {
        let now = Utc::now();
        let record = VerificationRecord::pending(
            "user@example.com",
            "123456",
            now - Duration::seconds(1),
            now - Duration::minutes(DEFAULT_TTL_MINUTES),
        );

        // even the byte-identical value must not match once expired
        let (next, transition) = record.apply_redeem("123456", now, DEFAULT_MAX_ATTEMPTS);

        assert_eq!(transition, RedeemTransition::Expired);
        assert!(!transition.requires_persist());
        assert_eq!(next.attempts, 0);
        assert!(!next.verified);
    }

    #[test]
    fn test_locked_out_after_ceiling() {
        let mut record = pending_record("123456");
        let now = Utc::now();

        for i in 1..=DEFAULT_MAX_ATTEMPTS {
            let (next, transition) = record.apply_redeem("000000", now, DEFAULT_MAX_ATTEMPTS);
            assert_eq!(transition, RedeemTransition::Mismatch);
            assert_eq!(next.attempts, i);
            record = next;
        }

        // ceiling reached: even the correct value is refused now
        let (next, transition) = record.apply_redeem("123456", now, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(transition, RedeemTransition::LockedOut);
        assert!(transition.requires_persist());
        assert_eq!(next.attempts, DEFAULT_MAX_ATTEMPTS + 1);
        assert!(!next.verified);
    }

    #[test]
    fn test_reissue_resets_pending_state() {
        let record = pending_record("123456");
        let now = Utc::now();
        let (locked, _) = record.apply_redeem("000000", now, DEFAULT_MAX_ATTEMPTS);

        let expires_at = now + Duration::minutes(DEFAULT_TTL_MINUTES);
        let reissued = locked.reissued("654321", expires_at, now);

        assert_eq!(reissued.id, record.id);
        assert_eq!(reissued.created_at, record.created_at);
        assert_eq!(reissued.credential.as_deref(), Some("654321"));
        assert_eq!(reissued.attempts, 0);
        assert!(!reissued.verified);

        // the old credential no longer matches
        let (_, transition) = reissued.apply_redeem("123456", now, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(transition, RedeemTransition::Mismatch);
    }

    #[test]
    fn test_reissue_after_verification() {
        let record = pending_record("123456");
        let now = Utc::now();
        let (verified, _) = record.apply_redeem("123456", now, DEFAULT_MAX_ATTEMPTS);

        let expires_at = now + Duration::minutes(DEFAULT_TTL_MINUTES);
        let reissued = verified.reissued("654321", expires_at, now);

        assert!(!reissued.verified);
        assert!(reissued.is_pending());
        assert_eq!(reissued.attempts, 0);
    }

    #[test]
    fn test_length_mismatch_is_plain_mismatch() {
        let record = pending_record("123456");

        let (next, transition) = record.apply_redeem("123", Utc::now(), DEFAULT_MAX_ATTEMPTS);

        assert_eq!(transition, RedeemTransition::Mismatch);
        assert_eq!(next.attempts, 1);
    }

    #[test]
    fn test_serialization_round_trip() {
        let record = pending_record("123456");

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: VerificationRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
