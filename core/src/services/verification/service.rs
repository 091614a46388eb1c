//! Main verification lifecycle service implementation

use chrono::Utc;
use std::sync::Arc;

use mp_shared::utils::email::{is_valid_email, mask_email, normalize_email};

use crate::domain::entities::{RedeemTransition, VerificationRecord};
use crate::errors::{StoreError, VerificationError, VerificationResult};
use crate::repositories::record::{PendingCredential, RecordStore};

use super::config::VerificationServiceConfig;
use super::generator::{CredentialGenerator, CredentialMode};
use super::traits::MailNotifier;
use super::types::{IssueOutcome, RedeemOutcome};

/// Credential lifecycle manager.
///
/// Orchestrates issue and redeem against the record store and the mail
/// notifier, enforcing expiry, the attempt ceiling, and single use. One
/// service instance handles one deployment mode (numeric or token); the
/// state machine is identical for both.
pub struct VerificationService<R: RecordStore, M: MailNotifier> {
    /// Record store holding all cross-request state
    store: Arc<R>,
    /// Mail notifier for credential delivery
    notifier: Arc<M>,
    /// Credential generator for the configured mode
    generator: CredentialGenerator,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<R: RecordStore, M: MailNotifier> VerificationService<R, M> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `store` - record store implementation
    /// * `notifier` - mail notifier implementation
    /// * `config` - service configuration
    pub fn new(store: Arc<R>, notifier: Arc<M>, config: VerificationServiceConfig) -> Self {
        let generator = CredentialGenerator::new(config.mode, config.ttl_minutes);
        Self {
            store,
            notifier,
            generator,
            config,
        }
    }

    /// The credential mode this service issues
    pub fn mode(&self) -> CredentialMode {
        self.config.mode
    }

    /// Issue a fresh credential for an identity.
    ///
    /// Validates and normalizes the address, generates a credential, and
    /// atomically upserts the record. Re-issuing over a live credential
    /// invalidates it: only the latest credential is ever redeemable. The
    /// returned plaintext is the single source of truth for delivery.
    ///
    /// Delivery is not performed here; see [`issue_and_deliver`].
    ///
    /// [`issue_and_deliver`]: Self::issue_and_deliver
    pub async fn issue(&self, raw_identity: &str) -> VerificationResult<IssueOutcome> {
        let identity = normalize_email(raw_identity);
        if !is_valid_email(&identity) {
            tracing::warn!(
                identity = %mask_email(&identity),
                event = "invalid_identity",
                "Rejected issue request for malformed email address"
            );
            return Err(VerificationError::InvalidIdentity);
        }

        // A uniqueness conflict means another writer created the row between
        // our statements. One retry with a freshly generated credential;
        // after that the conflict surfaces as transient.
        let mut last_conflict = String::new();
        for attempt in 0..2 {
            let credential = self.generator.generate()?;
            let expires_at = Utc::now() + credential.ttl;

            let pending = PendingCredential {
                value: credential.value.clone(),
                expires_at,
            };

            match self.store.upsert(&identity, pending).await {
                Ok(_) => {
                    tracing::info!(
                        identity = %mask_email(&identity),
                        mode = self.config.mode.as_str(),
                        event = "credential_issued",
                        "Issued new verification credential"
                    );
                    return Ok(IssueOutcome {
                        identity,
                        credential: credential.value,
                        expires_at,
                    });
                }
                Err(StoreError::ConstraintViolation { message }) => {
                    tracing::debug!(
                        identity = %mask_email(&identity),
                        attempt,
                        event = "issue_conflict",
                        "Store constraint conflict during issue"
                    );
                    last_conflict = message;
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(VerificationError::Transient {
            message: last_conflict,
        })
    }

    /// Issue a credential, then deliver it.
    ///
    /// Delivery runs strictly after the issuing write commits. A delivery
    /// failure is surfaced to the caller, but the stored credential stands:
    /// "issued but undelivered" is recovered by re-issuing, never by rolling
    /// back.
    pub async fn issue_and_deliver(&self, raw_identity: &str) -> VerificationResult<IssueOutcome> {
        let outcome = self.issue(raw_identity).await?;

        let message_id = self
            .notifier
            .send_credential(&outcome.identity, &outcome.credential, self.config.mode)
            .await
            .map_err(|e| {
                tracing::error!(
                    identity = %mask_email(&outcome.identity),
                    error = %e,
                    event = "delivery_failed",
                    "Credential issued but delivery failed"
                );
                VerificationError::Delivery(e)
            })?;

        tracing::info!(
            identity = %mask_email(&outcome.identity),
            message_id = %message_id,
            event = "credential_delivered",
            "Delivered verification credential"
        );

        Ok(outcome)
    }

    /// Redeem a presented value against the record for an identity.
    ///
    /// Outcome ordering follows the lifecycle contract: missing record,
    /// idempotent already-verified, expiry (attempt-free), attempt ceiling,
    /// then the constant-time comparison. Every branch that changes state
    /// persists it before the outcome is reported.
    pub async fn redeem(
        &self,
        raw_identity: &str,
        presented: &str,
    ) -> VerificationResult<RedeemOutcome> {
        let identity = normalize_email(raw_identity);

        let record = self
            .store
            .find(&identity)
            .await
            .map_err(VerificationError::from)?
            .ok_or(VerificationError::NotFound)?;

        self.adjudicate(record, presented).await
    }

    /// Redeem by token lookup (token mode).
    ///
    /// The token is unguessable, so it doubles as the record key: the
    /// record is located by the presented value itself and then adjudicated
    /// through the same transition. A consumed or replaced token no longer
    /// resolves and reports `NotFound`.
    pub async fn redeem_by_token(&self, token: &str) -> VerificationResult<RedeemOutcome> {
        let token = token.trim();

        let record = self
            .store
            .find_by_credential(token)
            .await
            .map_err(VerificationError::from)?
            .ok_or(VerificationError::NotFound)?;

        self.adjudicate(record, token).await
    }

    /// Remove expired, never-verified records from the store.
    pub async fn purge_expired(&self) -> VerificationResult<u64> {
        let purged = self
            .store
            .purge_expired(Utc::now())
            .await
            .map_err(VerificationError::from)?;

        if purged > 0 {
            tracing::info!(purged, event = "records_purged", "Purged expired records");
        }

        Ok(purged)
    }

    /// Apply the redemption transition and persist where required
    async fn adjudicate(
        &self,
        record: VerificationRecord,
        presented: &str,
    ) -> VerificationResult<RedeemOutcome> {
        let now = Utc::now();
        let masked = mask_email(&record.identity);
        let (next, transition) = record.apply_redeem(presented, now, self.config.max_attempts);

        if transition.requires_persist() {
            self.store
                .save(next.clone())
                .await
                .map_err(VerificationError::from)?;
        }

        match transition {
            RedeemTransition::AlreadyVerified => {
                tracing::info!(
                    identity = %masked,
                    event = "redeem_repeat",
                    "Redemption for an already verified identity"
                );
                Ok(RedeemOutcome::AlreadyVerified)
            }
            RedeemTransition::Expired => {
                tracing::warn!(
                    identity = %masked,
                    event = "redeem_expired",
                    "Redemption attempted after credential expiry"
                );
                Err(VerificationError::Expired)
            }
            RedeemTransition::LockedOut => {
                tracing::warn!(
                    identity = %masked,
                    attempts = next.attempts,
                    event = "redeem_locked_out",
                    "Attempt ceiling exceeded, credential dead until re-issue"
                );
                Err(VerificationError::LockedOut)
            }
            RedeemTransition::Mismatch => {
                let remaining = next.remaining_attempts(self.config.max_attempts);
                tracing::warn!(
                    identity = %masked,
                    attempts = next.attempts,
                    remaining,
                    event = "redeem_mismatch",
                    "Presented credential did not match"
                );
                Err(VerificationError::InvalidCredential {
                    remaining_attempts: remaining,
                })
            }
            RedeemTransition::Verified => {
                tracing::info!(
                    identity = %masked,
                    event = "redeem_verified",
                    "Identity verified"
                );
                Ok(RedeemOutcome::Verified)
            }
        }
    }
}
