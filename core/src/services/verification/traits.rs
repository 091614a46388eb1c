//! Boundary traits for delivery and rate limiting integration

use async_trait::async_trait;

use super::generator::CredentialMode;
use super::types::RateLimitDecision;
use crate::errors::DeliveryError;

/// Trait for delivering an issued credential over email.
///
/// Implementations format the message for the mode (code to type, or link to
/// click) and hand it to a mail provider. Delivery never mutates record
/// state; a failure leaves the issued credential redeemable.
#[async_trait]
pub trait MailNotifier: Send + Sync {
    /// Send a credential to an identity; returns the provider message id
    async fn send_credential(
        &self,
        identity: &str,
        credential: &str,
        mode: CredentialMode,
    ) -> Result<String, DeliveryError>;
}

#[async_trait]
impl MailNotifier for Box<dyn MailNotifier> {
    async fn send_credential(
        &self,
        identity: &str,
        credential: &str,
        mode: CredentialMode,
    ) -> Result<String, DeliveryError> {
        (**self).send_credential(identity, credential, mode).await
    }
}

/// Trait for the per-client signup rate limiter.
///
/// Consulted by the HTTP layer before issue is invoked. The lifecycle
/// manager itself stays safe under any burst the limiter lets through.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Record a signup request for `key` and decide whether to allow it
    async fn check_signup(&self, key: &str) -> Result<RateLimitDecision, String>;
}

#[async_trait]
impl RateLimiter for Box<dyn RateLimiter> {
    async fn check_signup(&self, key: &str) -> Result<RateLimitDecision, String> {
        (**self).check_signup(key).await
    }
}
