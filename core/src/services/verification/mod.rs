//! Verification service module for email ownership verification
//!
//! This module provides the complete credential lifecycle:
//! - Mode-polymorphic credential generation (numeric code or link token)
//! - Issue with atomic overwrite of any prior credential
//! - Redemption with expiry, attempt-ceiling, and single-use enforcement
//! - Delivery hand-off to a mail notifier boundary

mod config;
mod generator;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use generator::{Credential, CredentialGenerator, CredentialMode, CODE_LENGTH, TOKEN_BYTES};
pub use service::VerificationService;
pub use traits::{MailNotifier, RateLimiter};
pub use types::{IssueOutcome, RateLimitDecision, RedeemOutcome};
