//! Types for verification service results

use chrono::{DateTime, Utc};

/// Result of issuing a credential.
///
/// `credential` is the plaintext returned by the generator, the single
/// source of truth for delivery; the store is never re-read for display.
#[derive(Debug, Clone)]
pub struct IssueOutcome {
    /// The normalized identity the credential is bound to
    pub identity: String,
    /// The plaintext credential, for delivery
    pub credential: String,
    /// When the credential stops being redeemable
    pub expires_at: DateTime<Utc>,
}

/// Successful redemption outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// The credential matched; the identity is now verified
    Verified,
    /// The identity was verified earlier; redemption is idempotent
    AlreadyVerified,
}

/// Decision returned by the signup rate limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request allowed; `remaining` requests left in the window
    Allowed { remaining: u32 },
    /// Request rejected; retry after the given number of seconds
    Limited { retry_after_seconds: u64 },
}
