//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    Credential, CredentialGenerator, CredentialMode, IssueOutcome, MailNotifier,
    RateLimitDecision, RateLimiter, RedeemOutcome, VerificationService,
    VerificationServiceConfig, CODE_LENGTH, TOKEN_BYTES,
};
