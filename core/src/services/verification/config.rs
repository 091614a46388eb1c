//! Configuration for the verification service

use crate::domain::entities::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL_MINUTES};

use super::generator::CredentialMode;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Credential shape issued by this deployment
    pub mode: CredentialMode,
    /// Minutes before an issued credential expires
    pub ttl_minutes: i64,
    /// Maximum redemption attempts per credential
    pub max_attempts: u32,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            mode: CredentialMode::Numeric,
            ttl_minutes: DEFAULT_TTL_MINUTES,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl VerificationServiceConfig {
    /// Build from the shared settings struct, falling back to the numeric
    /// mode if the configured string is unknown.
    pub fn from_settings(settings: &mp_shared::config::VerificationConfig) -> Self {
        Self {
            mode: CredentialMode::parse(&settings.mode).unwrap_or(CredentialMode::Numeric),
            ttl_minutes: settings.ttl_minutes,
            max_attempts: settings.max_attempts,
        }
    }
}
