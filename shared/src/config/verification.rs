//! Credential lifecycle configuration module

use serde::{Deserialize, Serialize};

/// Credential lifecycle configuration
///
/// `mode` selects the credential shape for the deployment: `"numeric"` for a
/// 6-digit code typed by the user, `"token"` for an opaque token embedded in
/// a verification link.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Credential mode: "numeric" or "token"
    pub mode: String,

    /// Minutes before an issued credential expires
    pub ttl_minutes: i64,

    /// Maximum redemption attempts per credential
    pub max_attempts: u32,

    /// Base URL used to build verification links in token mode
    pub link_base_url: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            mode: "numeric".to_string(),
            ttl_minutes: 5,
            max_attempts: 5,
            link_base_url: "http://localhost:3000/verify".to_string(),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let mode =
            std::env::var("VERIFICATION_MODE").unwrap_or_else(|_| "numeric".to_string());
        let ttl_minutes = std::env::var("VERIFICATION_TTL_MINUTES")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let max_attempts = std::env::var("VERIFICATION_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let link_base_url = std::env::var("VERIFICATION_LINK_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/verify".to_string());

        Self {
            mode,
            ttl_minutes,
            max_attempts,
            link_base_url,
        }
    }
}
