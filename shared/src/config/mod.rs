//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `database` - Database connection and pool configuration
//! - `mail` - Outbound mail provider configuration
//! - `rate_limit` - Per-client signup rate limiting
//! - `server` - HTTP server and CORS configuration
//! - `verification` - Credential mode, TTL, and attempt ceiling

pub mod database;
pub mod mail;
pub mod rate_limit;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use mail::MailConfig;
pub use rate_limit::RateLimitConfig;
pub use server::{CorsConfig, ServerConfig};
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Credential lifecycle configuration
    pub verification: VerificationConfig,

    /// Outbound mail configuration
    pub mail: MailConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            verification: VerificationConfig::default(),
            mail: MailConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load the full configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            verification: VerificationConfig::from_env(),
            mail: MailConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            cors: CorsConfig::default(),
        }
    }
}
