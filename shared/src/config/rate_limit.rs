//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

/// Rate limiting configuration for signup requests
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Max signup requests per client per window
    pub signup_per_window: u32,

    /// Window length in seconds
    pub window_seconds: u64,

    /// Redis connection URL backing the counters
    pub redis_url: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            signup_per_window: 5,
            window_seconds: 3600, // 1 hour
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let enabled = std::env::var("RATE_LIMIT_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let signup_per_window = std::env::var("RATE_LIMIT_SIGNUP_PER_WINDOW")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);
        let window_seconds = std::env::var("RATE_LIMIT_WINDOW_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);
        let redis_url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        Self {
            enabled,
            signup_per_window,
            window_seconds,
            redis_url,
        }
    }

    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            signup_per_window: 100,
            ..Default::default()
        }
    }
}

fn default_enabled() -> bool {
    true
}
