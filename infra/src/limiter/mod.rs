//! Rate limiter module - signup abuse limiting
//!
//! Provides the Redis fixed-window limiter used in front of the signup
//! endpoint, plus a pass-through limiter for deployments that disable
//! limiting.

pub mod redis_limiter;

pub use redis_limiter::RedisRateLimiter;

use async_trait::async_trait;

use mp_core::services::verification::{RateLimitDecision, RateLimiter};
use mp_shared::config::RateLimitConfig;

use crate::InfrastructureError;

/// Limiter that allows every request (rate limiting disabled)
pub struct DisabledRateLimiter;

#[async_trait]
impl RateLimiter for DisabledRateLimiter {
    async fn check_signup(&self, _key: &str) -> Result<RateLimitDecision, String> {
        Ok(RateLimitDecision::Allowed { remaining: u32::MAX })
    }
}

/// Create a rate limiter based on configuration
pub async fn create_rate_limiter(
    config: &RateLimitConfig,
) -> Result<Box<dyn RateLimiter>, InfrastructureError> {
    if !config.enabled {
        tracing::warn!("Signup rate limiting is disabled");
        return Ok(Box::new(DisabledRateLimiter));
    }

    let limiter = RedisRateLimiter::connect(config.clone()).await?;
    Ok(Box::new(limiter))
}
