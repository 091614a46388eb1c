//! Redis-based fixed-window rate limiter for signup requests.
//!
//! One counter per client key and window: the first request creates the
//! counter with the window as its TTL, later requests increment it, and the
//! decision falls out of the comparison against the configured limit. The
//! client key (an IP address or an email identity) is hashed before it is
//! used as a Redis key so raw identifiers never land in the keyspace.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use mp_core::services::verification::{RateLimitDecision, RateLimiter};
use mp_shared::config::RateLimitConfig;

use crate::InfrastructureError;

/// Redis-backed implementation of the signup rate limiter
pub struct RedisRateLimiter {
    connection: MultiplexedConnection,
    config: RateLimitConfig,
}

impl RedisRateLimiter {
    /// Connect to Redis and build the limiter
    pub async fn connect(config: RateLimitConfig) -> Result<Self, InfrastructureError> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let connection = client.get_multiplexed_tokio_connection().await?;

        info!(
            limit = config.signup_per_window,
            window_seconds = config.window_seconds,
            "Redis rate limiter connected"
        );

        Ok(Self { connection, config })
    }

    /// Build the limiter on an existing connection (tests)
    pub fn new(connection: MultiplexedConnection, config: RateLimitConfig) -> Self {
        Self { connection, config }
    }

    /// Hash a client key so raw identifiers stay out of the keyspace
    fn window_key(key: &str) -> String {
        let digest = Sha256::digest(key.as_bytes());
        format!("rate_limit:signup:{}", hex::encode(&digest[..16]))
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check_signup(&self, key: &str) -> Result<RateLimitDecision, String> {
        let redis_key = Self::window_key(key);
        let mut conn = self.connection.clone();

        let count: u32 = conn
            .incr(&redis_key, 1u32)
            .await
            .map_err(|e| format!("Failed to increment rate limit counter: {}", e))?;

        if count == 1 {
            // first request opens the window
            conn.expire::<_, i64>(&redis_key, self.config.window_seconds as i64)
                .await
                .map_err(|e| format!("Failed to set rate limit window: {}", e))?;
        }

        if count > self.config.signup_per_window {
            let ttl: i64 = conn
                .ttl(&redis_key)
                .await
                .map_err(|e| format!("Failed to read rate limit TTL: {}", e))?;

            warn!(
                count,
                limit = self.config.signup_per_window,
                event = "rate_limit_exceeded",
                "Signup rate limit exceeded"
            );

            return Ok(RateLimitDecision::Limited {
                retry_after_seconds: ttl.max(1) as u64,
            });
        }

        debug!(
            count,
            limit = self.config.signup_per_window,
            "Signup request within rate limit"
        );

        Ok(RateLimitDecision::Allowed {
            remaining: self.config.signup_per_window - count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_key_is_hashed_and_stable() {
        let a = RedisRateLimiter::window_key("203.0.113.7");
        let b = RedisRateLimiter::window_key("203.0.113.7");
        let c = RedisRateLimiter::window_key("203.0.113.8");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("rate_limit:signup:"));
        assert!(!a.contains("203.0.113.7"));
    }
}
