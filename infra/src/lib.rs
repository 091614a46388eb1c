//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the MailProof
//! application, following Clean Architecture principles. It provides
//! concrete implementations for the boundaries the core defines:
//!
//! - **Database**: MySQL record store using SQLx
//! - **Mail**: Mail notifier implementations (mock, Brevo HTTP API)
//! - **Limiter**: Redis fixed-window signup rate limiter
//!
//! ## Features
//!
//! - `mysql-store`: MySQL record store (default)
//! - `redis-limiter`: Redis rate limiter (default)
//! - `brevo-mail`: Brevo transactional mail provider (default)

/// Database module - MySQL record store using SQLx
#[cfg(feature = "mysql-store")]
pub mod database;

/// Mail notifier module - delivery implementations
pub mod mail;

/// Rate limiter module - signup abuse limiting
#[cfg(feature = "redis-limiter")]
pub mod limiter;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql-store")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error
    #[cfg(feature = "redis-limiter")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail provider error
    #[error("Mail provider error: {0}")]
    Mail(String),
}
