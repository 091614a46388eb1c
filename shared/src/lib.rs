//! Shared utilities and common types for the MailProof server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types with environment loaders
//! - API response structures
//! - Utility functions (email normalization, validation, masking)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CorsConfig, DatabaseConfig, MailConfig, RateLimitConfig, ServerConfig,
    VerificationConfig,
};
pub use types::response::ApiResponse;
pub use utils::email;
