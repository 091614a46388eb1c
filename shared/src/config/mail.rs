//! Outbound mail configuration module

use serde::{Deserialize, Serialize};

/// Mail provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    /// Mail provider ("brevo", "mock")
    pub provider: String,

    /// API key for the provider
    pub api_key: String,

    /// Sender address shown in outgoing mail
    pub sender_email: String,

    /// Sender display name
    pub sender_name: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: "mock".to_string(),
            api_key: String::new(),
            sender_email: "no-reply@localhost".to_string(),
            sender_name: "no-reply".to_string(),
        }
    }
}

impl MailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("MAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
            api_key: std::env::var("MAIL_API_KEY").unwrap_or_default(),
            sender_email: std::env::var("MAIL_SENDER_EMAIL")
                .unwrap_or_else(|_| "no-reply@localhost".to_string()),
            sender_name: std::env::var("MAIL_SENDER_NAME")
                .unwrap_or_else(|_| "no-reply".to_string()),
        }
    }
}
