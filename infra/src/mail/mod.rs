//! Mail Notifier Module
//!
//! This module provides mail delivery implementations for sending
//! verification credentials. It includes a mock implementation for
//! development and a Brevo transactional API client for production.
//!
//! ## Features
//!
//! - **Message building**: mode-aware subject/text/html bodies
//! - **Mock implementation**: console output for development
//! - **Brevo support**: production mail via the Brevo HTTP API

pub mod message;
pub mod mock_mail;

// Brevo mail provider (feature-gated)
#[cfg(feature = "brevo-mail")]
pub mod brevo;

// Re-export commonly used types
pub use message::{CredentialMessage, MessageSettings};
pub use mock_mail::MockMailNotifier;

#[cfg(feature = "brevo-mail")]
pub use brevo::{BrevoConfig, BrevoMailNotifier};

use mp_core::services::verification::MailNotifier;
use mp_shared::config::{MailConfig, VerificationConfig};

/// Create a mail notifier based on configuration
///
/// Returns the appropriate notifier implementation for the provider named
/// in the configuration, falling back to the mock on unknown providers or
/// initialization failure.
pub fn create_mail_notifier(
    mail: &MailConfig,
    verification: &VerificationConfig,
) -> Box<dyn MailNotifier> {
    let settings = MessageSettings::from_config(mail, verification);

    match mail.provider.as_str() {
        "mock" => Box::new(MockMailNotifier::new(settings)),
        #[cfg(feature = "brevo-mail")]
        "brevo" => {
            let config = BrevoConfig {
                api_key: mail.api_key.clone(),
                ..Default::default()
            };
            match BrevoMailNotifier::new(config, settings.clone()) {
                Ok(notifier) => Box::new(notifier),
                Err(e) => {
                    tracing::error!("Failed to initialize Brevo mail notifier: {}", e);
                    tracing::warn!("Falling back to mock mail notifier");
                    Box::new(MockMailNotifier::new(settings))
                }
            }
        }
        other => {
            tracing::warn!(
                "Unknown mail provider '{}', using mock implementation",
                other
            );
            Box::new(MockMailNotifier::new(settings))
        }
    }
}
