//! Mode-aware message building for credential delivery.

use mp_core::services::verification::CredentialMode;
use mp_shared::config::{MailConfig, VerificationConfig};

/// Sender and formatting settings shared by all notifier implementations.
#[derive(Debug, Clone)]
pub struct MessageSettings {
    /// Sender address shown in outgoing mail
    pub sender_email: String,
    /// Sender display name
    pub sender_name: String,
    /// Base URL for verification links in token mode
    pub link_base_url: String,
    /// Minutes until the credential expires, quoted in the message body
    pub ttl_minutes: i64,
}

impl MessageSettings {
    /// Assemble from the shared configuration structs
    pub fn from_config(mail: &MailConfig, verification: &VerificationConfig) -> Self {
        Self {
            sender_email: mail.sender_email.clone(),
            sender_name: mail.sender_name.clone(),
            link_base_url: verification.link_base_url.trim_end_matches('/').to_string(),
            ttl_minutes: verification.ttl_minutes,
        }
    }
}

/// A rendered verification message.
#[derive(Debug, Clone)]
pub struct CredentialMessage {
    /// Mail subject line
    pub subject: String,
    /// Plain-text body
    pub text: String,
    /// HTML body
    pub html: String,
}

/// Render the verification message for a credential.
///
/// Numeric mode quotes the code to type; token mode builds the link the
/// user clicks.
pub fn build_message(
    settings: &MessageSettings,
    credential: &str,
    mode: CredentialMode,
) -> CredentialMessage {
    match mode {
        CredentialMode::Numeric => CredentialMessage {
            subject: "OTP verification".to_string(),
            text: format!(
                "Your OTP is {}. It expires in {} minutes.",
                credential, settings.ttl_minutes
            ),
            html: format!(
                "<p>Your OTP is <strong>{}</strong>. It expires in {} minutes.</p>",
                credential, settings.ttl_minutes
            ),
        },
        CredentialMode::Token => {
            let link = format!("{}/{}", settings.link_base_url, credential);
            CredentialMessage {
                subject: "Email verification".to_string(),
                text: format!(
                    "Click here to verify your email {}. It expires in {} minutes.",
                    link, settings.ttl_minutes
                ),
                html: format!(
                    "<p>Click here to verify your email <strong>{}</strong>. It expires in {} minutes.</p>",
                    link, settings.ttl_minutes
                ),
            }
        }
    }
}
