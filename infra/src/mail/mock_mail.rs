//! Mock mail notifier for development and testing.
//!
//! Logs the rendered message instead of sending it and keeps a copy so
//! tests can assert on what would have gone out.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use mp_core::errors::DeliveryError;
use mp_core::services::verification::{CredentialMode, MailNotifier};
use mp_shared::utils::email::mask_email;

use super::message::{build_message, CredentialMessage, MessageSettings};

/// A message captured by the mock notifier
#[derive(Debug, Clone)]
pub struct SentMail {
    /// Recipient address
    pub to: String,
    /// Rendered message
    pub message: CredentialMessage,
}

/// Mail notifier that logs instead of sending
pub struct MockMailNotifier {
    settings: MessageSettings,
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl MockMailNotifier {
    /// Create a new mock notifier
    pub fn new(settings: MessageSettings) -> Self {
        Self {
            settings,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Messages captured so far
    pub fn sent_messages(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailNotifier for MockMailNotifier {
    async fn send_credential(
        &self,
        identity: &str,
        credential: &str,
        mode: CredentialMode,
    ) -> Result<String, DeliveryError> {
        let message = build_message(&self.settings, credential, mode);

        tracing::info!(
            to = %mask_email(identity),
            subject = %message.subject,
            body = %message.text,
            "[MOCK MAIL] Would send verification mail"
        );

        self.sent.lock().unwrap().push(SentMail {
            to: identity.to_string(),
            message,
        });

        Ok(format!("mock-{}", Uuid::new_v4()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mp_shared::config::{MailConfig, VerificationConfig};

    fn notifier() -> MockMailNotifier {
        let settings =
            MessageSettings::from_config(&MailConfig::default(), &VerificationConfig::default());
        MockMailNotifier::new(settings)
    }

    #[tokio::test]
    async fn test_mock_captures_message() {
        let notifier = notifier();

        let message_id = notifier
            .send_credential("user@example.com", "123456", CredentialMode::Numeric)
            .await
            .unwrap();

        assert!(message_id.starts_with("mock-"));
        let sent = notifier.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "user@example.com");
        assert!(sent[0].message.text.contains("123456"));
    }

    #[tokio::test]
    async fn test_mock_renders_token_link() {
        let notifier = notifier();

        notifier
            .send_credential("user@example.com", "deadbeef", CredentialMode::Token)
            .await
            .unwrap();

        let sent = notifier.sent_messages();
        assert!(sent[0].message.text.contains("/deadbeef"));
    }
}
