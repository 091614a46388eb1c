//! Brevo Mail Provider Implementation
//!
//! Sends verification mail through the Brevo transactional email HTTP API.
//! Implements the `MailNotifier` trait for production delivery.
//!
//! ## Features
//!
//! - Automatic retry with backoff for transient failures
//! - Permanent/transient failure classification by HTTP status
//! - Recipient masking in logs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use mp_core::errors::DeliveryError;
use mp_core::services::verification::{CredentialMode, MailNotifier};
use mp_shared::utils::email::mask_email;

use crate::InfrastructureError;

use super::message::{build_message, MessageSettings};

/// Brevo API configuration
#[derive(Debug, Clone)]
pub struct BrevoConfig {
    /// Brevo API key
    pub api_key: String,
    /// API endpoint for sending transactional mail
    pub endpoint: String,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl Default for BrevoConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.brevo.com/v3/smtp/email".to_string(),
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl BrevoConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let api_key = std::env::var("MAIL_API_KEY")
            .map_err(|_| InfrastructureError::Config("MAIL_API_KEY not set".to_string()))?;

        Ok(Self {
            api_key,
            ..Default::default()
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendBody {
    sender: BrevoAddress,
    to: Vec<BrevoAddress>,
    subject: String,
    html_content: String,
    text_content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendResponse {
    message_id: Option<String>,
}

/// Brevo mail notifier implementation
pub struct BrevoMailNotifier {
    client: reqwest::Client,
    config: BrevoConfig,
    settings: MessageSettings,
}

impl BrevoMailNotifier {
    /// Create a new Brevo mail notifier
    pub fn new(
        config: BrevoConfig,
        settings: MessageSettings,
    ) -> Result<Self, InfrastructureError> {
        if config.api_key.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "Brevo API key is required".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            sender = %mask_email(&settings.sender_email),
            "Brevo mail notifier initialized"
        );

        Ok(Self {
            client,
            config,
            settings,
        })
    }

    /// Send with bounded retry for transient failures
    async fn send_with_retry(&self, body: &BrevoSendBody, to: &str) -> Result<String, DeliveryError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                to = %mask_email(to),
                attempt = attempts,
                max = self.config.max_retries,
                "Sending verification mail via Brevo"
            );

            match self.send_once(body).await {
                Ok(message_id) => {
                    info!(
                        to = %mask_email(to),
                        message_id = %message_id,
                        "Verification mail accepted by Brevo"
                    );
                    return Ok(message_id);
                }
                Err(DeliveryError::Permanent { message }) => {
                    error!(
                        to = %mask_email(to),
                        error = %message,
                        "Brevo rejected the message permanently"
                    );
                    return Err(DeliveryError::Permanent { message });
                }
                Err(DeliveryError::Transient { message }) => {
                    warn!(
                        to = %mask_email(to),
                        attempt = attempts,
                        error = %message,
                        "Transient Brevo failure"
                    );

                    if attempts >= self.config.max_retries {
                        return Err(DeliveryError::Transient {
                            message: format!(
                                "failed after {} attempts: {}",
                                self.config.max_retries, message
                            ),
                        });
                    }

                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    async fn send_once(&self, body: &BrevoSendBody) -> Result<String, DeliveryError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("api-key", &self.config.api_key)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transient {
                message: e.to_string(),
            })?;

        let status = response.status();

        if status.is_success() {
            let parsed: BrevoSendResponse =
                response.json().await.unwrap_or(BrevoSendResponse {
                    message_id: None,
                });
            return Ok(parsed
                .message_id
                .unwrap_or_else(|| "brevo-unknown".to_string()));
        }

        let detail = response.text().await.unwrap_or_default();
        let message = format!("HTTP {}: {}", status, detail);

        // 4xx short of 429 means the request itself is bad; retrying the
        // same payload cannot succeed
        if status.is_client_error() && status.as_u16() != 429 {
            Err(DeliveryError::Permanent { message })
        } else {
            Err(DeliveryError::Transient { message })
        }
    }
}

#[async_trait]
impl MailNotifier for BrevoMailNotifier {
    async fn send_credential(
        &self,
        identity: &str,
        credential: &str,
        mode: CredentialMode,
    ) -> Result<String, DeliveryError> {
        let message = build_message(&self.settings, credential, mode);

        let body = BrevoSendBody {
            sender: BrevoAddress {
                email: self.settings.sender_email.clone(),
                name: Some(self.settings.sender_name.clone()),
            },
            to: vec![BrevoAddress {
                email: identity.to_string(),
                name: None,
            }],
            subject: message.subject,
            html_content: message.html,
            text_content: message.text,
        };

        self.send_with_retry(&body, identity).await
    }
}
