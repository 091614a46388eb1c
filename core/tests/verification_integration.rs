//! End-to-end lifecycle tests against the public crate API.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use mp_core::errors::{DeliveryError, VerificationError};
use mp_core::repositories::record::InMemoryRecordStore;
use mp_core::services::verification::{
    CredentialMode, MailNotifier, RedeemOutcome, VerificationService, VerificationServiceConfig,
};

/// Notifier that records every delivery, mimicking a mailbox.
struct Mailbox {
    deliveries: Arc<Mutex<Vec<(String, String)>>>,
}

impl Mailbox {
    fn new() -> Self {
        Self {
            deliveries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn last_for(&self, identity: &str) -> Option<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == identity)
            .map(|(_, credential)| credential.clone())
    }
}

#[async_trait]
impl MailNotifier for Mailbox {
    async fn send_credential(
        &self,
        identity: &str,
        credential: &str,
        _mode: CredentialMode,
    ) -> Result<String, DeliveryError> {
        self.deliveries
            .lock()
            .unwrap()
            .push((identity.to_string(), credential.to_string()));
        Ok(format!("msg-{}", self.deliveries.lock().unwrap().len()))
    }
}

fn build_service(
    mode: CredentialMode,
) -> (Arc<Mailbox>, VerificationService<InMemoryRecordStore, Mailbox>) {
    let store = Arc::new(InMemoryRecordStore::new());
    let mailbox = Arc::new(Mailbox::new());
    let config = VerificationServiceConfig {
        mode,
        ..Default::default()
    };
    let service = VerificationService::new(store, mailbox.clone(), config);
    (mailbox, service)
}

#[tokio::test]
async fn numeric_signup_and_verify_round_trip() {
    let (mailbox, service) = build_service(CredentialMode::Numeric);

    // signup delivers a 6-digit code
    service.issue_and_deliver("Alice@Example.com").await.unwrap();
    let code = mailbox.last_for("alice@example.com").unwrap();
    assert_eq!(code.len(), 6);

    // the user types the code from their inbox
    let outcome = service.redeem("alice@example.com", &code).await.unwrap();
    assert_eq!(outcome, RedeemOutcome::Verified);

    // clicking "verify" again is harmless
    let outcome = service.redeem("alice@example.com", &code).await.unwrap();
    assert_eq!(outcome, RedeemOutcome::AlreadyVerified);
}

#[tokio::test]
async fn resend_invalidates_the_first_code() {
    let (mailbox, service) = build_service(CredentialMode::Numeric);

    service.issue_and_deliver("bob@example.com").await.unwrap();
    let first = mailbox.last_for("bob@example.com").unwrap();

    // user clicks "resend"
    service.issue_and_deliver("bob@example.com").await.unwrap();
    let second = mailbox.last_for("bob@example.com").unwrap();

    if first != second {
        let err = service.redeem("bob@example.com", &first).await.unwrap_err();
        assert!(matches!(err, VerificationError::InvalidCredential { .. }));
    }

    let outcome = service.redeem("bob@example.com", &second).await.unwrap();
    assert_eq!(outcome, RedeemOutcome::Verified);
}

#[tokio::test]
async fn token_link_round_trip() {
    let (mailbox, service) = build_service(CredentialMode::Token);

    service.issue_and_deliver("carol@example.com").await.unwrap();
    let token = mailbox.last_for("carol@example.com").unwrap();
    assert_eq!(token.len(), 40);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

    // the link in the mail carries the token as a path segment
    let outcome = service.redeem_by_token(&token).await.unwrap();
    assert_eq!(outcome, RedeemOutcome::Verified);

    // a second click: the consumed token no longer resolves
    let err = service.redeem_by_token(&token).await.unwrap_err();
    assert!(matches!(err, VerificationError::NotFound));
}

#[tokio::test]
async fn brute_force_runs_out_of_attempts() {
    let (mailbox, service) = build_service(CredentialMode::Numeric);

    service.issue_and_deliver("dave@example.com").await.unwrap();
    let code = mailbox.last_for("dave@example.com").unwrap();
    let wrong = if code == "999999" { "999998" } else { "999999" };

    for _ in 0..5 {
        let err = service.redeem("dave@example.com", wrong).await.unwrap_err();
        assert!(matches!(err, VerificationError::InvalidCredential { .. }));
    }
    let err = service.redeem("dave@example.com", &code).await.unwrap_err();
    assert!(matches!(err, VerificationError::LockedOut));

    // a fresh signup recovers the flow
    service.issue_and_deliver("dave@example.com").await.unwrap();
    let fresh = mailbox.last_for("dave@example.com").unwrap();
    let outcome = service.redeem("dave@example.com", &fresh).await.unwrap();
    assert_eq!(outcome, RedeemOutcome::Verified);
}
