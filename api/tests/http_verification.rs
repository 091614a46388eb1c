//! End-to-end HTTP tests for the verification endpoints.
//!
//! The full route surface runs against in-memory collaborators: the
//! in-memory record store, a capturing notifier standing in for the
//! mailbox, and a scripted rate limiter.

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use mp_api::app::{configure, AppState};
use mp_core::errors::DeliveryError;
use mp_core::repositories::record::InMemoryRecordStore;
use mp_core::services::verification::{
    CredentialMode, MailNotifier, RateLimitDecision, RateLimiter, VerificationService,
    VerificationServiceConfig,
};

/// Notifier that captures the credential instead of mailing it
struct CaptureNotifier {
    sent: Arc<Mutex<HashMap<String, String>>>,
}

impl CaptureNotifier {
    fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn credential_for(&self, identity: &str) -> Option<String> {
        self.sent.lock().unwrap().get(identity).cloned()
    }
}

#[async_trait]
impl MailNotifier for CaptureNotifier {
    async fn send_credential(
        &self,
        identity: &str,
        credential: &str,
        _mode: CredentialMode,
    ) -> Result<String, DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .insert(identity.to_string(), credential.to_string());
        Ok("test-message".to_string())
    }
}

/// Limiter with a fixed decision
struct FixedLimiter {
    allow: bool,
}

#[async_trait]
impl RateLimiter for FixedLimiter {
    async fn check_signup(&self, _key: &str) -> Result<RateLimitDecision, String> {
        if self.allow {
            Ok(RateLimitDecision::Allowed { remaining: 4 })
        } else {
            Ok(RateLimitDecision::Limited {
                retry_after_seconds: 3600,
            })
        }
    }
}

type TestState = AppState<InMemoryRecordStore, CaptureNotifier, FixedLimiter>;

fn build_state(mode: CredentialMode, allow_signup: bool) -> (Arc<CaptureNotifier>, TestState) {
    let store = Arc::new(InMemoryRecordStore::new());
    let notifier = Arc::new(CaptureNotifier::new());
    let config = VerificationServiceConfig {
        mode,
        ..Default::default()
    };
    let service = Arc::new(VerificationService::new(store, notifier.clone(), config));
    let limiter = Arc::new(FixedLimiter {
        allow: allow_signup,
    });

    (notifier, AppState { service, limiter })
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure::<InMemoryRecordStore, CaptureNotifier, FixedLimiter>),
        )
        .await
    };
}

#[actix_rt::test]
async fn signup_then_verify_code_flow() {
    let (notifier, state) = build_state(CredentialMode::Numeric, true);
    let app = test_app!(state);

    // signup issues a credential and "mails" it
    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(serde_json::json!({ "email": "User@Example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let code = notifier.credential_for("user@example.com").unwrap();
    assert_eq!(code.len(), 6);

    // a wrong code is rejected and consumes an attempt
    let wrong = if code == "000000" { "111111" } else { "000000" };
    let req = test::TestRequest::post()
        .uri("/verify-code")
        .set_json(serde_json::json!({ "email": "user@example.com", "code": wrong }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_CREDENTIAL");

    // the correct code verifies
    let req = test::TestRequest::post()
        .uri("/verify-code")
        .set_json(serde_json::json!({ "email": "user@example.com", "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["verified"], true);
    assert_eq!(body["data"]["message"], "Verification complete");

    // repeating the redemption is idempotent
    let req = test::TestRequest::post()
        .uri("/verify-code")
        .set_json(serde_json::json!({ "email": "user@example.com", "code": code }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["message"], "Email already verified");
}

#[actix_rt::test]
async fn signup_rejects_malformed_email() {
    let (_, state) = build_state(CredentialMode::Numeric, true);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(serde_json::json!({ "email": "not-an-email" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn signup_honors_rate_limiter() {
    let (notifier, state) = build_state(CredentialMode::Numeric, false);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(serde_json::json!({ "email": "user@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 429);

    // the lifecycle service was never reached
    assert!(notifier.credential_for("user@example.com").is_none());
}

#[actix_rt::test]
async fn verify_code_unknown_email_is_404() {
    let (_, state) = build_state(CredentialMode::Numeric, true);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/verify-code")
        .set_json(serde_json::json!({ "email": "ghost@example.com", "code": "123456" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn verify_link_flow() {
    let (notifier, state) = build_state(CredentialMode::Token, true);
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(serde_json::json!({ "email": "user@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let token = notifier.credential_for("user@example.com").unwrap();
    assert_eq!(token.len(), 40);

    // clicking the link verifies
    let req = test::TestRequest::get()
        .uri(&format!("/verify/{}", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["verified"], true);

    // the consumed token no longer resolves
    let req = test::TestRequest::get()
        .uri(&format!("/verify/{}", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn verify_link_unknown_token_is_404() {
    let (_, state) = build_state(CredentialMode::Token, true);
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/verify/{}", "0".repeat(40)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn health_endpoint_responds() {
    let (_, state) = build_state(CredentialMode::Numeric, true);
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "mailproof-api");
}
