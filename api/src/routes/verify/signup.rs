use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use mp_core::repositories::record::RecordStore;
use mp_core::services::verification::{MailNotifier, RateLimitDecision, RateLimiter};
use mp_shared::types::response::ApiResponse;
use mp_shared::utils::email::mask_email;

use crate::app::AppState;
use crate::dto::verify::{SignupRequest, SignupResponse};
use crate::handlers::error::{to_error_response, validation_error_response};

use super::extract_client_ip;

/// Handler for POST /signup
///
/// Issues a verification credential for the submitted email address and
/// mails it. The per-IP limiter is consulted before the lifecycle service
/// is invoked.
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com" }
/// ```
///
/// # Responses
///
/// * `200` - credential issued and mail accepted
/// * `400` - malformed email address
/// * `429` - signup rate limit exceeded for this client
/// * `502` - credential issued but the mail provider failed
/// * `500` - storage failure
pub async fn signup<R, M, L>(
    req: HttpRequest,
    state: web::Data<AppState<R, M, L>>,
    request: web::Json<SignupRequest>,
) -> HttpResponse
where
    R: RecordStore + 'static,
    M: MailNotifier + 'static,
    L: RateLimiter + 'static,
{
    if let Err(errors) = request.0.validate() {
        return validation_error_response(&errors);
    }

    let client_ip = extract_client_ip(&req);

    log::info!(
        "Processing signup for {} from {}",
        mask_email(&request.email),
        client_ip
    );

    match state.limiter.check_signup(&client_ip).await {
        Ok(RateLimitDecision::Allowed { .. }) => {}
        Ok(RateLimitDecision::Limited {
            retry_after_seconds,
        }) => {
            log::warn!("Signup rate limit hit for {}", client_ip);
            return HttpResponse::TooManyRequests().json(ApiResponse::<()>::error(
                "RATE_LIMIT_EXCEEDED",
                format!(
                    "Too many signup requests from this client, please try again in {} seconds",
                    retry_after_seconds
                ),
            ));
        }
        Err(e) => {
            // a broken limiter backend must not take signup down with it
            log::error!("Rate limiter check failed, allowing request: {}", e);
        }
    }

    match state.service.issue_and_deliver(&request.email).await {
        Ok(outcome) => {
            log::info!(
                "Verification credential sent to {}",
                mask_email(&outcome.identity)
            );
            HttpResponse::Ok().json(ApiResponse::success(
                SignupResponse {
                    message: "Verification sent to email".to_string(),
                    expires_at: outcome.expires_at,
                },
                "Verification sent",
            ))
        }
        Err(err) => {
            log::error!(
                "Signup failed for {}: {}",
                mask_email(&request.email),
                err
            );
            to_error_response(&err)
        }
    }
}
