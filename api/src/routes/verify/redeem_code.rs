use actix_web::{web, HttpResponse};
use validator::Validate;

use mp_core::repositories::record::RecordStore;
use mp_core::services::verification::{MailNotifier, RateLimiter, RedeemOutcome};
use mp_shared::types::response::ApiResponse;
use mp_shared::utils::email::mask_email;

use crate::app::AppState;
use crate::dto::verify::{RedeemResponse, VerifyCodeRequest};
use crate::handlers::error::{to_error_response, validation_error_response};

/// Handler for POST /verify-code
///
/// Redeems a numeric code against the record for an email address.
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "code": "123456" }
/// ```
///
/// # Responses
///
/// * `200` - verified (or already verified, idempotently)
/// * `400` - expired or mismatched code
/// * `404` - no verification request for this email
/// * `429` - attempt ceiling reached, request a new code
pub async fn redeem_code<R, M, L>(
    state: web::Data<AppState<R, M, L>>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse
where
    R: RecordStore + 'static,
    M: MailNotifier + 'static,
    L: RateLimiter + 'static,
{
    if let Err(errors) = request.0.validate() {
        return validation_error_response(&errors);
    }

    log::info!("Processing code redemption for {}", mask_email(&request.email));

    match state.service.redeem(&request.email, &request.code).await {
        Ok(RedeemOutcome::Verified) => HttpResponse::Ok().json(ApiResponse::success(
            RedeemResponse {
                message: "Verification complete".to_string(),
                verified: true,
            },
            "Verification complete",
        )),
        Ok(RedeemOutcome::AlreadyVerified) => HttpResponse::Ok().json(ApiResponse::success(
            RedeemResponse {
                message: "Email already verified".to_string(),
                verified: true,
            },
            "Email already verified",
        )),
        Err(err) => {
            log::warn!(
                "Code redemption failed for {}: {}",
                mask_email(&request.email),
                err
            );
            to_error_response(&err)
        }
    }
}
