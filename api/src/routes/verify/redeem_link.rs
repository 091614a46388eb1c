use actix_web::{web, HttpResponse};

use mp_core::repositories::record::RecordStore;
use mp_core::services::verification::{MailNotifier, RateLimiter, RedeemOutcome};
use mp_shared::types::response::ApiResponse;

use crate::app::AppState;
use crate::dto::verify::RedeemResponse;
use crate::handlers::error::to_error_response;

/// Handler for GET /verify/{token}
///
/// Redeems a link token. The token in the URL path is both the lookup key
/// and the presented credential.
///
/// # Responses
///
/// * `200` - verified
/// * `400` - expired link
/// * `404` - unknown or already consumed token
/// * `429` - attempt ceiling reached, request a new link
pub async fn redeem_link<R, M, L>(
    state: web::Data<AppState<R, M, L>>,
    path: web::Path<String>,
) -> HttpResponse
where
    R: RecordStore + 'static,
    M: MailNotifier + 'static,
    L: RateLimiter + 'static,
{
    let token = path.into_inner();

    if token.trim().is_empty() {
        return HttpResponse::BadRequest().json(ApiResponse::<()>::error(
            "INVALID_TOKEN",
            "Invalid verification link",
        ));
    }

    log::info!("Processing link redemption");

    match state.service.redeem_by_token(&token).await {
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
            log::warn!("Link redemption failed: {}", err);
            to_error_response(&err)
        }
    }
}
