//! Mapping from lifecycle errors to HTTP responses.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use mp_core::errors::{DeliveryError, VerificationError};
use mp_shared::types::response::ApiResponse;

/// Convert a verification error into the appropriate HTTP response.
///
/// Status choices mirror the behavior callers rely on: bad input and dead
/// credentials are 400s, a missing record is 404, the attempt ceiling is
/// 429, delivery trouble is 502, and storage trouble is 500.
pub fn to_error_response(err: &VerificationError) -> HttpResponse {
    let body = ApiResponse::<()>::error(err.error_code(), err.to_string());

    match err {
        VerificationError::InvalidIdentity => HttpResponse::BadRequest().json(body),
        VerificationError::NotFound => HttpResponse::NotFound().json(body),
        VerificationError::Expired => HttpResponse::BadRequest().json(body),
        VerificationError::LockedOut => HttpResponse::TooManyRequests().json(body),
        VerificationError::InvalidCredential { .. } => HttpResponse::BadRequest().json(body),
        VerificationError::Delivery(DeliveryError::Permanent { .. })
        | VerificationError::Delivery(DeliveryError::Transient { .. }) => {
            HttpResponse::BadGateway().json(body)
        }
        VerificationError::Transient { .. } => HttpResponse::InternalServerError().json(body),
    }
}

/// Convert request DTO validation failures into a 400 response.
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();

    HttpResponse::BadRequest().json(ApiResponse::<()>::error(
        "VALIDATION_ERROR",
        format!("Invalid request data: {}", fields.join(", ")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (VerificationError::InvalidIdentity, StatusCode::BAD_REQUEST),
            (VerificationError::NotFound, StatusCode::NOT_FOUND),
            (VerificationError::Expired, StatusCode::BAD_REQUEST),
            (VerificationError::LockedOut, StatusCode::TOO_MANY_REQUESTS),
            (
                VerificationError::InvalidCredential {
                    remaining_attempts: 3,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                VerificationError::Delivery(DeliveryError::Permanent {
                    message: "rejected".to_string(),
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                VerificationError::Transient {
                    message: "db down".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(to_error_response(&err).status(), expected, "{err}");
        }
    }
}
