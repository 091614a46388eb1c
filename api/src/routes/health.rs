use actix_web::HttpResponse;

use mp_shared::types::response::HealthResponse;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(
        "mailproof-api",
        env!("CARGO_PKG_VERSION"),
    ))
}
