//! Application state and route wiring.

use actix_web::web;
use std::sync::Arc;

use mp_core::repositories::record::RecordStore;
use mp_core::services::verification::{MailNotifier, RateLimiter, VerificationService};

use crate::routes;

/// Shared application state injected into every handler.
///
/// Generic over the store, notifier, and limiter implementations so tests
/// can run the full HTTP surface against in-memory collaborators.
pub struct AppState<R, M, L>
where
    R: RecordStore,
    M: MailNotifier,
    L: RateLimiter,
{
    /// The credential lifecycle service
    pub service: Arc<VerificationService<R, M>>,
    /// Per-client signup rate limiter
    pub limiter: Arc<L>,
}

/// Register all API routes.
///
/// ```text
/// POST /signup          issue a credential and mail it
/// POST /verify-code     redeem a numeric code for an email
/// GET  /verify/{token}  redeem a link token
/// GET  /health          service health
/// ```
pub fn configure<R, M, L>(cfg: &mut web::ServiceConfig)
where
    R: RecordStore + 'static,
    M: MailNotifier + 'static,
    L: RateLimiter + 'static,
{
    cfg.route("/health", web::get().to(routes::health::health_check))
        .route("/signup", web::post().to(routes::verify::signup::<R, M, L>))
        .route(
            "/verify-code",
            web::post().to(routes::verify::redeem_code::<R, M, L>),
        )
        .route(
            "/verify/{token}",
            web::get().to(routes::verify::redeem_link::<R, M, L>),
        );
}
