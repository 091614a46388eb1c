use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use log::info;
use std::sync::Arc;
use std::time::Duration;

use mp_core::services::verification::{
    MailNotifier, RateLimiter, VerificationService, VerificationServiceConfig,
};
use mp_infra::database::{create_pool, MySqlRecordStore};
use mp_infra::limiter::create_rate_limiter;
use mp_infra::mail::create_mail_notifier;
use mp_shared::config::AppConfig;

use mp_api::{app, middleware};

/// Interval between passive expiry sweeps
const PURGE_INTERVAL_SECS: u64 = 600;

type Service = VerificationService<MySqlRecordStore, Box<dyn MailNotifier>>;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting MailProof API Server");

    // Load configuration
    let config = AppConfig::from_env();
    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);
    info!("Credential mode: {}", config.verification.mode);

    // Wire infrastructure implementations
    let pool = create_pool(&config.database).await?;
    let store = Arc::new(MySqlRecordStore::new(pool));

    let notifier: Arc<Box<dyn MailNotifier>> = Arc::new(create_mail_notifier(
        &config.mail,
        &config.verification,
    ));

    let limiter: Arc<Box<dyn RateLimiter>> =
        Arc::new(create_rate_limiter(&config.rate_limit).await?);

    let service: Arc<Service> = Arc::new(VerificationService::new(
        store,
        notifier,
        VerificationServiceConfig::from_settings(&config.verification),
    ));

    // Passive expiry sweep: expired, never-verified records are purged in
    // the background; redemption re-checks expiry either way
    let purge_service = service.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(PURGE_INTERVAL_SECS));
        loop {
            interval.tick().await;
            if let Err(e) = purge_service.purge_expired().await {
                log::warn!("Expiry sweep failed: {}", e);
            }
        }
    });

    let state = web::Data::new(app::AppState {
        service,
        limiter,
    });
    let cors_config = config.cors.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(middleware::cors::create_cors(&cors_config))
            .app_data(state.clone())
            .configure(app::configure::<MySqlRecordStore, Box<dyn MailNotifier>, Box<dyn RateLimiter>>)
            .default_service(web::route().to(|| async {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "not_found",
                    "message": "The requested resource was not found"
                }))
            }))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
