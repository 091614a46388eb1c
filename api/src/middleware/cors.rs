//! CORS middleware configuration

use actix_cors::Cors;

use mp_shared::config::CorsConfig;

/// Build the CORS middleware from configuration.
///
/// An empty origin list keeps the default same-origin policy; a `*` entry
/// opens the API up for development.
pub fn create_cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(
            config
                .allowed_methods
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>(),
        )
        .max_age(config.max_age as usize);

    if config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin().allow_any_header().allow_any_method();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
