//! Verification routes: signup, code redemption, link redemption.

mod redeem_code;
mod redeem_link;
mod signup;

pub use redeem_code::redeem_code;
pub use redeem_link::redeem_link;
pub use signup::signup;

use actix_web::HttpRequest;

/// Extract the client IP address from a request.
///
/// Prefers proxy headers so the limiter keys on the real client behind a
/// reverse proxy, falling back to the peer address.
pub(crate) fn extract_client_ip(req: &HttpRequest) -> String {
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                return ip.trim().to_string();
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}
