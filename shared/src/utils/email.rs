//! Email address normalization, validation, and masking

use once_cell::sync::Lazy;
use regex::Regex;

/// Loose email shape check: something@something.something, no whitespace.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Normalize an email address for use as an identity key.
///
/// Trims surrounding whitespace and lower-cases the whole address. The
/// normalized form is the unique key of a verification record, so the same
/// mailbox typed with different casing maps to one record.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Check if an email address has a plausible shape.
///
/// This is intentionally a loose structural check, not full RFC 5322
/// validation; ownership is proven by the verification flow itself.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Mask an email address for logging.
///
/// Keeps the first character of the local part and the domain, hiding the
/// rest. Addresses are never logged in full.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().unwrap();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}
