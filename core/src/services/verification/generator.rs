//! Mode-polymorphic credential generation.

use chrono::Duration;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::errors::{VerificationError, VerificationResult};

/// Length of a numeric verification code
pub const CODE_LENGTH: usize = 6;

/// Random bytes in an opaque link token (160 bits, 40 hex chars)
pub const TOKEN_BYTES: usize = 20;

/// The credential shape a deployment issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// Fixed-width decimal code typed by the user
    Numeric,
    /// High-entropy hex token embedded in a verification link
    Token,
}

impl CredentialMode {
    /// Parse a mode from its configuration string
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "numeric" => Some(Self::Numeric),
            "token" => Some(Self::Token),
            _ => None,
        }
    }

    /// Configuration string for this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Token => "token",
        }
    }
}

/// A freshly generated credential and its validity window.
///
/// The caller computes `expires_at = now + ttl`; the generator itself never
/// touches a clock or external state.
#[derive(Debug, Clone)]
pub struct Credential {
    /// The plaintext secret
    pub value: String,
    /// How long the secret stays redeemable
    pub ttl: Duration,
}

/// Credential generator drawing from the OS CSPRNG.
#[derive(Debug, Clone)]
pub struct CredentialGenerator {
    mode: CredentialMode,
    ttl: Duration,
}

impl CredentialGenerator {
    /// Create a generator for the given mode and TTL
    pub fn new(mode: CredentialMode, ttl_minutes: i64) -> Self {
        Self {
            mode,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// The mode this generator produces
    pub fn mode(&self) -> CredentialMode {
        self.mode
    }

    /// Generate a new credential.
    ///
    /// The only failure is OS random-source exhaustion, which is not
    /// retryable here and surfaces as a transient infrastructure error.
    pub fn generate(&self) -> VerificationResult<Credential> {
        let value = match self.mode {
            CredentialMode::Numeric => Self::numeric_code()?,
            CredentialMode::Token => Self::opaque_token()?,
        };

        Ok(Credential {
            value,
            ttl: self.ttl,
        })
    }

    /// Zero-padded 6-digit code, uniform over the full digit space.
    ///
    /// Rejection sampling: u32 values at or above the largest multiple of
    /// 1_000_000 are redrawn so leading-zero codes are exactly as likely as
    /// any other.
    fn numeric_code() -> VerificationResult<String> {
        const LIMIT: u32 = u32::MAX - (u32::MAX % 1_000_000);

        loop {
            let mut buf = [0u8; 4];
            OsRng
                .try_fill_bytes(&mut buf)
                .map_err(VerificationError::transient)?;
            let n = u32::from_le_bytes(buf);
            if n < LIMIT {
                return Ok(format!("{:06}", n % 1_000_000));
            }
        }
    }

    /// 20 random bytes, hex-encoded: URL-path safe and unguessable.
    fn opaque_token() -> VerificationResult<String> {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(VerificationError::transient)?;
        Ok(hex::encode(bytes))
    }
}
