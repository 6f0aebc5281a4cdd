//! Shared signing configuration.

use std::fmt;

/// Header carrying the signature token unless overridden.
pub const DEFAULT_SIGNATURE_HEADER_KEY: &str = "webhook-signature";

/// Replay window applied during verification unless overridden.
pub const DEFAULT_MAX_AGE_SECONDS: u64 = 180;

/// Configuration shared by the outbound signer and the inbound verifier.
///
/// Built once at startup and passed by reference. Both sides of a webhook
/// exchange must agree on every field here, otherwise verification fails
/// with a mismatch rather than anything more diagnosable.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningContext {
    secret: String,
    header_key: String,
    max_age_seconds: u64,
    debug_errors: bool,
}

impl SigningContext {
    /// Create a context with the given secret and all defaults.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            header_key: DEFAULT_SIGNATURE_HEADER_KEY.to_string(),
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            debug_errors: false,
        }
    }

    /// Override the header carrying the signature token.
    pub fn with_header_key(mut self, header_key: impl Into<String>) -> Self {
        self.header_key = header_key.into();
        self
    }

    /// Override the replay window, in seconds.
    pub fn with_max_age_seconds(mut self, max_age_seconds: u64) -> Self {
        self.max_age_seconds = max_age_seconds;
        self
    }

    /// Surface precise verification failures to callers.
    ///
    /// Off by default: precise reasons (expired vs mismatch) leak probing
    /// signal to an attacker, so production deployments keep the generic
    /// rejection message.
    pub fn with_debug_errors(mut self, debug_errors: bool) -> Self {
        self.debug_errors = debug_errors;
        self
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn header_key(&self) -> &str {
        &self.header_key
    }

    pub fn max_age_seconds(&self) -> u64 {
        self.max_age_seconds
    }

    /// Replay window in epoch-millisecond units, matching token timestamps.
    pub fn max_age_ms(&self) -> i64 {
        self.max_age_seconds as i64 * 1000
    }

    pub fn debug_errors(&self) -> bool {
        self.debug_errors
    }
}

// The secret never appears in logs, even at trace level.
impl fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningContext")
            .field("secret", &"<redacted>")
            .field("header_key", &self.header_key)
            .field("max_age_seconds", &self.max_age_seconds)
            .field("debug_errors", &self.debug_errors)
            .finish()
    }
}
