use postern_signature::SignatureError;
use thiserror::Error;

/// Public message for any rejected inbound request when `debug_errors` is
/// off. One string for every failure mode, so responses carry no probing
/// signal.
pub const SIGNATURE_REJECTION_MESSAGE: &str =
    "webhook request malformed, missing or invalid signature";

/// Failure to deliver an outbound webhook event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The configured endpoint is not an absolute URL.
    #[error("invalid webhook endpoint, expected valid URL, got {0:?}")]
    InvalidEndpoint(String),

    /// The single delivery attempt failed, in transport or at the remote.
    /// `status` is absent when no HTTP response came back at all.
    #[error("webhook delivery failed: status={} message={message:?}", status_label(.status))]
    DeliveryFailed {
        status: Option<u16>,
        message: String,
    },

    /// Signing the event failed before any request was sent.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |code| code.to_string())
}

/// Rejection of an inbound webhook request.
///
/// The public message stays generic unless the signing context enables
/// `debug_errors`: telling a caller whether parsing, expiry, or the digest
/// failed hands a forger the next thing to fix. The precise reason stays
/// available through [`AuthenticationError::reason`] and in the logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthenticationError {
    message: String,
    reason: SignatureError,
}

impl AuthenticationError {
    pub(crate) fn new(reason: SignatureError, debug_errors: bool) -> Self {
        let message = if debug_errors {
            format!("webhook request malformed, {reason}")
        } else {
            SIGNATURE_REJECTION_MESSAGE.to_string()
        };
        Self { message, reason }
    }

    /// The underlying verification failure.
    pub fn reason(&self) -> &SignatureError {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use postern_signature::SignatureHeaderError;

    use super::*;

    #[test]
    fn delivery_failure_renders_both_status_shapes() {
        let with_status = WebhookError::DeliveryFailed {
            status: Some(500),
            message: "remote exploded".to_string(),
        };
        assert_eq!(
            with_status.to_string(),
            r#"webhook delivery failed: status=500 message="remote exploded""#
        );

        let without_status = WebhookError::DeliveryFailed {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            without_status.to_string(),
            r#"webhook delivery failed: status=none message="connection refused""#
        );
    }

    #[test]
    fn invalid_endpoint_quotes_the_offending_string() {
        let err = WebhookError::InvalidEndpoint("12".to_string());
        assert_eq!(
            err.to_string(),
            r#"invalid webhook endpoint, expected valid URL, got "12""#
        );
    }

    #[test]
    fn obscured_rejection_hides_the_reason() {
        let err = AuthenticationError::new(SignatureError::Expired, false);
        assert_eq!(err.to_string(), SIGNATURE_REJECTION_MESSAGE);
        assert_eq!(err.reason(), &SignatureError::Expired);
    }

    #[test]
    fn debug_rejection_exposes_the_reason() {
        let expired = AuthenticationError::new(SignatureError::Expired, true);
        assert_eq!(
            expired.to_string(),
            "webhook request malformed, expired signature header"
        );

        let missing = AuthenticationError::new(
            SignatureError::InvalidHeader(SignatureHeaderError::Missing),
            true,
        );
        assert_eq!(
            missing.to_string(),
            "webhook request malformed, missing or invalid signature header"
        );

        let mismatch = AuthenticationError::new(SignatureError::Mismatch, true);
        assert_eq!(
            mismatch.to_string(),
            "webhook request malformed, signature mismatch"
        );
    }
}
