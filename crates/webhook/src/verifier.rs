use chrono::Utc;
use postern_signature::{SignatureError, SigningContext, verify_event_signature};
use serde::Serialize;

use crate::error::AuthenticationError;
use crate::event::WebhookEvent;

/// Borrowed view of an inbound HTTP request.
///
/// The seam to the host framework: anything that can surface a header and
/// the raw body bytes can be authenticated. Hosts with multi-value
/// headers return the first value.
pub trait WebhookRequest {
    fn header(&self, name: &str) -> Option<&str>;
    fn body(&self) -> &[u8];
}

/// Identity established for a verified inbound webhook request.
///
/// The id is the verified signature value: a per-delivery machine
/// identity for the sending service, not a user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPrincipal {
    pub id: String,
}

/// Inbound webhook authentication.
///
/// Reads the signature header named by the shared context, re-derives the
/// canonical event from the body bytes, and verifies the two against each
/// other. Rejections are deliberately uniform; see
/// [`AuthenticationError`].
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    ctx: SigningContext,
}

impl WebhookVerifier {
    pub fn new(ctx: SigningContext) -> Self {
        Self { ctx }
    }

    /// Authenticate `request`, producing the sender's principal.
    pub fn authenticate<R: WebhookRequest>(
        &self,
        request: &R,
    ) -> Result<WebhookPrincipal, AuthenticationError> {
        self.verify_request(request)
            .map(|signature| WebhookPrincipal { id: signature })
    }

    /// Verify `request` and return the verified signature value.
    ///
    /// Guard-style entry point for routes that only need the gate, not an
    /// identity.
    pub fn verify_request<R: WebhookRequest>(
        &self,
        request: &R,
    ) -> Result<String, AuthenticationError> {
        let raw_header = request.header(self.ctx.header_key()).unwrap_or_default();

        let event: WebhookEvent<serde_json::Value> = serde_json::from_slice(request.body())
            .map_err(|err| self.reject(SignatureError::Serialization(err.to_string())))?;

        let now = Utc::now().timestamp_millis();
        verify_event_signature(&event, raw_header, &self.ctx, now).map_err(|e| self.reject(e))
    }

    fn reject(&self, reason: SignatureError) -> AuthenticationError {
        tracing::debug!("webhook request rejected: {reason}");
        AuthenticationError::new(reason, self.ctx.debug_errors())
    }
}
