use std::time::Duration;

use chrono::Utc;
use postern_signature::{
    SigningContext, canonical_json, compute_event_signature, encode_signature_header,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::endpoint::sanitize_webhook_endpoint;
use crate::error::WebhookError;
use crate::event::WebhookEvent;

/// Request timeout applied to every delivery attempt.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Outbound webhook delivery.
///
/// Signs each event with the shared context and posts it exactly once.
/// Retry policy belongs to the caller: a failed delivery is reported, not
/// retried, so receivers never see surprise duplicates.
#[derive(Debug, Clone)]
pub struct WebhookDispatcher {
    client: Client,
    ctx: SigningContext,
}

impl WebhookDispatcher {
    pub fn new(ctx: SigningContext) -> Self {
        Self::with_timeout(ctx, DEFAULT_DISPATCH_TIMEOUT)
    }

    /// Dispatcher with a non-default per-request timeout.
    pub fn with_timeout(ctx: SigningContext, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client, ctx }
    }

    /// Sign `event` and POST it to `endpoint`, once.
    ///
    /// The request body is the exact canonical JSON the signature covers,
    /// with the signature header alongside. Dropping the returned future
    /// aborts the request; there is no partial state to clean up.
    pub async fn dispatch<D: Serialize>(
        &self,
        event: &WebhookEvent<D>,
        endpoint: &str,
    ) -> Result<(), WebhookError> {
        let url = sanitize_webhook_endpoint(endpoint)?;
        let timestamp = Utc::now().timestamp_millis();

        let body = canonical_json(event)?;
        let signature = compute_event_signature(event, timestamp, self.ctx.secret())?;

        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(
                self.ctx.header_key(),
                encode_signature_header(timestamp, &signature),
            )
            .body(body)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!("webhook delivery failed: endpoint={url} error={err}");
                WebhookError::DeliveryFailed {
                    status: None,
                    message: err.to_string(),
                }
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("webhook delivered: endpoint={url} type={}", event.kind);
            return Ok(());
        }

        let message = remote_error_message(response, status).await;
        tracing::warn!(
            "webhook rejected by remote: endpoint={url} status={status} message={message}"
        );
        Err(WebhookError::DeliveryFailed {
            status: Some(status.as_u16()),
            message,
        })
    }
}

#[derive(Deserialize)]
struct RemoteError {
    error: Option<RemoteErrorDetail>,
}

#[derive(Deserialize)]
struct RemoteErrorDetail {
    message: Option<String>,
}

/// Best available failure description: the remote's own error message
/// when its body carries one, else the HTTP status reason.
async fn remote_error_message(response: reqwest::Response, status: StatusCode) -> String {
    if let Ok(remote) = response.json::<RemoteError>().await {
        if let Some(message) = remote.error.and_then(|detail| detail.message) {
            return message;
        }
    }
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::user_sign_up_event;

    #[tokio::test]
    async fn invalid_endpoint_fails_before_any_request_is_made() {
        let dispatcher = WebhookDispatcher::new(SigningContext::new("testkey"));
        let event = user_sign_up_event("u-1");

        let err = dispatcher.dispatch(&event, "/no-domain").await.unwrap_err();
        assert_eq!(err, WebhookError::InvalidEndpoint("/no-domain".to_string()));
    }

    #[test]
    fn dispatcher_debug_output_redacts_the_secret() {
        let dispatcher = WebhookDispatcher::new(SigningContext::new("super-secret"));
        assert!(!format!("{dispatcher:?}").contains("super-secret"));
    }
}
