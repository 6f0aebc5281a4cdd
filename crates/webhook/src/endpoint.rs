use url::Url;

use crate::error::WebhookError;

/// Validate and normalize a webhook endpoint.
///
/// Only absolute URLs pass; anything relative or schemeless is refused
/// before a request is ever built. The parsed [`Url`] comes back
/// normalized (lowercased host, explicit path), which is what the
/// dispatcher actually posts to.
pub fn sanitize_webhook_endpoint(endpoint: &str) -> Result<Url, WebhookError> {
    Url::parse(endpoint).map_err(|_| WebhookError::InvalidEndpoint(endpoint.to_string()))
}
