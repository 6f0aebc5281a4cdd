//! `postern-webhook`: signed webhook delivery and inbound authentication.
//!
//! Outbound, [`WebhookDispatcher`] signs an event and POSTs it to a
//! validated endpoint in a single attempt. Inbound, [`WebhookVerifier`]
//! authenticates a request through any type implementing the
//! [`WebhookRequest`] seam and produces a [`WebhookPrincipal`] keyed by
//! the verified signature. Both sides share one [`SigningContext`] and the
//! codec from `postern-signature`, so a dispatched event always verifies.

pub mod dispatcher;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod verifier;

pub use postern_signature::{SignatureError, SigningContext};

pub use dispatcher::{DEFAULT_DISPATCH_TIMEOUT, WebhookDispatcher};
pub use endpoint::sanitize_webhook_endpoint;
pub use error::{AuthenticationError, SIGNATURE_REJECTION_MESSAGE, WebhookError};
pub use event::{
    UserEventData, UserSignInEvent, UserSignUpEvent, UserSummary, WebhookEvent, WebhookEventType,
    user_sign_in_event, user_sign_up_event,
};
pub use verifier::{WebhookPrincipal, WebhookRequest, WebhookVerifier};
