use serde::{Deserialize, Serialize};

/// Envelope for a webhook event of any payload shape.
///
/// Immutable once constructed; equality is structural. The canonical JSON
/// of the whole envelope is what gets signed and shipped as the request
/// body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent<D> {
    pub data: D,
    #[serde(rename = "type")]
    pub kind: WebhookEventType,
}

/// The closed set of event types this package emits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    #[serde(rename = "user.sign_in")]
    UserSignIn,
    #[serde(rename = "user.sign_up")]
    UserSignUp,
}

impl WebhookEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            WebhookEventType::UserSignIn => "user.sign_in",
            WebhookEventType::UserSignUp => "user.sign_up",
        }
    }
}

impl core::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by user lifecycle events.
///
/// Deliberately only the id: receivers that need more look the user up
/// themselves rather than trusting a snapshot that may already be stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEventData {
    pub user: UserSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
}

pub type UserSignInEvent = WebhookEvent<UserEventData>;
pub type UserSignUpEvent = WebhookEvent<UserEventData>;

/// Build the `user.sign_in` event for a user id.
pub fn user_sign_in_event(user_id: impl Into<String>) -> UserSignInEvent {
    WebhookEvent {
        data: UserEventData {
            user: UserSummary {
                id: user_id.into(),
            },
        },
        kind: WebhookEventType::UserSignIn,
    }
}

/// Build the `user.sign_up` event for a user id.
pub fn user_sign_up_event(user_id: impl Into<String>) -> UserSignUpEvent {
    WebhookEvent {
        data: UserEventData {
            user: UserSummary {
                id: user_id.into(),
            },
        },
        kind: WebhookEventType::UserSignUp,
    }
}
