//! Signature computation and verification.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

use crate::context::SigningContext;
use crate::header::{SignatureHeaderError, parse_signature_header};

type HmacSha256 = Hmac<Sha256>;

/// Failure to compute or verify an event signature.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature header was absent, empty, or structurally invalid.
    #[error("missing or invalid signature header")]
    InvalidHeader(#[from] SignatureHeaderError),

    /// The embedded timestamp is older than the configured replay window.
    #[error("expired signature header")]
    Expired,

    /// The recomputed signature differs from the supplied one.
    #[error("signature mismatch")]
    Mismatch,

    /// The event could not be serialized into its canonical form.
    #[error("event serialization failed: {0}")]
    Serialization(String),

    /// The signing secret was rejected by the HMAC implementation.
    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),
}

/// Serialize `event` into its canonical JSON form.
///
/// Canonical form is compact JSON with object keys in lexicographic order
/// at every nesting level, the ordering `serde_json` applies to maps.
/// Signer and verifier both pass events through here, so signatures stay
/// byte-stable no matter how struct fields are declared or how an inbound
/// request body happened to order its keys.
pub fn canonical_json<E: Serialize>(event: &E) -> Result<String, SignatureError> {
    let value =
        serde_json::to_value(event).map_err(|err| SignatureError::Serialization(err.to_string()))?;
    serde_json::to_string(&value).map_err(|err| SignatureError::Serialization(err.to_string()))
}

/// Compute the base64 HMAC-SHA256 signature for `event` at `timestamp`.
///
/// The signed material is `<timestamp>.<canonical_json(event)>`. Folding
/// the timestamp into the digest means an attacker cannot replay an old
/// payload under a fresh timestamp without breaking the signature.
pub fn compute_event_signature<E: Serialize>(
    event: &E,
    timestamp: i64,
    secret: &str,
) -> Result<String, SignatureError> {
    let payload = format!("{timestamp}.{}", canonical_json(event)?);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| SignatureError::InvalidSecret(err.to_string()))?;
    mac.update(payload.as_bytes());

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Verify `raw_header` against `event` given the clock reading `now_ms`.
///
/// Checks run cheapest-first: header structure, then the replay window,
/// then the recomputed digest. On success the verified signature value is
/// returned; callers use it as an opaque per-delivery identity token.
pub fn verify_event_signature<E: Serialize>(
    event: &E,
    raw_header: &str,
    ctx: &SigningContext,
    now_ms: i64,
) -> Result<String, SignatureError> {
    let token = parse_signature_header(raw_header)?;

    // Saturating: a parsed timestamp near i64::MIN must read as ancient,
    // not overflow the subtraction.
    if now_ms.saturating_sub(token.timestamp) > ctx.max_age_ms() {
        return Err(SignatureError::Expired);
    }

    let expected = compute_event_signature(event, token.timestamp, ctx.secret())?;
    if !constant_time_eq(expected.as_bytes(), token.value.as_bytes()) {
        return Err(SignatureError::Mismatch);
    }

    Ok(expected)
}

/// Compare two byte strings without leaking the position of the first
/// difference through timing.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::header::encode_signature_header;

    fn sample_event() -> serde_json::Value {
        json!({
            "data": { "user": { "id": "ede4bf8e-38f8-4ff7-b07a-2836de2ba904" } },
            "type": "user.sign_up",
        })
    }

    #[test]
    fn canonical_json_is_compact_with_sorted_keys() {
        let rendered = canonical_json(&json!({
            "zulu": 1,
            "alpha": { "delta": true, "bravo": [1, 2] },
        }))
        .unwrap();
        assert_eq!(rendered, r#"{"alpha":{"bravo":[1,2],"delta":true},"zulu":1}"#);
    }

    #[test]
    fn field_declaration_order_does_not_change_the_canonical_form() {
        #[derive(serde::Serialize)]
        struct Reversed {
            r#type: &'static str,
            data: u8,
        }

        let rendered = canonical_json(&Reversed {
            r#type: "user.sign_in",
            data: 7,
        })
        .unwrap();
        assert_eq!(rendered, r#"{"data":7,"type":"user.sign_in"}"#);
    }

    #[test]
    fn computes_the_known_answer_signature() {
        let signature = compute_event_signature(&sample_event(), 1683561413, "testkey").unwrap();
        assert_eq!(signature, "YVDHA/tG6mDid95MtrBpcc4+RegJ7WpMpQlGQIekcQc=");
    }

    #[test]
    fn different_secrets_produce_different_signatures() {
        let a = compute_event_signature(&sample_event(), 1683561413, "testkey").unwrap();
        let b = compute_event_signature(&sample_event(), 1683561413, "otherkey").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verifies_the_known_answer_header() {
        let ctx = SigningContext::new("Secret Enchanted Broccoli Forest");
        let raw =
            encode_signature_header(1683810604, "k3sYVKM84CvM8szBhNkXJbbYUgb3WRKpSdVe/wEG5EY=");

        let verified = verify_event_signature(&sample_event(), &raw, &ctx, 1683810604 + 320);
        assert_eq!(
            verified.unwrap(),
            "k3sYVKM84CvM8szBhNkXJbbYUgb3WRKpSdVe/wEG5EY="
        );
    }

    #[test]
    fn header_exactly_at_the_replay_window_still_verifies() {
        let ctx = SigningContext::new("testkey");
        let timestamp = 1_683_810_604_000_i64;
        let signature = compute_event_signature(&sample_event(), timestamp, "testkey").unwrap();
        let raw = encode_signature_header(timestamp, &signature);

        let now = timestamp + ctx.max_age_ms();
        assert!(verify_event_signature(&sample_event(), &raw, &ctx, now).is_ok());
    }

    #[test]
    fn header_one_millisecond_past_the_window_is_expired() {
        let ctx = SigningContext::new("testkey");
        let timestamp = 1_683_810_604_000_i64;
        let signature = compute_event_signature(&sample_event(), timestamp, "testkey").unwrap();
        let raw = encode_signature_header(timestamp, &signature);

        let now = timestamp + ctx.max_age_ms() + 1;
        assert_eq!(
            verify_event_signature(&sample_event(), &raw, &ctx, now),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn timestamps_at_the_integer_extremes_are_rejected() {
        let ctx = SigningContext::new("testkey");
        let now = 1_683_810_604_000_i64;

        let raw =
            encode_signature_header(i64::MIN, "k3sYVKM84CvM8szBhNkXJbbYUgb3WRKpSdVe/wEG5EY=");
        assert_eq!(
            verify_event_signature(&sample_event(), &raw, &ctx, now),
            Err(SignatureError::Expired)
        );

        let raw =
            encode_signature_header(i64::MAX, "k3sYVKM84CvM8szBhNkXJbbYUgb3WRKpSdVe/wEG5EY=");
        assert_eq!(
            verify_event_signature(&sample_event(), &raw, &ctx, now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn tampered_event_fails_with_a_mismatch() {
        let ctx = SigningContext::new("testkey");
        let timestamp = 1_683_810_604_000_i64;
        let signature = compute_event_signature(&sample_event(), timestamp, "testkey").unwrap();
        let raw = encode_signature_header(timestamp, &signature);

        let tampered = json!({
            "data": { "user": { "id": "someone-else" } },
            "type": "user.sign_up",
        });
        assert_eq!(
            verify_event_signature(&tampered, &raw, &ctx, timestamp + 1),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn altered_header_timestamp_fails_with_a_mismatch() {
        let ctx = SigningContext::new("testkey");
        let timestamp = 1_683_810_604_000_i64;
        let signature = compute_event_signature(&sample_event(), timestamp, "testkey").unwrap();
        let raw = encode_signature_header(timestamp + 1, &signature);

        assert_eq!(
            verify_event_signature(&sample_event(), &raw, &ctx, timestamp + 1),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn wrong_secret_fails_with_a_mismatch() {
        let timestamp = 1_683_810_604_000_i64;
        let signature = compute_event_signature(&sample_event(), timestamp, "testkey").unwrap();
        let raw = encode_signature_header(timestamp, &signature);

        let ctx = SigningContext::new("not-the-signing-key");
        assert_eq!(
            verify_event_signature(&sample_event(), &raw, &ctx, timestamp + 1),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn structural_header_problems_surface_as_invalid_header() {
        let ctx = SigningContext::new("testkey");
        let now = 1_683_810_604_000_i64;

        assert_eq!(
            verify_event_signature(&sample_event(), "", &ctx, now),
            Err(SignatureError::InvalidHeader(SignatureHeaderError::Missing))
        );
        assert_eq!(
            verify_event_signature(&sample_event(), "t=1683810604 v1=", &ctx, now),
            Err(SignatureError::InvalidHeader(
                SignatureHeaderError::Malformed
            ))
        );
    }

    #[test]
    fn constant_time_eq_matches_equality() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
        assert!(constant_time_eq(b"", b""));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any event signed at any timestamp inside the replay
        /// window verifies successfully against the header it was encoded
        /// into, and the returned token equals the computed signature.
        #[test]
        fn signed_headers_always_verify_inside_the_window(
            user_id in "[a-z0-9-]{1,64}",
            secret in "[ -~]{1,64}",
            timestamp in 0i64..=4_102_444_800_000i64,
            skew in 0i64..=180_000i64,
        ) {
            let event = json!({ "data": { "user": { "id": user_id } }, "type": "user.sign_in" });
            let ctx = SigningContext::new(secret.clone());

            let signature = compute_event_signature(&event, timestamp, &secret).unwrap();
            let raw = encode_signature_header(timestamp, &signature);

            let verified = verify_event_signature(&event, &raw, &ctx, timestamp + skew).unwrap();
            prop_assert_eq!(verified, signature);
        }

        /// Property: flipping any single character of the signature value
        /// is always rejected as a mismatch.
        #[test]
        fn corrupted_signatures_never_verify(
            timestamp in 0i64..=4_102_444_800_000i64,
            flip_at in 0usize..=43usize,
        ) {
            let event = json!({ "data": { "user": { "id": "u-1" } }, "type": "user.sign_in" });
            let ctx = SigningContext::new("testkey");

            let signature = compute_event_signature(&event, timestamp, "testkey").unwrap();
            let mut bytes = signature.into_bytes();
            let at = flip_at % bytes.len();
            bytes[at] = if bytes[at] == b'A' { b'B' } else { b'A' };
            let corrupted = String::from_utf8(bytes).unwrap();

            let raw = encode_signature_header(timestamp, &corrupted);
            prop_assert_eq!(
                verify_event_signature(&event, &raw, &ctx, timestamp),
                Err(SignatureError::Mismatch)
            );
        }
    }
}
