//! The `t=<timestamp> v1=<signature>` header format.

use thiserror::Error;

/// A parsed signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureToken {
    /// Epoch milliseconds at which the payload was signed.
    pub timestamp: i64,
    /// Base64-encoded HMAC digest.
    pub value: String,
}

/// Failure to extract a [`SignatureToken`] from a raw header.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureHeaderError {
    /// The header was absent or empty.
    #[error("no signature header string to parse")]
    Missing,

    /// The header was present but did not carry both a `t` and a `v1`
    /// token with non-empty values, or the timestamp was not an integer.
    #[error("malformed signature header")]
    Malformed,
}

/// Render the header value advertising `signature` as scheme version 1.
pub fn encode_signature_header(timestamp: i64, signature: &str) -> String {
    format!("t={timestamp} v1={signature}")
}

/// Parse a raw header value into a [`SignatureToken`].
///
/// Tokens are separated by runs of whitespace and may appear in any order.
/// Unrecognized tokens (a future `v2=...`, say) are ignored so receivers
/// keep working while a new scheme rolls out. Each token splits on its
/// first `=` only, leaving base64 padding inside the value intact. When a
/// key repeats, the last occurrence wins.
pub fn parse_signature_header(raw: &str) -> Result<SignatureToken, SignatureHeaderError> {
    if raw.is_empty() {
        return Err(SignatureHeaderError::Missing);
    }

    let mut timestamp = None;
    let mut value = None;

    for token in raw.split_whitespace() {
        let Some((key, val)) = token.split_once('=') else {
            continue;
        };
        match key {
            "t" if !val.is_empty() => timestamp = Some(val),
            "v1" if !val.is_empty() => value = Some(val),
            _ => {}
        }
    }

    let (Some(timestamp), Some(value)) = (timestamp, value) else {
        return Err(SignatureHeaderError::Malformed);
    };

    let timestamp = timestamp
        .parse::<i64>()
        .map_err(|_| SignatureHeaderError::Malformed)?;

    Ok(SignatureToken {
        timestamp,
        value: value.to_string(),
    })
}
