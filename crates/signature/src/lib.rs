//! `postern-signature`: pure webhook signature codec.
//!
//! HMAC-SHA256 signatures over canonically serialized events, the
//! `t=<timestamp> v1=<signature>` header format, and time-bounded
//! verification. No HTTP, no I/O: both the outbound signer and the
//! inbound verifier build on this crate so the two sides can never
//! disagree on what was signed.

pub mod codec;
pub mod context;
pub mod header;

pub use codec::{
    SignatureError, canonical_json, compute_event_signature, verify_event_signature,
};
pub use context::{DEFAULT_MAX_AGE_SECONDS, DEFAULT_SIGNATURE_HEADER_KEY, SigningContext};
pub use header::{
    SignatureHeaderError, SignatureToken, encode_signature_header, parse_signature_header,
};
