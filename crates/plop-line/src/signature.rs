//! Webhook signature verification.
//!
//! LINE signs the raw request body with HMAC-SHA256 over the channel
//! secret and sends the digest base64-encoded in `X-Line-Signature`.
//! Verification failure maps to HTTP 400 with no partial processing.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("missing X-Line-Signature header")]
    MissingHeader,
    #[error("signature is not valid base64")]
    MalformedSignature,
    #[error("signature does not match request body")]
    Mismatch,
}

/// Checks the webhook signature against the raw body bytes.
pub fn verify_signature(
    channel_secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), SignatureError> {
    let signature = signature.ok_or(SignatureError::MissingHeader)?;
    let provided = BASE64
        .decode(signature.trim())
        .map_err(|_| SignatureError::MalformedSignature)?;

    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| SignatureError::Mismatch)?;
    mac.update(body);
    mac.verify_slice(&provided)
        .map_err(|_| SignatureError::Mismatch)
}
