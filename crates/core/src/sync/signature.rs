//! HMAC-SHA256 request signatures for bulk sync.
//!
//! The header value is `sha256=<lowercase hex>` computed over the exact raw body.
//! Comparison is constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature (`X-HMAC-Signature`).
pub const SIGNATURE_HEADER: &str = "x-hmac-signature";

const SCHEME_PREFIX: &str = "sha256=";

/// Why a signature was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// No signature header was sent.
    #[error("Missing signature")]
    Missing,
    /// The header is not `sha256=<hex>`.
    #[error("Malformed signature")]
    Malformed,
    /// The signature does not match the body.
    #[error("Invalid signature")]
    Mismatch,
    /// The shared secret cannot key an HMAC.
    #[error("Invalid signing key")]
    InvalidKey,
}

fn mac(secret: &[u8], body: &[u8]) -> Result<HmacSha256, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(body);
    Ok(mac)
}

/// Signs `body`, returning the full header value.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidKey`] if the secret is unusable.
pub fn sign(secret: &[u8], body: &[u8]) -> Result<String, SignatureError> {
    let digest = mac(secret, body)?.finalize().into_bytes();
    Ok(format!("{SCHEME_PREFIX}{}", hex::encode(digest)))
}

/// Verifies the signature header sent with `body`.
///
/// # Errors
///
/// Returns [`SignatureError`] when the header is missing, malformed, or wrong.
pub fn verify(secret: &[u8], body: &[u8], header: Option<&str>) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?.trim();
    let digest = header
        .strip_prefix(SCHEME_PREFIX)
        .ok_or(SignatureError::Malformed)?;
    let expected = hex::decode(digest).map_err(|_| SignatureError::Malformed)?;

    mac(secret, body)?
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compares a presented bearer token with the configured one in constant time.
///
/// Both sides are reduced to an HMAC keyed by `expected`, so the comparison time does
/// not depend on where the tokens first differ or on their lengths.
#[must_use]
pub fn tokens_match(expected: &str, presented: &str) -> bool {
    let Ok(reference) = mac(expected.as_bytes(), expected.as_bytes()) else {
        return false;
    };
    let digest = reference.finalize().into_bytes();

    mac(expected.as_bytes(), presented.as_bytes())
        .is_ok_and(|candidate| candidate.verify_slice(&digest).is_ok())
}
