//! Webhook signature verification.
//!
//! The platform signs each delivery with `hex(HMAC-SHA256(secret, body))`
//! computed over the exact bytes it sent. Verification therefore runs on
//! the raw request body, never on a re-serialized parse of it.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verifies `X-Signature` headers against a shared secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: Vec<u8>,
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("configured", &!self.secret.is_empty())
            .finish()
    }
}

impl SignatureVerifier {
    /// Create a verifier for the given shared secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Check `signature` (hex, either case) against `body`.
    ///
    /// An unconfigured secret never verifies.
    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        if self.secret.is_empty() {
            return false;
        }
        let Ok(expected) = hex::decode(signature.trim()) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.secret) else {
            return false;
        };
        mac.update(body);
        mac.verify_slice(&expected).is_ok()
    }

    /// Compute the lowercase hex signature for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        sign(&self.secret, body)
    }
}

/// Compute `hex(HMAC-SHA256(secret, body))`.
pub fn sign(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Compare two strings without short-circuiting on the first mismatch.
///
/// Lengths are compared directly; only the content comparison is
/// constant time.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).unwrap_u8() == 1
}
