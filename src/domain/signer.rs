use super::request::SignedPayload;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Computes the lowercase hex HMAC-SHA256 of `plaintext` keyed by `secret`.
///
/// Pure primitive: an empty secret is accepted here and rejected earlier by
/// configuration loading.
pub fn sign(plaintext: &str, secret: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(plaintext.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Hex signature sent as the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keeps signatures out of logs and panic messages.
impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Signature(..)")
    }
}

/// Binds the shared secret once so callers only hand over payloads.
#[derive(Clone)]
pub struct Signer {
    secret: String,
}

impl Signer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn sign_payload<P: SignedPayload>(&self, payload: &P) -> Signature {
        Signature(sign(&payload.signature_plaintext(), &self.secret))
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_matches_rfc4231_vector() {
        // RFC 4231 test case 2.
        let signature = sign("what do ya want for nothing?", "Jefe");
        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_sign_is_deterministic_and_lowercase() {
        let a = sign("0102USD", "secret");
        let b = sign("0102USD", "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_sign_depends_on_secret() {
        assert_ne!(sign("payload", "one"), sign("payload", "two"));
    }

    #[test]
    fn test_signature_debug_hides_value() {
        let signer = Signer::new("secret");
        let rendered = format!("{:?} {:?}", signer, Signature(sign("x", "secret")));
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains(&sign("x", "secret")));
    }
}
