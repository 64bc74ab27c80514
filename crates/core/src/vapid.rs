//! VAPID key generation (RFC 8292).
//!
//! Keys are produced in the encoding push libraries and browsers expect:
//! the public key is the 65-byte uncompressed SEC1 point, the private key is
//! the raw 32-byte scalar, both base64url without padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL;
use base64::Engine;
use p256::ecdsa::SigningKey;
use p256::elliptic_curve::rand_core::OsRng;

/// A freshly generated P-256 keypair.
#[derive(Debug, Clone)]
pub struct VapidKeyPair {
    pub public_key: String,
    pub private_key: String,
}

impl VapidKeyPair {
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let public_point = signing_key.verifying_key().to_encoded_point(false);

        Self {
            public_key: BASE64URL.encode(public_point.as_bytes()),
            private_key: BASE64URL.encode(signing_key.to_bytes().as_slice()),
        }
    }

    /// The pair in the bundled `public:private` form accepted by `VAPID_KEYS`.
    pub fn bundled(&self) -> String {
        format!("{}:{}", self.public_key, self.private_key)
    }
}

/// Whether `encoded` is a base64url 65-byte uncompressed P-256 point.
pub fn is_valid_public_key(encoded: &str) -> bool {
    BASE64URL
        .decode(encoded)
        .is_ok_and(|bytes| bytes.len() == 65 && bytes[0] == 0x04)
}

/// Whether `encoded` is a base64url raw 32-byte P-256 scalar.
///
/// The push library asserts on the scalar length, so delivery code must not
/// hand it a key that fails this check.
pub fn is_valid_private_key(encoded: &str) -> bool {
    BASE64URL
        .decode(encoded)
        .is_ok_and(|bytes| bytes.len() == 32 && SigningKey::from_slice(&bytes).is_ok())
}
