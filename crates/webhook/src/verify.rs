//! Webhook signature verification

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature
pub const SIGNATURE_HEADER: &str = "X-Kline-Signature";

/// Scheme prefix of the signature header value
pub const SIGNATURE_PREFIX: &str = "sha256=";

const UNSUPPORTED_SCHEME: &str = "missing or unsupported signature scheme";

/// Shared HMAC key. Its contents never show up in `Debug` output.
#[derive(Clone)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for Secret {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Outcome of checking one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    /// Signature matches the body
    Valid,
    /// A `sha256=` signature was present but does not match
    Invalid,
    /// No recognized signature scheme in the header
    Malformed(&'static str),
}

impl VerificationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid)
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationResult::Valid => f.write_str("valid"),
            VerificationResult::Invalid => f.write_str("invalid"),
            VerificationResult::Malformed(reason) => write!(f, "malformed ({})", reason),
        }
    }
}

/// Lowercase hex HMAC-SHA256 of `payload` keyed by `secret`
pub fn compute_signature(payload: &[u8], secret: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Check a `X-Kline-Signature` header value against the raw body
///
/// `payload` is the raw request body, `header_value` the full header
/// (`sha256=<hex digest>`). The header is taken as bytes: HTTP header values
/// may carry non-UTF-8 octets, and those still count as a `sha256=`
/// signature that fails to match.
pub fn verify_signature(
    payload: &[u8],
    secret: &[u8],
    header_value: impl AsRef<[u8]>,
) -> VerificationResult {
    let received = match header_value
        .as_ref()
        .strip_prefix(SIGNATURE_PREFIX.as_bytes())
    {
        Some(s) => s,
        None => return VerificationResult::Malformed(UNSUPPORTED_SCHEME),
    };

    let expected = compute_signature(payload, secret);
    if constant_time_eq(received, expected.as_bytes()) {
        VerificationResult::Valid
    } else {
        VerificationResult::Invalid
    }
}

// Length is public (always 64 for a well-formed digest), so only the
// contents need the constant-time path.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Verifies deliveries against one shared secret
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: Secret,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<Secret>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Hex digest the sender should have produced for `payload`
    pub fn compute(&self, payload: &[u8]) -> String {
        compute_signature(payload, self.secret.as_bytes())
    }

    pub fn verify(&self, payload: &[u8], header_value: impl AsRef<[u8]>) -> VerificationResult {
        verify_signature(payload, self.secret.as_bytes(), header_value)
    }

    /// Full header value for `payload`, as the alert producer sends it
    pub fn sign(&self, payload: &[u8]) -> String {
        format!("{}{}", SIGNATURE_PREFIX, self.compute(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALERT: &[u8] =
        br#"{"id":"1","symbol":"BTCUSDT","type":"breakout","strength":0.8,"ts":1700000000}"#;
    const ALERT_SIGNATURE: &str =
        "4f743fdf00e25e52e36f7e5b666bc10b2932b98e92706bd219bcd817af1045d5";

    #[test]
    fn test_verify_signature() {
        let secret = b"test-secret";
        let body = b"test body";

        let signature = format!("sha256={}", compute_signature(body, secret));

        assert_eq!(
            verify_signature(body, secret, &signature),
            VerificationResult::Valid
        );
    }

    #[test]
    fn test_invalid_signature() {
        let secret = b"test-secret";
        let body = b"test body";

        assert_eq!(
            verify_signature(body, secret, "sha256=invalid"),
            VerificationResult::Invalid
        );
    }

    #[test]
    fn test_known_vector_empty_message() {
        assert_eq!(
            compute_signature(b"", b"key"),
            "5d5d139563c95b5967b9bd9a8c9b233a9dedb45072794cd232dc1b74832607d0"
        );
    }

    #[test]
    fn test_known_vector_quick_brown_fox() {
        assert_eq!(
            compute_signature(b"The quick brown fox jumps over the lazy dog", b"key"),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_empty_body_and_empty_secret() {
        let signature = compute_signature(b"", b"");
        assert_eq!(
            signature,
            "b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
        );
        assert_eq!(
            verify_signature(b"", b"", &format!("sha256={}", signature)),
            VerificationResult::Valid
        );
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let sig = compute_signature(b"data", b"secret");
        assert_eq!(sig.len(), 64);
        assert!(sig
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_roundtrip_various_payloads() {
        let payloads: [&[u8]; 4] = [b"", b"x", ALERT, &[0u8, 255, 10, 13]];
        let secrets: [&[u8]; 3] = [b"", b"my-secret", &[7u8; 100]];

        for payload in payloads {
            for secret in secrets {
                let header = format!("sha256={}", compute_signature(payload, secret));
                assert!(verify_signature(payload, secret, &header).is_valid());
            }
        }
    }

    #[test]
    fn test_every_single_bit_flip_is_invalid() {
        let secret = b"my-secret";
        let header = format!("sha256={}", compute_signature(ALERT, secret));
        let prefix_len = SIGNATURE_PREFIX.len();

        for pos in prefix_len..header.len() {
            // bits 0..=6 keep the byte ASCII, and so the header valid UTF-8
            for bit in 0..7 {
                let mut bytes = header.clone().into_bytes();
                bytes[pos] ^= 1 << bit;
                let tampered = String::from_utf8(bytes).unwrap();
                assert_eq!(
                    verify_signature(ALERT, secret, &tampered),
                    VerificationResult::Invalid,
                    "flip of bit {} at {} was accepted",
                    bit,
                    pos
                );
            }
        }
    }

    #[test]
    fn test_uppercase_hex_is_invalid() {
        let secret = b"my-secret";
        let header = format!(
            "sha256={}",
            compute_signature(ALERT, secret).to_ascii_uppercase()
        );
        assert_eq!(
            verify_signature(ALERT, secret, &header),
            VerificationResult::Invalid
        );
    }

    #[test]
    fn test_truncated_and_extended_signatures_are_invalid() {
        let secret = b"my-secret";
        let digest = compute_signature(ALERT, secret);

        let truncated = format!("sha256={}", &digest[..63]);
        let extended = format!("sha256={}0", digest);
        assert_eq!(
            verify_signature(ALERT, secret, &truncated),
            VerificationResult::Invalid
        );
        assert_eq!(
            verify_signature(ALERT, secret, &extended),
            VerificationResult::Invalid
        );
        assert_eq!(
            verify_signature(ALERT, secret, "sha256="),
            VerificationResult::Invalid
        );
    }

    #[test]
    fn test_missing_or_unknown_scheme_is_malformed() {
        let secret = b"my-secret";
        let digest = compute_signature(ALERT, secret);

        for header in ["", "md5=abcd", digest.as_str(), "SHA256=abcd", " sha256=abcd"] {
            assert_eq!(
                verify_signature(ALERT, secret, header),
                VerificationResult::Malformed("missing or unsupported signature scheme"),
                "header {:?}",
                header
            );
        }
    }

    #[test]
    fn test_non_utf8_after_prefix_is_invalid() {
        let secret = b"my-secret";
        let mut header = b"sha256=".to_vec();
        header.extend_from_slice(&[0xff, b'a', b'b', b'c']);

        assert_eq!(
            verify_signature(ALERT, secret, &header),
            VerificationResult::Invalid
        );
        assert_eq!(
            verify_signature(ALERT, secret, [0xffu8, b's', b'h', b'a']),
            VerificationResult::Malformed(UNSUPPORTED_SCHEME)
        );
    }

    #[test]
    fn test_changing_any_payload_byte_changes_signature() {
        let secret = b"my-secret";
        let original = compute_signature(ALERT, secret);

        for pos in 0..ALERT.len() {
            let mut altered = ALERT.to_vec();
            altered[pos] = altered[pos].wrapping_add(1);
            assert_ne!(compute_signature(&altered, secret), original);
        }
    }

    #[test]
    fn test_alert_golden_signature() {
        let verifier = SignatureVerifier::new("my-secret");
        assert_eq!(verifier.compute(ALERT), ALERT_SIGNATURE);

        let header = format!("sha256={}", ALERT_SIGNATURE);
        assert_eq!(verifier.verify(ALERT, &header), VerificationResult::Valid);

        let wrong = SignatureVerifier::new("wrong-secret");
        assert_eq!(wrong.verify(ALERT, &header), VerificationResult::Invalid);
    }

    #[test]
    fn test_sign_produces_header_value() {
        let verifier = SignatureVerifier::new("my-secret");
        let header = verifier.sign(ALERT);
        assert_eq!(header, format!("sha256={}", ALERT_SIGNATURE));
        assert!(verifier.verify(ALERT, &header).is_valid());
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let verifier = SignatureVerifier::new(String::from("hunter2"));
        let printed = format!("{:?}", verifier);
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_result_display() {
        assert_eq!(VerificationResult::Valid.to_string(), "valid");
        assert_eq!(VerificationResult::Invalid.to_string(), "invalid");
        assert_eq!(
            VerificationResult::Malformed(UNSUPPORTED_SCHEME).to_string(),
            "malformed (missing or unsupported signature scheme)"
        );
    }
}
