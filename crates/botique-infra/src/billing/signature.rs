//! Webhook signature verification (HMAC-SHA256).
//!
//! The processor signs `"{timestamp}.{raw_body}"` with the endpoint's
//! signing secret and sends the result in a `Stripe-Signature` header of the
//! form `t=<unix>,v1=<hex>[,v1=<hex>...]`. Verification recomputes the HMAC
//! and compares in constant time; any matching `v1` entry accepts the
//! payload.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Errors from webhook signature verification.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("malformed signature header")]
    MalformedHeader,

    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid signing secret: {0}")]
    InvalidKey(String),
}

/// Parsed `Stripe-Signature` header.
#[derive(Debug)]
struct SignatureHeader {
    timestamp: String,
    /// All `v1` candidate signatures, hex-encoded.
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> Result<SignatureHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for pair in header.split(',') {
        let Some((key, value)) = pair.trim().split_once('=') else {
            return Err(SignatureError::MalformedHeader);
        };
        match key {
            "t" => timestamp = Some(value.to_string()),
            "v1" => signatures.push(value.to_string()),
            // Unknown schemes (v0, future versions) are ignored.
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// Verify a webhook payload against its signature header.
///
/// Uses constant-time comparison (via the hmac crate's `verify_slice`) to
/// prevent timing attacks. No timestamp-tolerance window is enforced here;
/// replay protection is left to the processor's event idempotency.
pub fn verify_webhook_signature(
    secret: &[u8],
    body: &[u8],
    signature_header: &str,
) -> Result<(), SignatureError> {
    let header = parse_signature_header(signature_header)?;

    for candidate in &header.signatures {
        let Ok(expected) = hex_decode(candidate) else {
            continue;
        };

        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        mac.update(header.timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);

        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::VerificationFailed)
}

/// Decode a lowercase/uppercase hex string into bytes.
fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    if hex.len() % 2 != 0 {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"whsec_test_secret";

    /// Produce a valid header for a payload, the way the processor would.
    fn sign(body: &[u8], timestamp: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        let sig = mac.finalize().into_bytes();
        let hex: String = sig.iter().map(|b| format!("{b:02x}")).collect();
        format!("t={timestamp},v1={hex}")
    }

    #[test]
    fn test_valid_signature_accepted() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = sign(body, "1730000000");
        assert!(verify_webhook_signature(SECRET, body, &header).is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = sign(body, "1730000000");
        let result = verify_webhook_signature(SECRET, b"{\"type\":\"evil\"}", &header);
        assert!(matches!(result, Err(SignatureError::VerificationFailed)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"payload";
        let header = sign(body, "1730000000");
        let result = verify_webhook_signature(b"other_secret", body, &header);
        assert!(matches!(result, Err(SignatureError::VerificationFailed)));
    }

    #[test]
    fn test_timestamp_is_part_of_signed_payload() {
        let body = b"payload";
        let header = sign(body, "1730000000");
        // Same signature presented with a different timestamp must fail.
        let forged = header.replace("t=1730000000", "t=1730009999");
        let result = verify_webhook_signature(SECRET, body, &forged);
        assert!(matches!(result, Err(SignatureError::VerificationFailed)));
    }

    #[test]
    fn test_any_matching_v1_accepts() {
        let body = b"payload";
        let good = sign(body, "1730000000");
        let hex = good.split("v1=").nth(1).unwrap();
        // Secret-rotation shape: a stale signature alongside the valid one.
        let header = format!("t=1730000000,v1=deadbeef,v1={hex}");
        assert!(verify_webhook_signature(SECRET, body, &header).is_ok());
    }

    #[test]
    fn test_unknown_schemes_ignored() {
        let body = b"payload";
        let good = sign(body, "1730000000");
        let header = format!("{good},v0=ffff");
        assert!(verify_webhook_signature(SECRET, body, &header).is_ok());
    }

    #[test]
    fn test_malformed_headers_rejected() {
        for header in ["", "t=123", "v1=abcd", "no-equals-sign", "t=1,v1"] {
            let result = verify_webhook_signature(SECRET, b"x", header);
            assert!(
                matches!(result, Err(SignatureError::MalformedHeader)),
                "header {header:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_hex_decode() {
        assert_eq!(hex_decode("00ff10").unwrap(), vec![0x00, 0xff, 0x10]);
        assert!(hex_decode("abc").is_err());
        assert!(hex_decode("zz").is_err());
    }
}
