//! Slack request signing (v0).
//!
//! `X-Slack-Signature` is `v0=` + hex(HMAC-SHA256(secret, "v0:{timestamp}:{body}")).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Result, SlackError};

type HmacSha256 = Hmac<Sha256>;

/// Requests older than this are rejected as replays.
pub const MAX_REQUEST_AGE_SECS: i64 = 60 * 5;

pub fn sign(signing_secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(b"v0:");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

/// Verify a request against the app's signing secret. `now` is unix seconds.
pub fn verify(
    signing_secret: &str,
    timestamp: &str,
    body: &[u8],
    signature: &str,
    now: i64,
) -> Result<()> {
    let ts: i64 = timestamp
        .parse()
        .map_err(|_| SlackError::Signature("malformed timestamp"))?;
    if (now - ts).abs() > MAX_REQUEST_AGE_SECS {
        return Err(SlackError::Signature("stale timestamp"));
    }

    let expected = sign(signing_secret, timestamp, body);
    if !constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        return Err(SlackError::Signature("mismatch"));
    }
    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

    #[test]
    fn accepts_correctly_signed_request() {
        let body = br#"{"type":"event_callback"}"#;
        let sig = sign(SECRET, "1531420618", body);
        assert!(verify(SECRET, "1531420618", body, &sig, 1531420618 + 10).is_ok());
    }

    #[test]
    fn rejects_tampered_body() {
        let sig = sign(SECRET, "1531420618", b"original");
        let err = verify(SECRET, "1531420618", b"tampered", &sig, 1531420618).unwrap_err();
        assert!(matches!(err, SlackError::Signature("mismatch")));
    }

    #[test]
    fn rejects_stale_timestamp() {
        let body = b"{}";
        let sig = sign(SECRET, "1000", body);
        let err = verify(SECRET, "1000", body, &sig, 1000 + MAX_REQUEST_AGE_SECS + 1).unwrap_err();
        assert!(matches!(err, SlackError::Signature("stale timestamp")));
    }

    #[test]
    fn rejects_malformed_timestamp() {
        assert!(verify(SECRET, "yesterday", b"{}", "v0=00", 0).is_err());
    }

    #[test]
    fn signature_has_v0_prefix_and_hex_digest() {
        let sig = sign(SECRET, "1", b"x");
        assert!(sig.starts_with("v0="));
        assert_eq!(sig.len(), 3 + 64);
    }
}
