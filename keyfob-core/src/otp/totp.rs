//! HOTP (RFC 4226) and TOTP (RFC 6238) code generation
//!
//! Codes are generated from the raw HMAC-SHA1 digest via dynamic
//! truncation: SHA-1 only, six digits, 30-second step. Interoperates with
//! the standard authenticator apps, which all default to this profile.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::OtpError;
use crate::otp::{base32, hmac};
use crate::types::{Code, Secret};

/// Seconds per TOTP window (RFC 6238 default)
pub const STEP_SECS: u64 = 30;

/// Code length in decimal digits
pub const DIGITS: u32 = 6;

const MODULUS: u32 = 1_000_000; // 10^DIGITS

/// Generate an HOTP code for an explicit counter value
///
/// The secret must already be canonical Base32; no normalization is
/// applied here. The counter enters the HMAC as 8 big-endian bytes.
pub fn hotp(secret: &Secret, counter: u64) -> Result<Code, OtpError> {
    let key = base32::decode(secret.expose())?;
    let digest = hmac::hmac_sha1(&key, &counter.to_be_bytes());
    Ok(Code::from_value(truncate(&digest)))
}

/// Generate a TOTP code for a Unix timestamp
///
/// `None` means the current system clock. The secret is normalized
/// (spaces stripped, padding restored) before decoding, so hand-typed
/// input works here even when [`hotp`] would reject it.
pub fn totp(secret: &Secret, timestamp: Option<u64>) -> Result<Code, OtpError> {
    let time = timestamp.unwrap_or_else(unix_seconds);
    let normalized = Secret::new(base32::normalize(secret.expose()));
    hotp(&normalized, time / STEP_SECS)
}

/// Dynamic truncation per RFC 4226 §5.3
///
/// The low nibble of the last digest byte selects a 4-byte window, read
/// big-endian with the sign bit masked off.
fn truncate(digest: &[u8; 20]) -> u32 {
    let offset = (digest[19] & 0x0f) as usize;
    let value = u32::from_be_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    (value & 0x7fff_ffff) % MODULUS
}

fn unix_seconds() -> u64 {
    // A clock before the epoch yields counter 0 rather than an error
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Base32 encoding of the RFC 4226/6238 test key "12345678901234567890"
    const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn test_hotp_rfc4226_first_vectors() {
        let secret = Secret::new(RFC_SECRET);
        assert_eq!(hotp(&secret, 0).unwrap().as_str(), "755224");
        assert_eq!(hotp(&secret, 1).unwrap().as_str(), "287082");
        assert_eq!(hotp(&secret, 9).unwrap().as_str(), "520489");
    }

    #[test]
    fn test_totp_rfc6238_vector_at_59_seconds() {
        let secret = Secret::new(RFC_SECRET);
        assert_eq!(totp(&secret, Some(59)).unwrap().as_str(), "287082");
    }

    #[test]
    fn test_totp_zero_pads_short_values() {
        let secret = Secret::new(RFC_SECRET);
        // RFC 6238 vector with a leading zero
        assert_eq!(totp(&secret, Some(1234567890)).unwrap().as_str(), "005924");
    }

    #[test]
    fn test_totp_normalizes_but_hotp_does_not() {
        // 10 characters: valid alphabet, missing padding
        let unpadded = Secret::new("JBSWY3DPEE");

        assert_eq!(hotp(&unpadded, 1), Err(OtpError::InvalidSecret));
        assert!(totp(&unpadded, Some(59)).is_ok());
    }

    #[test]
    fn test_totp_rejects_undecodable_secret() {
        let secret = Secret::new("not base32 at all!");
        assert_eq!(totp(&secret, Some(59)), Err(OtpError::InvalidSecret));
    }

    #[test]
    fn test_codes_within_one_window_agree() {
        let secret = Secret::new(RFC_SECRET);
        // 30..=59 share counter 1; 60 starts counter 2
        assert_eq!(totp(&secret, Some(30)), totp(&secret, Some(59)));
        assert_ne!(totp(&secret, Some(59)), totp(&secret, Some(60)));
    }

    #[test]
    fn test_truncate_offset_stays_in_bounds() {
        // Last byte 0x0f selects the highest possible offset (15..19)
        let mut digest = [0u8; 20];
        digest[19] = 0x0f;
        digest[15] = 0x7f;
        let value = truncate(&digest);
        assert!(value < MODULUS);
    }
}
