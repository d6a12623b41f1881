//! Base32 handling for provisioning secrets
//!
//! Authenticator secrets come from QR codes and setup pages in inconsistent
//! shapes: grouped with spaces, lowercased, padding omitted. [`normalize`]
//! reshapes such input into canonical RFC 4648 form; [`decode`] is strict
//! apart from casefolding, so callers choose where leniency applies.

use crate::error::OtpError;
use data_encoding::BASE32;

/// Reshape a pasted secret into canonical Base32
///
/// Removes spaces and appends `=` padding up to the next 8-character
/// boundary. Padding formula: `(8 - len % 8) % 8`.
pub fn normalize(input: &str) -> String {
    let cleaned = input.replace(' ', "");
    let padding = (8 - cleaned.len() % 8) % 8;
    format!("{}{}", cleaned, "=".repeat(padding))
}

/// Decode a Base32 string to bytes
///
/// Decoding is case-insensitive but expects correct padding; run the input
/// through [`normalize`] first if it may be hand-typed. A secret that
/// decodes to zero bytes cannot key an HMAC meaningfully and is rejected.
pub fn decode(input: &str) -> Result<Vec<u8>, OtpError> {
    let bytes = BASE32
        .decode(input.to_uppercase().as_bytes())
        .map_err(|_| OtpError::InvalidSecret)?;

    if bytes.is_empty() {
        return Err(OtpError::InvalidSecret);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_spaces() {
        assert_eq!(normalize("JBSW Y3DP EHPK 3PXP"), "JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn test_normalize_pads_to_eight_char_boundary() {
        // (8 - len % 8) % 8 padding characters
        assert_eq!(normalize("A"), "A=======");
        assert_eq!(normalize("AB"), "AB======");
        assert_eq!(normalize("ABCDEFG"), "ABCDEFG=");
        assert_eq!(normalize("ABCDEFGH"), "ABCDEFGH");
        assert_eq!(normalize("JBSWY3DPEE"), "JBSWY3DPEE======");
    }

    #[test]
    fn test_normalize_leaves_canonical_input_alone() {
        assert_eq!(normalize("JBSWY3DPEHPK3PXP"), "JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn test_decode_known_value() {
        let bytes = decode("JBSWY3DPEE======").unwrap();
        assert_eq!(bytes, b"Hello!");
    }

    #[test]
    fn test_decode_rfc6238_secret() {
        let bytes = decode("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ").unwrap();
        assert_eq!(bytes, b"12345678901234567890");
    }

    #[test]
    fn test_decode_casefolds() {
        let upper = decode("JBSWY3DPEHPK3PXP").unwrap();
        let lower = decode("jbswy3dpehpk3pxp").unwrap();
        let mixed = decode("JbSwY3DpEhPk3PxP").unwrap();

        assert_eq!(upper, lower);
        assert_eq!(upper, mixed);
    }

    #[test]
    fn test_decode_rejects_invalid_characters() {
        // '1', '8', '9', and '!' are outside the RFC 4648 Base32 alphabet
        assert_eq!(decode("11111111"), Err(OtpError::InvalidSecret));
        assert_eq!(decode("ABCDEF8!"), Err(OtpError::InvalidSecret));
    }

    #[test]
    fn test_decode_rejects_missing_padding() {
        // Valid alphabet but length not a multiple of 8
        assert!(decode("JBSWY3DPEE").is_err());
    }

    #[test]
    fn test_decode_rejects_inputs_carrying_no_data() {
        assert_eq!(decode(""), Err(OtpError::InvalidSecret));
        assert_eq!(decode("========"), Err(OtpError::InvalidSecret));
    }

    #[test]
    fn test_normalize_then_decode_handles_pasted_secrets() {
        let pasted = normalize("jbsw y3dp ee");
        assert_eq!(decode(&pasted).unwrap(), b"Hello!");
    }
}
