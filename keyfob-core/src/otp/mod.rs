//! OTP engine
//!
//! Handles Base32 secret normalization, HMAC-SHA1, and HOTP/TOTP code
//! generation per RFC 4226 and RFC 6238.

pub mod base32;
pub mod hmac;
pub mod totp;

pub use totp::{hotp, totp, STEP_SECS};
