//! Type definitions and wrappers for secure data handling
//!
//! This module provides type-safe wrappers for sensitive data using the
//! secrecy crate to prevent accidental exposure in logs or debug output.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wrapper for Base32-encoded TOTP secrets
///
/// This type ensures secrets are never accidentally logged or exposed
/// in debug output, maintaining security throughout the application.
/// Spaces are stripped at construction so secrets pasted from provider
/// setup pages ("JBSW Y3DP EHPK 3PXP") and their compact form compare
/// and decode identically.
#[derive(Clone, Debug)]
pub struct Secret(SecretString);

impl Secret {
    /// Create a new Secret from a Base32-encoded string
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::new(secret.into().replace(' ', "")))
    }

    /// Expose the secret value (use with caution!)
    ///
    /// This should only be called when absolutely necessary,
    /// such as when passing to cryptographic functions.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for Secret {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for Secret {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for Secret {}

// The state file stores secrets as plain JSON strings, so serialization
// deliberately exposes the inner value.
impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// A generated one-time code
///
/// Always six ASCII digits, zero-padded. Codes have a 30-second lifetime
/// and exist to be displayed, so unlike [`Secret`] they are not wrapped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Code(String);

impl Code {
    pub(crate) fn from_value(value: u32) -> Self {
        Self(format!("{:06}", value))
    }

    /// The raw six-digit string, e.g. `"287082"`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The code split in two groups of three for readability, e.g. `"287 082"`
    pub fn grouped(&self) -> String {
        format!("{} {}", &self.0[..3], &self.0[3..])
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named account and its secret
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub name: String,
    pub secret: Secret,
}
