//! Error types for the keyfob authenticator
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for the keyfob application
#[derive(Error, Debug)]
pub enum KeyfobError {
    /// Errors related to OTP/TOTP generation
    #[error("OTP error: {0}")]
    Otp(#[from] OtpError),

    /// Errors related to the credential store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Errors related to loading or saving application state
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// OTP/TOTP generation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid Base32 secret")]
    InvalidSecret,
}

/// Credential store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid secret: {0}")]
    InvalidSecret(#[from] OtpError),

    #[error("An account named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("No account named '{name}'")]
    NotFound { name: String },

    #[error("Account name cannot be empty")]
    EmptyName,
}

/// State persistence errors
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State file is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("HOME environment variable not set")]
    NoHome,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, KeyfobError>;
