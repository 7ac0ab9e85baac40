//! Error handling for the keystore core
//!
//! This module defines the error types used throughout the keystore core.
//! Messages never carry passwords, mnemonics or private keys.

use thiserror::Error;

/// Account error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid password for account: {0}")]
    InvalidPassword(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Ledger device error: {0}")]
    Device(String),

    #[error("Ledger device timed out: {0}")]
    Timeout(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an already exists error
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists(message.into())
    }

    /// Create an invalid password error
    pub fn invalid_password(message: impl Into<String>) -> Self {
        Self::InvalidPassword(message.into())
    }

    /// Create an invalid format error
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }

    /// Create a device error
    pub fn device(message: impl Into<String>) -> Self {
        Self::Device(message.into())
    }

    /// Create a device timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a cancellation
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a cryptographic error
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Only a wrong password is worth prompting again for.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InvalidPassword(_))
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

// Standard library error conversions
impl From<std::io::Error> for AccountError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("IO error: {}", err))
    }
}

impl From<hex::FromHexError> for AccountError {
    fn from(err: hex::FromHexError) -> Self {
        Self::invalid_format(format!("Hex decoding error: {}", err))
    }
}

impl From<serde_json::Error> for AccountError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(format!("JSON error: {}", err))
    }
}

impl From<base64::DecodeError> for AccountError {
    fn from(err: base64::DecodeError) -> Self {
        Self::storage(format!("Base64 decoding error: {}", err))
    }
}

impl From<tokio::task::JoinError> for AccountError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join error: {}", err))
    }
}

// Cryptographic error conversions
impl From<secp256k1::Error> for AccountError {
    fn from(err: secp256k1::Error) -> Self {
        Self::crypto(format!("Secp256k1 error: {}", err))
    }
}

impl From<bip32::Error> for AccountError {
    fn from(err: bip32::Error) -> Self {
        Self::crypto(format!("Key derivation error: {}", err))
    }
}

impl From<bip39::Error> for AccountError {
    fn from(err: bip39::Error) -> Self {
        Self::validation(format!("Invalid mnemonic: {}", err))
    }
}

impl From<argon2::password_hash::Error> for AccountError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::crypto(format!("Password hash error: {}", err))
    }
}

impl From<argon2::Error> for AccountError {
    fn from(err: argon2::Error) -> Self {
        Self::crypto(format!("Argon2 error: {}", err))
    }
}

impl From<keyring::Error> for AccountError {
    fn from(err: keyring::Error) -> Self {
        Self::storage(format!("OS credential store error: {}", err))
    }
}
