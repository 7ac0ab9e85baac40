//! Platform secret storage
//!
//! The opaque blob stores the keystore backends write through: an
//! Argon2id/AES-256-GCM encrypted file per account, and the OS credential
//! store.
//!
//! SECURITY: payloads are only held in zeroizing buffers and are never logged.

pub mod file_storage;
pub mod keyring_storage;

pub use file_storage::*;
pub use keyring_storage::*;
