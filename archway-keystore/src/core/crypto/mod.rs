//! Cryptographic functionality for the keystore core
//!
//! This module provides key derivation, blob encryption and digital signatures.
//!
//! SECURITY: secret material handled here lives in zeroizing buffers and is
//! never logged.

pub mod keys;
pub mod signatures;
pub mod encryption;
pub mod password;

// Re-export all public items from submodules
pub use keys::*;
pub use signatures::*;
pub use encryption::*;
pub use password::*;
