//! Encryption functionality for the keystore core
//!
//! This module handles the password based AES-256-GCM encryption of account blobs.

pub mod encryption_manager;
pub mod encrypted_data;

// Re-export all public items from submodules
pub use encryption_manager::*;
pub use encrypted_data::*;
