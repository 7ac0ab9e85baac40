//! Key management for the keystore core
//!
//! This module handles mnemonic generation, derivation paths and the scoped
//! wrappers that hold secret material in memory.

pub mod hd_path;
pub mod secure_private_key;
pub mod key_manager;
pub mod secure_seed_phrase;

// Re-export all public items from submodules
pub use hd_path::*;
pub use secure_private_key::*;
pub use key_manager::*;
pub use secure_seed_phrase::*;
