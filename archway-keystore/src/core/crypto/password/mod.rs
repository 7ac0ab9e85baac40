//! Password handling for the keystore core
//!
//! Key derivation parameters and the injectable password source.

pub mod password_config;
pub mod password_provider;

// Re-export all public items from submodules
pub use password_config::*;
pub use password_provider::*;
