//! Infrastructure layer
//!
//! Configuration and the secret storage primitives the keystore backends
//! write through.

pub mod config;
pub mod platform;

pub use config::*;
pub use platform::*;
