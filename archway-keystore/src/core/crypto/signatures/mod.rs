//! Digital signatures
//!
//! secp256k1 signing primitives and the signer abstraction shared by
//! software keys and hardware wallets.

pub mod signature_manager;
pub mod signer;

pub use signature_manager::*;
pub use signer::*;
