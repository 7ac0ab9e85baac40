//! Domain layer - entities and repositories
//!
//! Accounts, keystore tags and the keystore backend contract.

pub mod entities;
pub mod repositories;

pub use entities::*;
pub use repositories::*;
