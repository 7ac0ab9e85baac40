//! Core keystore functionality
//!
//! The accounts facade and everything it composes: cryptography, keystore
//! backends and the Ledger integration.

pub mod accounts;
pub mod crypto;
pub mod ledger;
pub mod storage;
