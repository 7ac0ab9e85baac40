//! Domain repositories
//!
//! Storage contracts the core depends on.

pub mod keystore_backend;

pub use keystore_backend::*;
