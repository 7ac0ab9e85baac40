//! Domain entities and value objects

pub mod account;

pub use account::*;
