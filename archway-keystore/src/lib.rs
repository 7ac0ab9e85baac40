//! Archway Keystore
//!
//! Account and key management core for the Archway CLI.
//! Holds every piece of code that touches irrecoverable secrets.
//!
//! ## Architecture
//!
//! - **Core**: accounts facade, keystore backends, Ledger integration, crypto
//! - **Domain**: account entities and the keystore backend contract
//! - **Infrastructure**: configuration, encrypted file and OS credential storage
//! - **Shared**: common types, constants, errors and address utilities
//!
//! ## Security Features
//!
//! - Mnemonics and private keys live in zeroizing buffers and never reach logs
//! - File keystore blobs are Argon2id + AES-256-GCM encrypted, one per account
//! - Ledger keys never leave the device; every device call is time bounded
//! - Export and removal require an explicit confirmation
//!
//! ## Usage
//!
//! ```no_run
//! use archway_keystore::{
//!     Accounts, KeystoreBackendType, KeystoreConfig, StaticConfirmation, StaticPasswordProvider,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> archway_keystore::AccountResult<()> {
//! let accounts = Accounts::init(
//!     KeystoreBackendType::File,
//!     KeystoreConfig::default(),
//!     Arc::new(StaticPasswordProvider::new("correct horse")),
//! )?;
//!
//! let created = accounts.new_account("alice", None).await?;
//! println!("{} - back up your mnemonic now", created.account.address);
//!
//! let signer = accounts.get_with_signer("alice").await?;
//! let signature = signer.signer.sign(&created.account.address, b"sign doc").await?;
//!
//! accounts.remove("alice", &StaticConfirmation(true)).await?;
//! # let _ = signature;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Facade and collaborators
pub use crate::core::accounts::{Accounts, Confirmation, StaticConfirmation, TerminalConfirmation};
pub use crate::core::crypto::keys::{HdPath, KeyManager, SecurePrivateKey, SecureSeedPhrase};
pub use crate::core::crypto::password::{
    KdfParams, PasswordProvider, PromptPasswordProvider, StaticPasswordProvider,
};
pub use crate::core::crypto::signatures::{DirectSecp256k1Signer, OfflineSigner, SignerAccount};
pub use crate::core::ledger::{LedgerDevice, LedgerSigner, LedgerTimeouts, LedgerTransport};
pub use crate::core::storage::{FileKeystore, OsKeystore, TestKeystore};

// Domain entities and contracts
pub use crate::domain::entities::{
    Account, AccountBase, AccountWithMnemonic, AccountWithPrivateKey, AccountWithSigner,
    KeystoreEntry, PublicKeyInfo,
};
pub use crate::domain::repositories::KeystoreBackend;

// Configuration and shared types
pub use crate::infrastructure::config::KeystoreConfig;
pub use crate::shared::error::AccountError;
pub use crate::shared::types::{AccountResult, AccountType, KeystoreBackendType};
pub use crate::shared::utils::{is_valid_address, validate_address};

/// Install the `env_logger` subscriber. Safe to call more than once.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("archway_keystore=info");
    if env_logger::Builder::from_env(env).try_init().is_ok() {
        log::debug!("{} v{} logging initialised", NAME, VERSION);
    }
}

// Version information
pub use crate::shared::constants::{AUTHORS, DESCRIPTION, NAME, VERSION};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "archway-keystore");
    }
}
