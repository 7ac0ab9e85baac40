//! Keystore backends
//!
//! Concrete `KeystoreBackend` implementations: OS credential store,
//! password-encrypted files and an in-memory store for tests.

pub mod file;
pub mod memory;
pub mod os;

pub use file::FileKeystore;
pub use memory::TestKeystore;
pub use os::OsKeystore;

use crate::core::crypto::password::PasswordProvider;
use crate::domain::repositories::KeystoreBackend;
use crate::infrastructure::config::KeystoreConfig;
use crate::shared::types::KeystoreBackendType;
use std::sync::Arc;

/// Build the backend for `backend_type` from the configuration
pub fn open_backend(
    backend_type: KeystoreBackendType,
    config: &KeystoreConfig,
    passwords: Arc<dyn PasswordProvider>,
) -> Box<dyn KeystoreBackend> {
    log::debug!("Opening {} keystore", backend_type);
    match backend_type {
        KeystoreBackendType::Os => Box::new(OsKeystore::new(&config.keystore_dir)),
        KeystoreBackendType::File => {
            Box::new(FileKeystore::new(&config.keystore_dir, config.kdf, passwords))
        }
        KeystoreBackendType::Test => Box::new(TestKeystore::new()),
    }
}
