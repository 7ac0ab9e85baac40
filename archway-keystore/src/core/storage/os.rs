//! Keystore backed by the operating system's credential store.
//! The OS unlocks the store; no password is asked for here.

use crate::domain::entities::KeystoreEntry;
use crate::domain::repositories::KeystoreBackend;
use crate::infrastructure::platform::KeyringStore;
use crate::shared::types::{AccountResult, KeystoreBackendType, Tag};
use async_trait::async_trait;
use std::path::Path;
use zeroize::Zeroizing;

#[derive(Debug, Clone)]
pub struct OsKeystore {
    store: KeyringStore,
}

impl OsKeystore {
    /// Credentials under the default service, tag index kept in `index_dir`
    pub fn new(index_dir: &Path) -> Self {
        Self {
            store: KeyringStore::in_dir(index_dir),
        }
    }

    /// Credential store and index calls are synchronous; run them off the
    /// async workers.
    async fn blocking<T, F>(&self, f: F) -> AccountResult<T>
    where
        F: FnOnce(KeyringStore) -> AccountResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || f(store)).await?
    }
}

#[async_trait]
impl KeystoreBackend for OsKeystore {
    fn kind(&self) -> KeystoreBackendType {
        KeystoreBackendType::Os
    }

    async fn save_to_storage(&self, entry: &KeystoreEntry, payload: &[u8]) -> AccountResult<()> {
        let tag = entry.tag();
        let payload = Zeroizing::new(payload.to_vec());
        self.blocking(move |store| store.set(&tag, &payload)).await
    }

    async fn get_from_storage(&self, entry: &KeystoreEntry) -> AccountResult<Zeroizing<Vec<u8>>> {
        let tag = entry.tag();
        let name = entry.name.clone();
        self.blocking(move |store| store.get(&tag, &name)).await
    }

    async fn list_from_storage(&self) -> AccountResult<Vec<Tag>> {
        self.blocking(|store| Ok(store.list())).await
    }

    async fn remove_from_storage(&self, entry: &KeystoreEntry) -> AccountResult<()> {
        let tag = entry.tag();
        self.blocking(move |store| store.remove(&tag)).await
    }
}
