//! In-memory keystore for tests and throwaway sessions.
//! Nothing is locked and nothing survives the process.

use crate::domain::entities::KeystoreEntry;
use crate::domain::repositories::KeystoreBackend;
use crate::shared::error::AccountError;
use crate::shared::types::{AccountResult, KeystoreBackendType, Tag};
use async_trait::async_trait;
use tokio::sync::RwLock;
use zeroize::Zeroizing;

#[derive(Default)]
pub struct TestKeystore {
    entries: RwLock<Vec<(Tag, Zeroizing<Vec<u8>>)>>,
}

impl TestKeystore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeystoreBackend for TestKeystore {
    fn kind(&self) -> KeystoreBackendType {
        KeystoreBackendType::Test
    }

    async fn save_to_storage(&self, entry: &KeystoreEntry, payload: &[u8]) -> AccountResult<()> {
        let tag = entry.tag();
        let mut entries = self.entries.write().await;
        if entries.iter().any(|(existing, _)| *existing == tag) {
            return Err(AccountError::already_exists(entry.name.clone()));
        }
        entries.push((tag, Zeroizing::new(payload.to_vec())));
        Ok(())
    }

    async fn get_from_storage(&self, entry: &KeystoreEntry) -> AccountResult<Zeroizing<Vec<u8>>> {
        let tag = entry.tag();
        self.entries
            .read()
            .await
            .iter()
            .find(|(existing, _)| *existing == tag)
            .map(|(_, payload)| payload.clone())
            .ok_or_else(|| AccountError::not_found(entry.name.clone()))
    }

    async fn list_from_storage(&self) -> AccountResult<Vec<Tag>> {
        Ok(self.entries.read().await.iter().map(|(tag, _)| tag.clone()).collect())
    }

    async fn remove_from_storage(&self, entry: &KeystoreEntry) -> AccountResult<()> {
        let tag = entry.tag();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != tag);
        if entries.len() == before {
            return Err(AccountError::not_found(entry.name.clone()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for TestKeystore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestKeystore").finish_non_exhaustive()
    }
}
