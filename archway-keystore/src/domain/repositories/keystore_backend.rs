//! Keystore backend contract
//!
//! Implementors only move opaque payloads in and out of their storage. The
//! provided methods carry the behavior every backend shares: duplicate name
//! rejection and name-then-address resolution.

use crate::domain::entities::KeystoreEntry;
use crate::shared::error::AccountError;
use crate::shared::types::{AccountResult, KeystoreBackendType, Tag};
use async_trait::async_trait;
use zeroize::Zeroizing;

#[async_trait]
pub trait KeystoreBackend: Send + Sync {
    fn kind(&self) -> KeystoreBackendType;

    /// Write `payload` under the entry's tag
    async fn save_to_storage(&self, entry: &KeystoreEntry, payload: &[u8]) -> AccountResult<()>;

    /// Unlock and return the payload stored under the entry's tag
    async fn get_from_storage(&self, entry: &KeystoreEntry) -> AccountResult<Zeroizing<Vec<u8>>>;

    /// Every stored tag, in storage insertion order
    async fn list_from_storage(&self) -> AccountResult<Vec<Tag>>;

    async fn remove_from_storage(&self, entry: &KeystoreEntry) -> AccountResult<()>;

    /// All entries, without touching secret material. Tags that do not parse
    /// are skipped.
    async fn list(&self) -> AccountResult<Vec<KeystoreEntry>> {
        let tags = self.list_from_storage().await?;
        Ok(tags
            .iter()
            .filter_map(|tag| match KeystoreEntry::parse(tag) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping {} keystore entry: {}", self.kind(), e);
                    None
                }
            })
            .collect())
    }

    async fn find_by_name(&self, name: &str) -> AccountResult<Option<KeystoreEntry>> {
        Ok(self.list().await?.into_iter().find(|entry| entry.name == name))
    }

    async fn find_by_address(&self, address: &str) -> AccountResult<Option<KeystoreEntry>> {
        Ok(self.list().await?.into_iter().find(|entry| entry.address == address))
    }

    /// Resolve a name, or failing that an address, to its entry.
    /// A name match always wins over an address match.
    async fn assert_account_exists(&self, name_or_address: &str) -> AccountResult<KeystoreEntry> {
        let entries = self.list().await?;
        entries
            .iter()
            .find(|entry| entry.name == name_or_address)
            .or_else(|| entries.iter().find(|entry| entry.address == name_or_address))
            .cloned()
            .ok_or_else(|| AccountError::not_found(name_or_address.to_string()))
    }

    /// Persist a new account. Fails with `AlreadyExists` if the name is taken.
    async fn save(&self, entry: &KeystoreEntry, payload: &[u8]) -> AccountResult<()> {
        if self.find_by_name(&entry.name).await?.is_some() {
            return Err(AccountError::already_exists(entry.name.clone()));
        }
        self.save_to_storage(entry, payload).await?;
        log::info!(
            "Saved account '{}' ({}) to {} keystore",
            entry.name,
            entry.address,
            self.kind()
        );
        Ok(())
    }

    async fn get(
        &self,
        name_or_address: &str,
    ) -> AccountResult<(KeystoreEntry, Zeroizing<Vec<u8>>)> {
        let entry = self.assert_account_exists(name_or_address).await?;
        let payload = self.get_from_storage(&entry).await?;
        Ok((entry, payload))
    }

    async fn remove(&self, name_or_address: &str) -> AccountResult<KeystoreEntry> {
        let entry = self.assert_account_exists(name_or_address).await?;
        self.remove_from_storage(&entry).await?;
        log::info!(
            "Removed account '{}' ({}) from {} keystore",
            entry.name,
            entry.address,
            self.kind()
        );
        Ok(entry)
    }
}
