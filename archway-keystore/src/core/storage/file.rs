//! Password-protected file keystore
//!
//! Every operation that touches secret material asks the injected
//! `PasswordProvider` again. Passwords are never cached or written to disk.

use crate::core::crypto::password::{KdfParams, PasswordProvider, PasswordPurpose};
use crate::domain::entities::KeystoreEntry;
use crate::domain::repositories::KeystoreBackend;
use crate::infrastructure::platform::EncryptedFileStore;
use crate::shared::types::{AccountResult, KeystoreBackendType, Tag};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zeroize::Zeroizing;

pub struct FileKeystore {
    store: EncryptedFileStore,
    passwords: Arc<dyn PasswordProvider>,
}

impl FileKeystore {
    pub fn new(
        dir: impl Into<PathBuf>,
        kdf: KdfParams,
        passwords: Arc<dyn PasswordProvider>,
    ) -> Self {
        Self {
            store: EncryptedFileStore::new(dir, kdf),
            passwords,
        }
    }

    pub fn dir(&self) -> &Path {
        self.store.dir()
    }

    // The provider may block on a terminal prompt
    async fn ask_password(
        &self,
        account: &str,
        purpose: PasswordPurpose,
    ) -> AccountResult<Zeroizing<String>> {
        let passwords = Arc::clone(&self.passwords);
        let account = account.to_string();
        tokio::task::spawn_blocking(move || passwords.password(&account, purpose)).await?
    }
}

#[async_trait]
impl KeystoreBackend for FileKeystore {
    fn kind(&self) -> KeystoreBackendType {
        KeystoreBackendType::File
    }

    async fn save_to_storage(&self, entry: &KeystoreEntry, payload: &[u8]) -> AccountResult<()> {
        let password = self.ask_password(&entry.name, PasswordPurpose::Encrypt).await?;
        self.store.set(&entry.tag(), payload, &password).await
    }

    async fn get_from_storage(&self, entry: &KeystoreEntry) -> AccountResult<Zeroizing<Vec<u8>>> {
        let password = self.ask_password(&entry.name, PasswordPurpose::Decrypt).await?;
        self.store.get(&entry.tag(), &password, &entry.name).await
    }

    async fn list_from_storage(&self) -> AccountResult<Vec<Tag>> {
        Ok(self.store.list().await)
    }

    async fn remove_from_storage(&self, entry: &KeystoreEntry) -> AccountResult<()> {
        self.store.remove(&entry.tag()).await
    }
}

impl std::fmt::Debug for FileKeystore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKeystore").field("dir", &self.store.dir()).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::crypto::password::{MockPasswordProvider, StaticPasswordProvider};
    use crate::shared::error::AccountError;
    use crate::shared::types::AccountType;
    use tempfile::TempDir;

    const ALICE: &str = "archway19rl4cm2hmr8afy4kldpxz3fka4jguq0aft3e4z";

    fn entry() -> KeystoreEntry {
        KeystoreEntry {
            name: "alice".to_string(),
            account_type: AccountType::File,
            address: ALICE.to_string(),
            public_key: vec![2u8; 33],
        }
    }

    fn keystore(dir: &TempDir, password: &str) -> FileKeystore {
        FileKeystore::new(
            dir.path(),
            KdfParams::insecure_fast(),
            Arc::new(StaticPasswordProvider::new(password)),
        )
    }

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let first = keystore(&dir, "hunter2");
        first.save(&entry(), b"payload").await.expect("save");

        // a fresh instance sees the same entries
        let reopened = keystore(&dir, "hunter2");
        let (found, payload) = reopened.get(ALICE).await.expect("get");
        assert_eq!(found, entry());
        assert_eq!(payload.as_slice(), b"payload");
    }

    #[tokio::test]
    async fn test_wrong_password_is_distinct_and_retryable() {
        let dir = TempDir::new().unwrap();
        keystore(&dir, "right").save(&entry(), b"payload").await.unwrap();

        let error = keystore(&dir, "wrong").get("alice").await.unwrap_err();
        assert_eq!(error, AccountError::invalid_password("alice"));
        assert!(error.is_retryable());

        assert!(keystore(&dir, "right").get("alice").await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_directory_lists_empty() {
        let dir = TempDir::new().unwrap();
        let keystore = FileKeystore::new(
            dir.path().join("nowhere"),
            KdfParams::insecure_fast(),
            Arc::new(StaticPasswordProvider::new("pw")),
        );
        assert!(keystore.list().await.unwrap().is_empty());
        assert!(keystore.get("alice").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_listing_and_removal_never_prompt() {
        let dir = TempDir::new().unwrap();
        keystore(&dir, "pw").save(&entry(), b"payload").await.unwrap();

        let mut passwords = MockPasswordProvider::new();
        passwords.expect_password().never();
        let keystore =
            FileKeystore::new(dir.path(), KdfParams::insecure_fast(), Arc::new(passwords));

        assert_eq!(keystore.list().await.unwrap(), vec![entry()]);
        keystore.remove("alice").await.expect("remove");
        assert!(keystore.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_password_prompt_runs_off_the_runtime_thread() {
        let dir = TempDir::new().unwrap();
        let runtime_thread = std::thread::current().id();
        let mut passwords = MockPasswordProvider::new();
        passwords.expect_password().times(2).returning(move |_, _| {
            assert_ne!(std::thread::current().id(), runtime_thread);
            Ok(Zeroizing::new("pw".to_string()))
        });
        let keystore =
            FileKeystore::new(dir.path(), KdfParams::insecure_fast(), Arc::new(passwords));

        keystore.save(&entry(), b"payload").await.expect("save");
        let (_, payload) = keystore.get("alice").await.expect("get");
        assert_eq!(payload.as_slice(), b"payload");
    }

    #[tokio::test]
    async fn test_declined_password_prompt_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let mut passwords = MockPasswordProvider::new();
        passwords
            .expect_password()
            .returning(|_, _| Err(AccountError::cancelled("empty password")));
        let keystore =
            FileKeystore::new(dir.path(), KdfParams::insecure_fast(), Arc::new(passwords));

        let error = keystore.save(&entry(), b"payload").await.unwrap_err();
        assert!(error.is_cancellation());
        assert!(keystore.list().await.unwrap().is_empty());
    }
}
