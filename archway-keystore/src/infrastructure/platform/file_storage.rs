//! Password-encrypted blob storage on local disk
//!
//! One file per tag, `<dir>/<tag>.key`, holding `salt || nonce || ciphertext`.

use crate::core::crypto::encryption::{EncryptedData, EncryptionManager};
use crate::core::crypto::password::KdfParams;
use crate::shared::constants::*;
use crate::shared::error::AccountError;
use crate::shared::types::AccountResult;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use zeroize::Zeroizing;

pub struct EncryptedFileStore {
    dir: PathBuf,
    encryption: EncryptionManager,
}

impl EncryptedFileStore {
    pub fn new(dir: impl Into<PathBuf>, kdf: KdfParams) -> Self {
        Self {
            dir: dir.into(),
            encryption: EncryptionManager::new(kdf),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, tag: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", tag, KEY_FILE_EXTENSION))
    }

    pub async fn exists(&self, tag: &str) -> bool {
        fs::metadata(self.file_path(tag)).await.is_ok()
    }

    /// Encrypt and write `payload` for `tag`. Never overwrites an existing blob.
    ///
    /// The blob is written to a temporary file and renamed into place, so a
    /// failure part-way leaves no readable entry behind.
    pub async fn set(&self, tag: &str, payload: &[u8], password: &str) -> AccountResult<()> {
        if self.exists(tag).await {
            return Err(AccountError::already_exists(tag.to_string()));
        }
        self.ensure_dir().await?;

        let encrypted = self.encryption.encrypt(payload, password)?;
        let destination = self.file_path(tag);
        let temporary =
            self.dir.join(format!(".{}.{}.tmp", uuid::Uuid::new_v4(), KEY_FILE_EXTENSION));

        let written = Self::write_private_file(&temporary, &encrypted.to_bytes()).await;
        let result = match written {
            Ok(()) => fs::rename(&temporary, &destination).await.map_err(AccountError::from),
            Err(e) => Err(e),
        };
        if result.is_err() {
            let _ = fs::remove_file(&temporary).await;
        }
        result?;

        log::debug!("Stored encrypted blob at {}", destination.display());
        Ok(())
    }

    /// Read and decrypt the blob for `tag`; a wrong password is `InvalidPassword`
    pub async fn get(
        &self,
        tag: &str,
        password: &str,
        account: &str,
    ) -> AccountResult<Zeroizing<Vec<u8>>> {
        let bytes = match fs::read(self.file_path(tag)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AccountError::not_found(account.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let encrypted = EncryptedData::from_bytes(&bytes)?;
        self.encryption.decrypt(&encrypted, password, account)
    }

    /// Tags of all stored blobs, oldest first.
    /// A missing or unreadable directory lists as empty.
    pub async fn list(&self) -> Vec<String> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Keystore directory {} not readable: {}", self.dir.display(), e);
                return Vec::new();
            }
        };

        let mut tags: Vec<(SystemTime, String)> = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(KEY_FILE_EXTENSION) {
                continue;
            }
            let Some(tag) = path.file_stem().and_then(|n| n.to_str()) else {
                continue;
            };
            if tag.starts_with('.') {
                continue;
            }
            let modified = entry
                .metadata()
                .await
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            tags.push((modified, tag.to_string()));
        }

        tags.sort();
        tags.into_iter().map(|(_, tag)| tag).collect()
    }

    pub async fn remove(&self, tag: &str) -> AccountResult<()> {
        match fs::remove_file(self.file_path(tag)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AccountError::not_found(tag.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_dir(&self) -> AccountResult<()> {
        if fs::metadata(&self.dir).await.is_ok() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.dir, std::fs::Permissions::from_mode(0o700)).await?;
        }
        Ok(())
    }

    async fn write_private_file(path: &Path, bytes: &[u8]) -> AccountResult<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}
