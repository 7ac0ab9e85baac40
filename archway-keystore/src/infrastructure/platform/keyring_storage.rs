//! OS credential store access
//!
//! Each tag is one credential under a fixed service name. Credential stores
//! cannot be enumerated portably, so the tags are also recorded, in insertion
//! order, in a small JSON index next to the file keystore. The index holds
//! no secret material.

use crate::shared::constants::*;
use crate::shared::error::AccountError;
use crate::shared::types::AccountResult;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use keyring::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Insertion-ordered list of tags persisted as JSON
#[derive(Debug, Clone)]
pub struct TagIndex {
    path: PathBuf,
}

impl TagIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing index reads as empty
    pub fn load(&self) -> AccountResult<Vec<String>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn contains(&self, tag: &str) -> AccountResult<bool> {
        Ok(self.load()?.iter().any(|t| t == tag))
    }

    pub fn append(&self, tag: &str) -> AccountResult<()> {
        let mut tags = self.load()?;
        if tags.iter().any(|t| t == tag) {
            return Ok(());
        }
        tags.push(tag.to_string());
        self.store(&tags)
    }

    /// Returns whether the tag was present
    pub fn remove(&self, tag: &str) -> AccountResult<bool> {
        let mut tags = self.load()?;
        let before = tags.len();
        tags.retain(|t| t != tag);
        if tags.len() == before {
            return Ok(false);
        }
        self.store(&tags)?;
        Ok(true)
    }

    fn store(&self, tags: &[String]) -> AccountResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temporary = self.path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&temporary, serde_json::to_vec_pretty(tags)?)?;
        fs::rename(&temporary, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temporary);
            AccountError::from(e)
        })
    }
}

/// Secret blobs in the platform keychain / credential manager / keyutils
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
    index: TagIndex,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            service: service.into(),
            index: TagIndex::new(index_path),
        }
    }

    /// Store under the default service name with the index in `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(KEYRING_SERVICE, dir.join(KEYRING_INDEX_FILE))
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, tag: &str) -> AccountResult<Entry> {
        Ok(Entry::new(&self.service, tag)?)
    }

    /// Write the credential, then record the tag. If the index cannot be
    /// updated the credential is deleted again.
    pub fn set(&self, tag: &str, payload: &[u8]) -> AccountResult<()> {
        if self.index.contains(tag)? {
            return Err(AccountError::already_exists(tag.to_string()));
        }

        let entry = self.entry(tag)?;
        let encoded = Zeroizing::new(STANDARD.encode(payload));
        entry.set_password(&encoded)?;

        if let Err(e) = self.index.append(tag) {
            log::warn!("Failed to index OS keystore entry, rolling back: {}", e);
            let _ = entry.delete_credential();
            return Err(e);
        }
        Ok(())
    }

    pub fn get(&self, tag: &str, account: &str) -> AccountResult<Zeroizing<Vec<u8>>> {
        let encoded = match self.entry(tag)?.get_password() {
            Ok(encoded) => Zeroizing::new(encoded),
            Err(keyring::Error::NoEntry) => {
                return Err(AccountError::not_found(account.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Zeroizing::new(STANDARD.decode(encoded.as_bytes())?))
    }

    /// Indexed tags in insertion order; an unreadable index lists as empty
    pub fn list(&self) -> Vec<String> {
        self.index.load().unwrap_or_else(|e| {
            log::debug!("OS keystore index {} not readable: {}", self.index.path().display(), e);
            Vec::new()
        })
    }

    pub fn remove(&self, tag: &str) -> AccountResult<()> {
        match self.entry(tag)?.delete_credential() {
            Ok(()) => {}
            Err(keyring::Error::NoEntry) => {
                log::debug!("OS keystore entry {} already gone", tag);
            }
            Err(e) => return Err(e.into()),
        }
        if !self.index.remove(tag)? {
            return Err(AccountError::not_found(tag.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_index_is_empty() {
        let dir = TempDir::new().unwrap();
        let index = TagIndex::new(dir.path().join("index.json"));
        assert!(index.load().unwrap().is_empty());
    }

    #[test]
    fn test_index_keeps_insertion_order() {
        let dir = TempDir::new().unwrap();
        let index = TagIndex::new(dir.path().join("nested").join("index.json"));

        index.append("zed").unwrap();
        index.append("alice").unwrap();
        index.append("zed").unwrap();

        assert_eq!(index.load().unwrap(), vec!["zed".to_string(), "alice".to_string()]);
    }

    #[test]
    fn test_index_remove() {
        let dir = TempDir::new().unwrap();
        let index = TagIndex::new(dir.path().join("index.json"));
        index.append("alice").unwrap();
        index.append("bob").unwrap();

        assert!(index.remove("alice").unwrap());
        assert!(!index.remove("alice").unwrap());
        assert_eq!(index.load().unwrap(), vec!["bob".to_string()]);
        assert!(!index.contains("alice").unwrap());
    }

    #[test]
    fn test_corrupt_index_is_an_error_but_lists_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(KEYRING_INDEX_FILE);
        fs::write(&path, b"not json").unwrap();

        assert!(TagIndex::new(&path).load().is_err());
        assert!(KeyringStore::new("archway-keystore-test", &path).list().is_empty());
    }
}
