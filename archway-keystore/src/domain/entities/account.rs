//! Account entity and related value objects
//!
//! Public account data is freely cloneable and serializable. The types that
//! carry a mnemonic or private key do not implement `Clone` or `Serialize`
//! and redact themselves in `Debug` output.

use crate::core::crypto::keys::{HdPath, SecureSeedPhrase};
use crate::core::crypto::signatures::OfflineSigner;
use crate::shared::constants::*;
use crate::shared::error::AccountError;
use crate::shared::types::{AccountResult, AccountType, Address};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Public key with its algorithm, key bytes base64-encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyInfo {
    pub algo: String,
    pub key: String,
}

impl PublicKeyInfo {
    pub fn secp256k1(public_key: &[u8]) -> Self {
        Self {
            algo: PUBLIC_KEY_ALGO.to_string(),
            key: STANDARD.encode(public_key),
        }
    }

    pub fn to_bytes(&self) -> AccountResult<Vec<u8>> {
        Ok(STANDARD.decode(&self.key)?)
    }
}

impl fmt::Display for PublicKeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.algo, self.key)
    }
}

/// Account as shown to callers. Never holds secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub name: String,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd_path: Option<HdPath>,
    pub public_key: PublicKeyInfo,
}

impl Account {
    pub fn base(&self) -> AccountBase {
        AccountBase {
            name: Some(self.name.clone()),
            address: self.address.clone(),
        }
    }
}

/// Name and address of an account, the name absent for foreign addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub address: Address,
}

impl AccountBase {
    pub fn from_address(address: impl Into<Address>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }
}

impl fmt::Display for AccountBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", name, self.address),
            None => f.write_str(&self.address),
        }
    }
}

/// An account together with its mnemonic
pub struct AccountWithMnemonic {
    pub account: Account,
    pub mnemonic: SecureSeedPhrase,
}

impl fmt::Debug for AccountWithMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountWithMnemonic")
            .field("account", &self.account)
            .field("mnemonic", &self.mnemonic)
            .finish()
    }
}

/// An account with a signer bound to it
pub struct AccountWithSigner {
    pub account: Account,
    pub signer: Box<dyn OfflineSigner>,
}

impl fmt::Debug for AccountWithSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountWithSigner")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

/// An exported account; `private_key` is 64 lowercase hex characters
pub struct AccountWithPrivateKey {
    pub account: Account,
    pub private_key: Zeroizing<String>,
}

impl fmt::Debug for AccountWithPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountWithPrivateKey")
            .field("account", &self.account)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Payload persisted behind a keystore backend's lock
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAccount {
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub name: String,
    pub address: Address,
    pub public_key: PublicKeyInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hd_path: Option<HdPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl StoredAccount {
    pub fn new(account: &Account) -> Self {
        Self {
            account_type: account.account_type,
            name: account.name.clone(),
            address: account.address.clone(),
            public_key: account.public_key.clone(),
            hd_path: account.hd_path,
            mnemonic: None,
            private_key: None,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn with_mnemonic(mut self, mnemonic: &SecureSeedPhrase) -> Self {
        self.mnemonic = Some(mnemonic.as_str().to_string());
        self
    }

    pub fn with_private_key(mut self, private_key_hex: &str) -> Self {
        self.private_key = Some(private_key_hex.to_string());
        self
    }

    pub fn account(&self) -> Account {
        Account {
            account_type: self.account_type,
            name: self.name.clone(),
            address: self.address.clone(),
            hd_path: self.hd_path,
            public_key: self.public_key.clone(),
        }
    }

    pub fn to_json(&self) -> AccountResult<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new(serde_json::to_vec(self)?))
    }

    pub fn from_json(bytes: &[u8]) -> AccountResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| AccountError::storage(format!("Corrupt keystore payload: {}", e)))
    }
}

impl Drop for StoredAccount {
    fn drop(&mut self) {
        if let Some(mnemonic) = self.mnemonic.as_mut() {
            mnemonic.zeroize();
        }
        if let Some(private_key) = self.private_key.as_mut() {
            private_key.zeroize();
        }
    }
}

impl fmt::Debug for StoredAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredAccount")
            .field("type", &self.account_type)
            .field("name", &self.name)
            .field("address", &self.address)
            .field("has_mnemonic", &self.mnemonic.is_some())
            .field("has_private_key", &self.private_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Metadata encoded in a keystore tag: `<name>.<type>.<address>.<pubkey-hex>`.
///
/// Everything needed to list and resolve accounts lives in the tag, so no
/// secret has to be unlocked to find an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeystoreEntry {
    pub name: String,
    pub account_type: AccountType,
    pub address: Address,
    pub public_key: Vec<u8>,
}

impl KeystoreEntry {
    pub fn from_account(account: &Account) -> AccountResult<Self> {
        Ok(Self {
            name: account.name.clone(),
            account_type: account.account_type,
            address: account.address.clone(),
            public_key: account.public_key.to_bytes()?,
        })
    }

    pub fn tag(&self) -> String {
        format!(
            "{name}{sep}{kind}{sep}{address}{sep}{key}",
            name = self.name,
            kind = self.account_type,
            address = self.address,
            key = hex::encode(&self.public_key),
            sep = TAG_SEPARATOR
        )
    }

    pub fn parse(tag: &str) -> AccountResult<Self> {
        let invalid = || AccountError::invalid_format(format!("Malformed keystore tag: {}", tag));

        let parts: Vec<&str> = tag.split(TAG_SEPARATOR).collect();
        let [name, kind, address, key] = parts.as_slice() else {
            return Err(invalid());
        };

        crate::shared::utils::validate_account_name(name).map_err(|_| invalid())?;
        let account_type = kind.parse::<AccountType>().map_err(|_| invalid())?;
        if !crate::shared::utils::is_valid_address(address, None) {
            return Err(invalid());
        }
        let public_key = hex::decode(key).map_err(|_| invalid())?;
        if public_key.len() != PUBLIC_KEY_SIZE {
            return Err(invalid());
        }

        Ok(Self {
            name: name.to_string(),
            account_type,
            address: address.to_string(),
            public_key,
        })
    }

    /// The account described by this entry. The derivation path is only
    /// known once the stored payload is unlocked.
    pub fn account(&self) -> Account {
        Account {
            account_type: self.account_type,
            name: self.name.clone(),
            address: self.address.clone(),
            hd_path: None,
            public_key: PublicKeyInfo::secp256k1(&self.public_key),
        }
    }

    pub fn base(&self) -> AccountBase {
        AccountBase {
            name: Some(self.name.clone()),
            address: self.address.clone(),
        }
    }
}
