//! Ledger hardware wallet integration
//!
//! The device transport itself is supplied by the caller through
//! [`LedgerTransport`]. This module bounds every device interaction with the
//! open and listen timeouts and turns device answers into accounts and
//! signers. Private keys and mnemonics never leave the device.

use crate::core::crypto::keys::HdPath;
use crate::core::crypto::signatures::{OfflineSigner, SignatureManager, SignerAccount};
use crate::domain::entities::{Account, PublicKeyInfo};
use crate::infrastructure::config::KeystoreConfig;
use crate::shared::constants::*;
use crate::shared::error::AccountError;
use crate::shared::types::{AccountResult, AccountType};
use crate::shared::utils::address_from_public_key;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// How long to wait for a device to appear, and for the user to approve on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerTimeouts {
    pub open: Duration,
    pub listen: Duration,
}

impl Default for LedgerTimeouts {
    fn default() -> Self {
        Self {
            open: Duration::from_millis(LEDGER_OPEN_TIMEOUT_MS),
            listen: Duration::from_millis(LEDGER_LISTEN_TIMEOUT_MS),
        }
    }
}

impl From<&KeystoreConfig> for LedgerTimeouts {
    fn from(config: &KeystoreConfig) -> Self {
        Self {
            open: config.ledger_open_timeout(),
            listen: config.ledger_listen_timeout(),
        }
    }
}

/// An open session with the Cosmos app on a Ledger device
#[async_trait]
pub trait LedgerDevice: Send + Sync {
    /// Compressed secp256k1 public key at `hd_path`
    async fn get_public_key(&self, hd_path: &HdPath) -> AccountResult<Vec<u8>>;

    /// Ask the user to approve signing `sign_bytes`; returns a compact signature
    async fn sign(&self, hd_path: &HdPath, sign_bytes: &[u8]) -> AccountResult<Vec<u8>>;
}

/// Opens device sessions
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    async fn open(&self, timeouts: LedgerTimeouts) -> AccountResult<Box<dyn LedgerDevice>>;
}

async fn bounded<T, F>(limit: Duration, what: &str, request: F) -> AccountResult<T>
where
    F: Future<Output = AccountResult<T>>,
{
    match tokio::time::timeout(limit, request).await {
        Ok(result) => result,
        Err(_) => Err(AccountError::timeout(format!("{} after {} ms", what, limit.as_millis()))),
    }
}

/// Signer whose key stays on the Ledger. Every signature is a fresh device
/// interaction.
pub struct LedgerSigner {
    device: Box<dyn LedgerDevice>,
    hd_path: HdPath,
    timeouts: LedgerTimeouts,
    account: SignerAccount,
}

impl LedgerSigner {
    /// Open the device and read the account at `hd_path`
    pub async fn connect(
        transport: &dyn LedgerTransport,
        hd_path: HdPath,
        prefix: &str,
        timeouts: LedgerTimeouts,
    ) -> AccountResult<Self> {
        log::info!("Waiting for Ledger device ({})", hd_path);
        let device =
            bounded(timeouts.open, "No Ledger device found", transport.open(timeouts)).await?;

        let public_key = bounded(
            timeouts.listen,
            "Ledger did not return a public key",
            device.get_public_key(&hd_path),
        )
        .await?;
        if public_key.len() != PUBLIC_KEY_SIZE {
            return Err(AccountError::device(format!(
                "Ledger returned a {} byte public key",
                public_key.len()
            )));
        }
        let address = address_from_public_key(&public_key, prefix)?;

        Ok(Self {
            device,
            hd_path,
            timeouts,
            account: SignerAccount {
                address,
                algo: PUBLIC_KEY_ALGO.to_string(),
                public_key,
            },
        })
    }

    pub fn address(&self) -> &str {
        &self.account.address
    }

    pub fn hd_path(&self) -> &HdPath {
        &self.hd_path
    }

    pub fn public_key(&self) -> &[u8] {
        &self.account.public_key
    }
}

#[async_trait]
impl OfflineSigner for LedgerSigner {
    async fn accounts(&self) -> AccountResult<Vec<SignerAccount>> {
        Ok(vec![self.account.clone()])
    }

    async fn sign(&self, signer_address: &str, sign_bytes: &[u8]) -> AccountResult<Vec<u8>> {
        if signer_address != self.account.address {
            return Err(AccountError::not_found(format!(
                "Ledger signer has no key for address {}",
                signer_address
            )));
        }

        log::info!("Confirm the transaction on your Ledger device");
        let signature = bounded(
            self.timeouts.listen,
            "Transaction was not approved on the Ledger",
            self.device.sign(&self.hd_path, sign_bytes),
        )
        .await?;

        if !SignatureManager::new().verify(sign_bytes, &signature, &self.account.public_key)? {
            return Err(AccountError::device("Ledger returned an invalid signature".to_string()));
        }
        Ok(signature)
    }
}

impl std::fmt::Debug for LedgerSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerSigner")
            .field("address", &self.account.address)
            .field("hd_path", &self.hd_path)
            .finish_non_exhaustive()
    }
}

/// Device-backed signer for `hd_path`
pub async fn get_ledger_signer(
    transport: &dyn LedgerTransport,
    hd_path: HdPath,
    prefix: &str,
    timeouts: LedgerTimeouts,
) -> AccountResult<LedgerSigner> {
    LedgerSigner::connect(transport, hd_path, prefix, timeouts).await
}

/// Public key and address of the device account at `hd_path`
pub async fn get_ledger_account(
    transport: &dyn LedgerTransport,
    name: &str,
    hd_path: HdPath,
    prefix: &str,
    timeouts: LedgerTimeouts,
) -> AccountResult<Account> {
    let signer = LedgerSigner::connect(transport, hd_path, prefix, timeouts).await?;
    Ok(Account {
        account_type: AccountType::Ledger,
        name: name.to_string(),
        address: signer.address().to_string(),
        hd_path: Some(hd_path),
        public_key: PublicKeyInfo::secp256k1(signer.public_key()),
    })
}
