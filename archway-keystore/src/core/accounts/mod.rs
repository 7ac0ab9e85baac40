//! Accounts facade
//!
//! The entry point command handlers use: account creation from a generated or
//! imported mnemonic, raw key and Ledger imports, lookup by name or address,
//! listing, signer construction, confirmed export and removal. Secret I/O goes
//! through the bound [`KeystoreBackend`].

pub mod confirmation;

pub use confirmation::*;

use crate::core::crypto::keys::{HdPath, KeyManager, SecurePrivateKey, SecureSeedPhrase};
use crate::core::crypto::password::{PasswordProvider, PromptPasswordProvider};
use crate::core::crypto::signatures::DirectSecp256k1Signer;
use crate::core::ledger::{get_ledger_account, LedgerSigner, LedgerTimeouts, LedgerTransport};
use crate::core::storage::open_backend;
use crate::domain::entities::*;
use crate::domain::repositories::KeystoreBackend;
use crate::infrastructure::config::KeystoreConfig;
use crate::shared::error::AccountError;
use crate::shared::types::{AccountResult, KeystoreBackendType};
use crate::shared::utils::{
    address_to_bytes, parse_private_key_hex, validate_account_name, validate_address,
};
use std::sync::Arc;

pub struct Accounts {
    backend: Box<dyn KeystoreBackend>,
    keys: KeyManager,
    config: KeystoreConfig,
    ledger: Option<Arc<dyn LedgerTransport>>,
}

impl Accounts {
    /// Bind a facade to the backend of the given type
    pub fn init(
        backend_type: KeystoreBackendType,
        config: KeystoreConfig,
        passwords: Arc<dyn PasswordProvider>,
    ) -> AccountResult<Self> {
        config.validate()?;
        let backend = open_backend(backend_type, &config, passwords);
        Ok(Self::with_backend(backend, config))
    }

    /// Backend from `config.backend`, passwords prompted on the terminal
    pub fn from_config(config: KeystoreConfig) -> AccountResult<Self> {
        Self::init(config.backend, config, Arc::new(PromptPasswordProvider::new()))
    }

    pub fn from_env() -> AccountResult<Self> {
        Self::from_config(KeystoreConfig::from_env()?)
    }

    pub fn with_backend(backend: Box<dyn KeystoreBackend>, config: KeystoreConfig) -> Self {
        Self {
            backend,
            keys: KeyManager::new(config.address_prefix.clone()),
            config,
            ledger: None,
        }
    }

    /// Transport used to reach the device when signing for Ledger accounts
    pub fn with_ledger_transport(mut self, transport: Arc<dyn LedgerTransport>) -> Self {
        self.ledger = Some(transport);
        self
    }

    pub fn backend_type(&self) -> KeystoreBackendType {
        self.backend.kind()
    }

    pub fn config(&self) -> &KeystoreConfig {
        &self.config
    }

    /// Create an account at the configured HD path. With no mnemonic a fresh
    /// 24 word one is generated.
    ///
    /// The returned mnemonic is the only time it is handed out on creation;
    /// callers must tell the user to back it up.
    pub async fn new_account(
        &self,
        name: &str,
        mnemonic: Option<&str>,
    ) -> AccountResult<AccountWithMnemonic> {
        self.new_account_with_path(name, mnemonic, self.config.hd_path).await
    }

    pub async fn new_account_with_path(
        &self,
        name: &str,
        mnemonic: Option<&str>,
        hd_path: HdPath,
    ) -> AccountResult<AccountWithMnemonic> {
        self.ensure_name_available(name).await?;

        let mnemonic = match mnemonic {
            Some(phrase) => self.keys.parse_mnemonic(phrase)?,
            None => self.keys.generate_mnemonic()?,
        };
        let private_key = self.keys.derive_private_key(&mnemonic, &hd_path)?;
        let account = self.software_account(name, &private_key, Some(hd_path))?;
        drop(private_key);

        let stored = StoredAccount::new(&account).with_mnemonic(&mnemonic);
        self.persist(&account, &stored).await?;

        Ok(AccountWithMnemonic { account, mnemonic })
    }

    /// Import a raw secp256k1 key given as hex. The account has no mnemonic
    /// and no HD path.
    pub async fn import_private_key(
        &self,
        name: &str,
        private_key_hex: &str,
    ) -> AccountResult<Account> {
        self.ensure_name_available(name).await?;

        let bytes = parse_private_key_hex(private_key_hex)?;
        let private_key = SecurePrivateKey::from_bytes(&bytes)?;
        let account = self.software_account(name, &private_key, None)?;

        let stored = StoredAccount::new(&account).with_private_key(&private_key.to_hex());
        self.persist(&account, &stored).await?;
        Ok(account)
    }

    /// Record the Ledger account at the configured HD path. Only the public
    /// key, address and path are stored.
    pub async fn new_ledger(
        &self,
        name: &str,
        transport: &dyn LedgerTransport,
    ) -> AccountResult<Account> {
        self.ensure_name_available(name).await?;

        let account = get_ledger_account(
            transport,
            name,
            self.config.hd_path,
            self.keys.prefix(),
            LedgerTimeouts::from(&self.config),
        )
        .await?;

        self.persist(&account, &StoredAccount::new(&account)).await?;
        Ok(account)
    }

    /// Account metadata; nothing is unlocked, so the HD path is not included
    pub async fn get(&self, name_or_address: &str) -> AccountResult<Account> {
        Ok(self.backend.assert_account_exists(name_or_address).await?.account())
    }

    pub async fn get_with_mnemonic(
        &self,
        name_or_address: &str,
    ) -> AccountResult<AccountWithMnemonic> {
        let entry = self.backend.assert_account_exists(name_or_address).await?;
        if !entry.account_type.holds_secret() {
            return Err(AccountError::validation(format!(
                "'{}' is a Ledger account, its mnemonic never leaves the device",
                entry.name
            )));
        }

        let stored = self.unlock(&entry).await?;
        let mnemonic = stored.mnemonic.as_deref().ok_or_else(|| {
            AccountError::validation(format!(
                "'{}' was imported from a private key and has no mnemonic",
                entry.name
            ))
        })?;

        Ok(AccountWithMnemonic {
            account: stored.account(),
            mnemonic: SecureSeedPhrase::new(mnemonic.to_string()),
        })
    }

    /// A signer for the account, ready for transactions. Software keys are
    /// unlocked into the signer; Ledger accounts get a device-backed signer.
    pub async fn get_with_signer(&self, name_or_address: &str) -> AccountResult<AccountWithSigner> {
        let entry = self.backend.assert_account_exists(name_or_address).await?;
        let stored = self.unlock(&entry).await?;
        let account = stored.account();
        let (prefix, _) = address_to_bytes(&account.address)?;

        if !account.account_type.holds_secret() {
            let transport = self
                .ledger
                .as_ref()
                .ok_or_else(|| AccountError::device("No Ledger transport configured".to_string()))?;
            let hd_path = account.hd_path.unwrap_or(self.config.hd_path);
            let timeouts = LedgerTimeouts::from(&self.config);
            let signer = LedgerSigner::connect(&**transport, hd_path, &prefix, timeouts).await?;
            if signer.address() != account.address {
                return Err(AccountError::device(format!(
                    "The connected Ledger does not hold {} at {}",
                    account.address, hd_path
                )));
            }
            return Ok(AccountWithSigner {
                account,
                signer: Box::new(signer),
            });
        }

        let private_key = self.private_key_of(&stored)?;
        let signer = DirectSecp256k1Signer::new(private_key, &prefix)?;
        if signer.address() != account.address {
            return Err(AccountError::storage(format!(
                "Stored key for '{}' does not match its address",
                account.name
            )));
        }
        Ok(AccountWithSigner {
            account,
            signer: Box::new(signer),
        })
    }

    /// Reveal the raw private key after the user confirms.
    /// Ledger keys cannot be exported.
    pub async fn export(
        &self,
        name_or_address: &str,
        confirmation: &dyn Confirmation,
    ) -> AccountResult<AccountWithPrivateKey> {
        let entry = self.backend.assert_account_exists(name_or_address).await?;
        if !entry.account_type.holds_secret() {
            return Err(AccountError::validation(format!(
                "'{}' is a Ledger account, its private key cannot be exported",
                entry.name
            )));
        }

        require_confirmation(
            confirmation,
            &format!(
                "Export the private key of {}? Anyone who sees it can take control of the account",
                entry.base()
            ),
        )?;

        let stored = self.unlock(&entry).await?;
        let private_key = self.private_key_of(&stored)?;
        log::info!("Exported private key of account '{}'", entry.name);

        Ok(AccountWithPrivateKey {
            account: stored.account(),
            private_key: private_key.to_hex(),
        })
    }

    /// Delete the account after the user confirms. There is no undo.
    pub async fn remove(
        &self,
        name_or_address: &str,
        confirmation: &dyn Confirmation,
    ) -> AccountResult<Account> {
        let entry = self.backend.assert_account_exists(name_or_address).await?;
        require_confirmation(
            confirmation,
            &format!("Remove account {}? This cannot be undone", entry.base()),
        )?;

        let removed = self.backend.remove(&entry.name).await?;
        Ok(removed.account())
    }

    pub async fn list(&self) -> AccountResult<Vec<Account>> {
        Ok(self.backend.list().await?.iter().map(KeystoreEntry::account).collect())
    }

    pub async fn list_name_and_address(&self) -> AccountResult<Vec<AccountBase>> {
        Ok(self.backend.list().await?.iter().map(KeystoreEntry::base).collect())
    }

    /// Name and address for `address`; the name is absent when the address
    /// is not in this keystore
    pub async fn account_base_from_address(&self, address: &str) -> AccountResult<AccountBase> {
        validate_address(address, None)?;
        Ok(match self.backend.find_by_address(address).await? {
            Some(entry) => entry.base(),
            None => AccountBase::from_address(address),
        })
    }

    pub fn pretty_print_name_and_address(account: &AccountBase) -> String {
        account.to_string()
    }

    pub fn pretty_print_public_key(public_key: &PublicKeyInfo) -> String {
        format!("{}: {}", public_key.algo, public_key.key)
    }

    async fn ensure_name_available(&self, name: &str) -> AccountResult<()> {
        validate_account_name(name)?;
        if self.backend.find_by_name(name).await?.is_some() {
            return Err(AccountError::already_exists(name.to_string()));
        }
        Ok(())
    }

    fn software_account(
        &self,
        name: &str,
        private_key: &SecurePrivateKey,
        hd_path: Option<HdPath>,
    ) -> AccountResult<Account> {
        let derived = self.keys.public_key(private_key)?;
        Ok(Account {
            account_type: self.backend.kind().account_type(),
            name: name.to_string(),
            address: derived.address,
            hd_path,
            public_key: PublicKeyInfo::secp256k1(&derived.public_key),
        })
    }

    async fn persist(&self, account: &Account, stored: &StoredAccount) -> AccountResult<()> {
        let entry = KeystoreEntry::from_account(account)?;
        let payload = stored.to_json()?;
        self.backend.save(&entry, &payload).await
    }

    async fn unlock(&self, entry: &KeystoreEntry) -> AccountResult<StoredAccount> {
        let payload = self.backend.get_from_storage(entry).await?;
        let stored = StoredAccount::from_json(&payload)?;
        if stored.address != entry.address || stored.name != entry.name {
            return Err(AccountError::storage(format!(
                "Keystore payload for '{}' does not match its entry",
                entry.name
            )));
        }
        Ok(stored)
    }

    fn private_key_of(&self, stored: &StoredAccount) -> AccountResult<SecurePrivateKey> {
        if let Some(private_key) = stored.private_key.as_deref() {
            return SecurePrivateKey::from_hex(private_key);
        }
        let mnemonic = stored.mnemonic.as_deref().ok_or_else(|| {
            AccountError::storage(format!("No key material stored for '{}'", stored.name))
        })?;
        let mnemonic = self.keys.parse_mnemonic(mnemonic)?;
        let hd_path = stored.hd_path.unwrap_or(self.config.hd_path);
        self.keys.derive_private_key(&mnemonic, &hd_path)
    }
}

impl std::fmt::Debug for Accounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accounts")
            .field("backend", &self.backend.kind())
            .field("prefix", &self.config.address_prefix)
            .finish_non_exhaustive()
    }
}
