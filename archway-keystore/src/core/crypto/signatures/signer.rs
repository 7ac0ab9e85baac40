use super::SignatureManager;
use crate::core::crypto::keys::SecurePrivateKey;
use crate::shared::constants::*;
use crate::shared::error::AccountError;
use crate::shared::types::AccountResult;
use crate::shared::utils::address_from_public_key;
use async_trait::async_trait;

/// Public data a signer exposes about the account it signs for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerAccount {
    pub address: String,
    pub algo: String,
    pub public_key: Vec<u8>,
}

/// Produces signatures for a bound account without handing out key material
#[async_trait]
pub trait OfflineSigner: Send + Sync {
    /// Accounts this signer can sign for
    async fn accounts(&self) -> AccountResult<Vec<SignerAccount>>;

    /// Sign `sign_bytes` for `signer_address`; returns a compact 64-byte signature
    async fn sign(&self, signer_address: &str, sign_bytes: &[u8]) -> AccountResult<Vec<u8>>;
}

/// Software signer holding a single secp256k1 key.
/// The key is zeroized when the signer is dropped.
pub struct DirectSecp256k1Signer {
    private_key: SecurePrivateKey,
    account: SignerAccount,
    signatures: SignatureManager,
}

impl DirectSecp256k1Signer {
    pub fn new(private_key: SecurePrivateKey, prefix: &str) -> AccountResult<Self> {
        let public_key = private_key.public_key()?;
        let address = address_from_public_key(&public_key, prefix)?;

        Ok(Self {
            private_key,
            account: SignerAccount {
                address,
                algo: PUBLIC_KEY_ALGO.to_string(),
                public_key: public_key.to_vec(),
            },
            signatures: SignatureManager::new(),
        })
    }

    pub fn address(&self) -> &str {
        &self.account.address
    }
}

#[async_trait]
impl OfflineSigner for DirectSecp256k1Signer {
    async fn accounts(&self) -> AccountResult<Vec<SignerAccount>> {
        Ok(vec![self.account.clone()])
    }

    async fn sign(&self, signer_address: &str, sign_bytes: &[u8]) -> AccountResult<Vec<u8>> {
        if signer_address != self.account.address {
            return Err(AccountError::not_found(format!(
                "Signer has no key for address {}",
                signer_address
            )));
        }
        let signature = self.signatures.sign(sign_bytes, &self.private_key)?;
        Ok(signature.to_vec())
    }
}

impl std::fmt::Debug for DirectSecp256k1Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectSecp256k1Signer")
            .field("address", &self.account.address)
            .finish_non_exhaustive()
    }
}
