//! Key generation and derivation
//!
//! Mnemonic generation, BIP39 seed expansion and BIP32/BIP44 derivation of
//! secp256k1 account keys. Every intermediate secret lives in a zeroizing
//! buffer and is cleared before the call returns.

use super::{HdPath, SecurePrivateKey, SecureSeedPhrase};
use crate::shared::constants::*;
use crate::shared::error::AccountError;
use crate::shared::utils::{address_from_public_key, validate_mnemonic};
use bip32::XPrv;
use bip39::Mnemonic;
use rand_core::{OsRng, RngCore};
use zeroize::Zeroizing;

/// Public half of a derived key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPublicKey {
    pub public_key: [u8; PUBLIC_KEY_SIZE],
    pub address: String,
}

/// Key manager for mnemonic and key derivation
pub struct KeyManager {
    prefix: String,
}

impl KeyManager {
    /// Create a key manager producing addresses with the given bech32 prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generate a fresh 24 word mnemonic from OS randomness
    pub fn generate_mnemonic(&self) -> Result<SecureSeedPhrase, AccountError> {
        let mut entropy = Zeroizing::new([0u8; MNEMONIC_ENTROPY_SIZE]);
        OsRng.fill_bytes(&mut *entropy);

        let mnemonic = Mnemonic::from_entropy(&*entropy)
            .map_err(|e| AccountError::crypto(format!("Failed to generate mnemonic: {}", e)))?;
        Ok(SecureSeedPhrase::new(mnemonic.to_string()))
    }

    /// Normalise and validate a user supplied mnemonic
    pub fn parse_mnemonic(&self, phrase: &str) -> Result<SecureSeedPhrase, AccountError> {
        validate_mnemonic(phrase)?;
        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(SecureSeedPhrase::new(normalized))
    }

    /// Derive the private key at `hd_path` without storing the seed
    pub fn derive_private_key(
        &self,
        mnemonic: &SecureSeedPhrase,
        hd_path: &HdPath,
    ) -> Result<SecurePrivateKey, AccountError> {
        let mnemonic = Mnemonic::parse_in_normalized(bip39::Language::English, mnemonic.as_str())?;
        let seed = Zeroizing::new(mnemonic.to_seed_normalized(""));

        let derivation_path = hd_path.to_derivation_path()?;
        let child_xprv = XPrv::derive_from_path(&*seed, &derivation_path)
            .map_err(|e| AccountError::crypto(format!("Failed to derive child XPrv: {}", e)))?;

        let private_key_bytes = Zeroizing::new(child_xprv.to_bytes());
        SecurePrivateKey::from_bytes(&*private_key_bytes)
    }

    /// Public key and bech32 address of a private key
    pub fn public_key(
        &self,
        private_key: &SecurePrivateKey,
    ) -> Result<DerivedPublicKey, AccountError> {
        let public_key = private_key.public_key()?;
        let address = address_from_public_key(&public_key, &self.prefix)?;
        Ok(DerivedPublicKey { public_key, address })
    }

    /// Address of a compressed public key under this manager's prefix
    pub fn address(&self, public_key: &[u8]) -> Result<String, AccountError> {
        address_from_public_key(public_key, &self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MNEMONIC: &str = concat!(
        "abandon abandon abandon abandon abandon abandon ",
        "abandon abandon abandon abandon abandon about"
    );

    #[test]
    fn test_generate_mnemonic_has_24_valid_words() {
        let manager = KeyManager::new("archway");
        let mnemonic = manager.generate_mnemonic().expect("mnemonic");
        assert_eq!(mnemonic.word_count(), 24);
        assert!(validate_mnemonic(mnemonic.as_str()).is_ok());
    }

    #[test]
    fn test_generated_mnemonics_differ() {
        let manager = KeyManager::new("archway");
        let first = manager.generate_mnemonic().unwrap();
        let second = manager.generate_mnemonic().unwrap();
        assert_ne!(first.as_str(), second.as_str());
    }

    #[test]
    fn test_parse_mnemonic_normalises_whitespace() {
        let manager = KeyManager::new("archway");
        let spaced = MNEMONIC.replace(' ', "   ");
        let mnemonic = manager.parse_mnemonic(&format!("  {}\n", spaced)).expect("valid");
        assert_eq!(mnemonic.as_str(), MNEMONIC);
    }

    #[test]
    fn test_derive_default_path_fixture() {
        let manager = KeyManager::new("archway");
        let mnemonic = manager.parse_mnemonic(MNEMONIC).unwrap();
        let key = manager.derive_private_key(&mnemonic, &HdPath::default()).expect("derive");

        assert_eq!(
            key.to_hex().as_str(),
            "c4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104"
        );
        let public = manager.public_key(&key).expect("public key");
        assert_eq!(public.address, "archway19rl4cm2hmr8afy4kldpxz3fka4jguq0aft3e4z");
    }

    #[test]
    fn test_derive_second_index() {
        let manager = KeyManager::new("archway");
        let mnemonic = manager.parse_mnemonic(MNEMONIC).unwrap();
        let key = manager
            .derive_private_key(&mnemonic, &HdPath::with_index(1).unwrap())
            .expect("derive");
        let public = manager.public_key(&key).expect("public key");

        assert_eq!(public.address, "archway1jrkmdcwgq94uaamx6zax2luewlhf7u4kfn64u4");
        assert_eq!(
            hex::encode(public.public_key),
            "03a9a0776157f1dee1fe2d65628747059a8796de9a379f3015c4dcf483f64840a6"
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let manager = KeyManager::new("archway");
        let mnemonic = manager.parse_mnemonic(MNEMONIC).unwrap();
        let first = manager.derive_private_key(&mnemonic, &HdPath::default()).unwrap();
        let second = manager.derive_private_key(&mnemonic, &HdPath::default()).unwrap();
        assert_eq!(first.to_hex().as_str(), second.to_hex().as_str());
    }

    #[test]
    fn test_invalid_mnemonic_is_rejected() {
        let manager = KeyManager::new("archway");
        assert!(manager.parse_mnemonic("not a real mnemonic").is_err());
    }
}
