use crate::shared::constants::*;
use crate::shared::error::AccountError;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Scoped secp256k1 private key.
/// The bytes are zeroized when the wrapper is dropped.
pub struct SecurePrivateKey {
    bytes: Zeroizing<[u8; PRIVATE_KEY_SIZE]>,
}

impl SecurePrivateKey {
    /// Wrap raw key bytes, rejecting anything that is not a valid secp256k1 scalar
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AccountError> {
        if bytes.len() != PRIVATE_KEY_SIZE {
            return Err(AccountError::crypto("Invalid private key length".to_string()));
        }

        let mut key = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        key.copy_from_slice(bytes);

        SecretKey::from_byte_array(*key)
            .map_err(|_| AccountError::crypto("Invalid private key".to_string()))?;

        Ok(Self { bytes: key })
    }

    /// Parse a 64 hex character key
    pub fn from_hex(private_key: &str) -> Result<Self, AccountError> {
        let bytes = crate::shared::utils::parse_private_key_hex(private_key)?;
        Self::from_bytes(&bytes)
    }

    /// Perform an operation with the key bytes; callers must not copy them out
    pub fn with_key<F, T>(&self, f: F) -> Result<T, AccountError>
    where
        F: FnOnce(&[u8; PRIVATE_KEY_SIZE]) -> Result<T, AccountError>,
    {
        f(&self.bytes)
    }

    /// Compressed 33-byte public key
    pub fn public_key(&self) -> Result<[u8; PUBLIC_KEY_SIZE], AccountError> {
        let secp = Secp256k1::new();
        let secret_key = SecretKey::from_byte_array(*self.bytes)?;
        Ok(PublicKey::from_secret_key(&secp, &secret_key).serialize())
    }

    /// Fixed-format hex rendering used only by explicit export
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(*self.bytes))
    }
}

// No Clone implementation to prevent accidental key duplication

impl fmt::Debug for SecurePrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurePrivateKey([REDACTED])")
    }
}

impl Zeroize for SecurePrivateKey {
    fn zeroize(&mut self) {
        self.bytes.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_KEY: &str = "c4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104";

    #[test]
    fn test_from_hex_and_back() {
        let key = SecurePrivateKey::from_hex(ALICE_KEY).expect("valid key");
        assert_eq!(key.to_hex().as_str(), ALICE_KEY);
    }

    #[test]
    fn test_public_key_is_compressed() {
        let key = SecurePrivateKey::from_hex(ALICE_KEY).expect("valid key");
        let public_key = key.public_key().expect("public key");
        assert_eq!(
            hex::encode(public_key),
            "024f4e2ad99c34d60b9ba6283c9431a8418af8673212961f97a77b6377fcd05b62"
        );
    }

    #[test]
    fn test_zero_key_is_rejected() {
        assert!(SecurePrivateKey::from_bytes(&[0u8; PRIVATE_KEY_SIZE]).is_err());
        assert!(SecurePrivateKey::from_bytes(&[1u8; 16]).is_err());
    }

    #[test]
    fn test_with_key() {
        let key = SecurePrivateKey::from_hex(ALICE_KEY).expect("valid key");
        let first = key.with_key(|bytes| Ok(bytes[0])).expect("with_key");
        assert_eq!(first, 0xc4);
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = SecurePrivateKey::from_hex(ALICE_KEY).expect("valid key");
        let debug = format!("{:?}", key);
        assert!(!debug.contains("c4a48e"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_zeroize_clears_bytes() {
        let mut key = SecurePrivateKey::from_hex(ALICE_KEY).expect("valid key");
        key.zeroize();
        key.with_key(|bytes| {
            assert!(bytes.iter().all(|b| *b == 0));
            Ok(())
        })
        .unwrap();
    }
}
