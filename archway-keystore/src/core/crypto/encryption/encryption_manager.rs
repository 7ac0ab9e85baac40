use super::EncryptedData;
use crate::core::crypto::password::KdfParams;
use crate::shared::constants::*;
use crate::shared::error::AccountError;
use crate::shared::types::AccountResult;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit};
use argon2::Argon2;
use rand_core::{OsRng, RngCore};
use zeroize::Zeroizing;

/// Password based AES-256-GCM encryption with an Argon2id derived key
pub struct EncryptionManager {
    kdf: KdfParams,
}

impl EncryptionManager {
    pub fn new(kdf: KdfParams) -> Self {
        Self { kdf }
    }

    /// Encrypt `data` under `password` with a fresh salt and nonce
    pub fn encrypt(&self, data: &[u8], password: &str) -> AccountResult<EncryptedData> {
        let mut salt = [0u8; SALT_SIZE];
        let mut nonce = [0u8; NONCE_SIZE];
        let mut rng = OsRng;
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let key = self.derive_key(password, &salt)?;
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&*key));
        let ciphertext = cipher
            .encrypt(GenericArray::from_slice(&nonce), data)
            .map_err(|e| AccountError::crypto(format!("Encryption failed: {}", e)))?;

        Ok(EncryptedData { salt, nonce, ciphertext })
    }

    /// Decrypt a blob. An authentication failure means the password was wrong
    /// (or the blob was tampered with) and is reported as `InvalidPassword`.
    pub fn decrypt(
        &self,
        encrypted: &EncryptedData,
        password: &str,
        account: &str,
    ) -> AccountResult<Zeroizing<Vec<u8>>> {
        let key = self.derive_key(password, &encrypted.salt)?;
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&*key));
        let plaintext = cipher
            .decrypt(GenericArray::from_slice(&encrypted.nonce), encrypted.ciphertext.as_slice())
            .map_err(|_| AccountError::invalid_password(account.to_string()))?;
        Ok(Zeroizing::new(plaintext))
    }

    fn derive_key(&self, password: &str, salt: &[u8]) -> AccountResult<Zeroizing<[u8; KEY_SIZE]>> {
        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            argon2::Params::new(
                self.kdf.memory_cost,
                self.kdf.iterations,
                self.kdf.parallelism,
                Some(KEY_SIZE),
            )?,
        );

        let mut key = Zeroizing::new([0u8; KEY_SIZE]);
        argon2.hash_password_into(password.as_bytes(), salt, &mut *key)?;
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> EncryptionManager {
        EncryptionManager::new(KdfParams::insecure_fast())
    }

    #[test]
    fn test_encrypt_decrypt() {
        let manager = manager();
        let encrypted = manager.encrypt(b"secret payload", "correct horse").expect("encrypt");
        let plaintext = manager.decrypt(&encrypted, "correct horse", "alice").expect("decrypt");
        assert_eq!(plaintext.as_slice(), b"secret payload");
    }

    #[test]
    fn test_wrong_password_is_invalid_password() {
        let manager = manager();
        let encrypted = manager.encrypt(b"secret payload", "correct horse").unwrap();
        let result = manager.decrypt(&encrypted, "battery staple", "alice");
        assert_eq!(result.unwrap_err(), AccountError::invalid_password("alice"));
    }

    #[test]
    fn test_fresh_salt_and_nonce_per_encryption() {
        let manager = manager();
        let first = manager.encrypt(b"payload", "pw").unwrap();
        let second = manager.encrypt(b"payload", "pw").unwrap();
        assert_ne!(first.salt, second.salt);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_tampered_ciphertext_is_rejected() {
        let manager = manager();
        let mut encrypted = manager.encrypt(b"payload", "pw").unwrap();
        encrypted.ciphertext[0] ^= 0xff;
        assert!(manager.decrypt(&encrypted, "pw", "alice").is_err());
    }
}
