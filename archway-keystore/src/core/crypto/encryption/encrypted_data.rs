use crate::shared::constants::*;
use crate::shared::error::AccountError;

/// On-disk layout of an encrypted account blob:
/// `salt (32) || nonce (12) || AES-256-GCM ciphertext + tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedData {
    pub salt: [u8; SALT_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + self.ciphertext.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AccountError> {
        // GCM tag alone is 16 bytes
        if bytes.len() < SALT_SIZE + NONCE_SIZE + 16 {
            return Err(AccountError::storage("Encrypted data too short".to_string()));
        }

        let (salt, rest) = bytes.split_at(SALT_SIZE);
        let (nonce, ciphertext) = rest.split_at(NONCE_SIZE);

        let mut data = Self {
            salt: [0u8; SALT_SIZE],
            nonce: [0u8; NONCE_SIZE],
            ciphertext: ciphertext.to_vec(),
        };
        data.salt.copy_from_slice(salt);
        data.nonce.copy_from_slice(nonce);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let data = EncryptedData {
            salt: [1u8; SALT_SIZE],
            nonce: [2u8; NONCE_SIZE],
            ciphertext: vec![3u8; 20],
        };

        let bytes = data.to_bytes();
        assert_eq!(bytes.len(), SALT_SIZE + NONCE_SIZE + 20);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[SALT_SIZE], 2);
        assert_eq!(EncryptedData::from_bytes(&bytes).unwrap(), data);
    }

    #[test]
    fn test_truncated_blob_is_a_storage_error() {
        let result = EncryptedData::from_bytes(&[0u8; SALT_SIZE + NONCE_SIZE]);
        assert!(matches!(result, Err(AccountError::Storage(_))));
    }
}
