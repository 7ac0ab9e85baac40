use crate::core::crypto::keys::SecurePrivateKey;
use crate::shared::constants::*;
use crate::shared::error::AccountError;
use crate::shared::types::AccountResult;
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

/// secp256k1 ECDSA over SHA-256, the Cosmos SDK signing scheme
pub struct SignatureManager {
    secp: Secp256k1<secp256k1::All>,
}

impl Default for SignatureManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureManager {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }

    /// Sign arbitrary bytes; returns the 64-byte compact (r || s) signature
    pub fn sign(
        &self,
        message: &[u8],
        private_key: &SecurePrivateKey,
    ) -> AccountResult<[u8; SIGNATURE_SIZE]> {
        private_key.with_key(|key_bytes| {
            let secret_key = SecretKey::from_byte_array(*key_bytes)
                .map_err(|e| AccountError::crypto(format!("Invalid private key: {}", e)))?;

            let digest: [u8; 32] = Sha256::digest(message).into();
            let signature = self.secp.sign_ecdsa(Message::from_digest(digest), &secret_key);
            Ok(signature.serialize_compact())
        })
    }

    /// Verify a compact signature against a compressed public key
    pub fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> AccountResult<bool> {
        let public_key = PublicKey::from_slice(public_key)
            .map_err(|e| AccountError::invalid_format(format!("Invalid public key: {}", e)))?;
        let signature = Signature::from_compact(signature)
            .map_err(|e| AccountError::invalid_format(format!("Invalid signature: {}", e)))?;

        let digest: [u8; 32] = Sha256::digest(message).into();
        Ok(self
            .secp
            .verify_ecdsa(Message::from_digest(digest), &signature, &public_key)
            .is_ok())
    }
}
