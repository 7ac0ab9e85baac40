//! Constants for the keystore core
//!
//! This module contains all constants used throughout the keystore core.

// Account constants
pub const ACCOUNT_NAME_MAX_LENGTH: usize = 50;
pub const ACCOUNT_NAME_MIN_LENGTH: usize = 1;

/// Separator between the fields of a keystore tag.
/// Never valid inside an account name or a bech32 address.
pub const TAG_SEPARATOR: char = '.';

// Address constants
pub const DEFAULT_ADDRESS_PREFIX: &str = "archway";
pub const BECH32_SEPARATOR: char = '1';
/// Data words of a 20-byte (secp256k1 account) address.
pub const ADDRESS_WORDS_SHORT: usize = 32;
/// Data words of a 32-byte (module / contract) address.
pub const ADDRESS_WORDS_LONG: usize = 52;

// Derivation constants
pub const BIP44_PURPOSE: u32 = 44;
pub const DEFAULT_COIN_TYPE: u32 = 118;
pub const DEFAULT_ACCOUNT_INDEX: u32 = 0;
pub const DEFAULT_CHANGE: u32 = 0;
pub const DEFAULT_ADDRESS_INDEX: u32 = 0;
pub const MNEMONIC_ENTROPY_SIZE: usize = 32; // 24 words
pub const SUPPORTED_MNEMONIC_WORD_COUNTS: &[usize] = &[12, 15, 18, 21, 24];

// Security constants
pub const PRIVATE_KEY_SIZE: usize = 32;
pub const PUBLIC_KEY_SIZE: usize = 33; // compressed
pub const KEY_SIZE: usize = 32;
pub const NONCE_SIZE: usize = 12;
pub const SALT_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;
pub const PUBLIC_KEY_ALGO: &str = "secp256k1";

// Cryptographic constants
pub const ARGON2_MEMORY_COST: u32 = 65536; // 64MB
pub const ARGON2_TIME_COST: u32 = 3;
pub const ARGON2_PARALLELISM: u32 = 1;

// Storage constants
pub const KEYSTORE_DIR_NAME: &str = "archway";
pub const KEYSTORE_SUBDIR: &str = "keys";
pub const KEY_FILE_EXTENSION: &str = "key";
pub const KEYRING_SERVICE: &str = "archway-keystore";
pub const KEYRING_INDEX_FILE: &str = "os-keystore.index.json";

// Ledger constants (milliseconds)
pub const LEDGER_OPEN_TIMEOUT_MS: u64 = 5_000;
pub const LEDGER_LISTEN_TIMEOUT_MS: u64 = 60_000;

// Environment variables
pub const ENV_BACKEND: &str = "ARCHWAY_KEYSTORE_BACKEND";
pub const ENV_KEYSTORE_DIR: &str = "ARCHWAY_KEYSTORE_DIR";
pub const ENV_ADDRESS_PREFIX: &str = "ARCHWAY_ADDRESS_PREFIX";
pub const ENV_PASSWORD: &str = "ARCHWAY_KEYSTORE_PASSWORD";
pub const ENV_LEDGER_OPEN_TIMEOUT: &str = "ARCHWAY_LEDGER_OPEN_TIMEOUT_MS";
pub const ENV_LEDGER_LISTEN_TIMEOUT: &str = "ARCHWAY_LEDGER_LISTEN_TIMEOUT_MS";

// Build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_word_counts() {
        // 20 bytes and 32 bytes re-grouped into 5-bit words
        assert_eq!(ADDRESS_WORDS_SHORT, (20 * 8 + 4) / 5);
        assert_eq!(ADDRESS_WORDS_LONG, (32 * 8 + 4) / 5);
    }

    #[test]
    fn test_security_constants() {
        assert_eq!(PRIVATE_KEY_SIZE, 32);
        assert_eq!(PUBLIC_KEY_SIZE, 33);
        assert_eq!(SIGNATURE_SIZE, 64);
    }

    #[test]
    fn test_ledger_timeouts() {
        assert_eq!(LEDGER_OPEN_TIMEOUT_MS, 5_000);
        assert_eq!(LEDGER_LISTEN_TIMEOUT_MS, 60_000);
    }
}
