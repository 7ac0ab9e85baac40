//! Utility functions for the keystore core
//!
//! Pure helpers shared by the backends and the accounts facade: bech32
//! address handling, account name and mnemonic validation.

use crate::shared::constants::*;
use crate::shared::error::AccountError;
use bech32::{FromBase32, ToBase32, Variant};
use bip39::Mnemonic;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Check a bech32 address.
///
/// Valid iff it reads `<prefix>1<payload>` where the prefix is `expected_prefix`
/// when given (any printable ASCII otherwise) and the payload decodes to
/// exactly 32 or 52 data words. Decode failures yield `false`, never an error.
pub fn is_valid_address(address: &str, expected_prefix: Option<&str>) -> bool {
    let separator = match address.rfind(BECH32_SEPARATOR) {
        Some(position) if position > 0 => position,
        _ => return false,
    };

    let prefix = &address[..separator];
    match expected_prefix {
        Some(expected) if prefix != expected => return false,
        Some(_) => {}
        None if !prefix.chars().all(|c| c.is_ascii_graphic()) => return false,
        None => {}
    }

    match bech32::decode(address) {
        Ok((_, words, Variant::Bech32)) => {
            words.len() == ADDRESS_WORDS_SHORT || words.len() == ADDRESS_WORDS_LONG
        }
        _ => false,
    }
}

/// Same check as [`is_valid_address`], surfaced as an `InvalidFormat` error
pub fn validate_address(address: &str, expected_prefix: Option<&str>) -> Result<(), AccountError> {
    if is_valid_address(address, expected_prefix) {
        return Ok(());
    }
    match expected_prefix {
        Some(prefix) => Err(AccountError::invalid_format(format!(
            "'{}' is not a valid {} address",
            address, prefix
        ))),
        None => Err(AccountError::invalid_format(format!("'{}' is not a valid address", address))),
    }
}

/// Derive the bech32 account address of a compressed secp256k1 public key
pub fn address_from_public_key(public_key: &[u8], prefix: &str) -> Result<String, AccountError> {
    if public_key.len() != PUBLIC_KEY_SIZE {
        return Err(AccountError::invalid_format(format!(
            "Public key must be {} bytes, got {}",
            PUBLIC_KEY_SIZE,
            public_key.len()
        )));
    }
    let sha = Sha256::digest(public_key);
    let hash = Ripemd160::digest(sha);
    bech32::encode(prefix, hash.to_base32(), Variant::Bech32).map_err(|e| {
        AccountError::invalid_format(format!("Invalid address prefix '{}': {}", prefix, e))
    })
}

/// Decode the raw bytes behind a bech32 address
pub fn address_to_bytes(address: &str) -> Result<(String, Vec<u8>), AccountError> {
    let (prefix, words, _) = bech32::decode(address)
        .map_err(|e| AccountError::invalid_format(format!("Invalid bech32 address: {}", e)))?;
    let bytes = Vec::<u8>::from_base32(&words)
        .map_err(|e| AccountError::invalid_format(format!("Invalid bech32 payload: {}", e)))?;
    Ok((prefix, bytes))
}

/// Validate an account name.
///
/// Names are embedded in keystore tags and file names, so only ASCII
/// alphanumerics, `-` and `_` are accepted.
pub fn validate_account_name(name: &str) -> Result<(), AccountError> {
    if name.len() < ACCOUNT_NAME_MIN_LENGTH || name.len() > ACCOUNT_NAME_MAX_LENGTH {
        return Err(AccountError::validation(format!(
            "Account name must be between {} and {} characters",
            ACCOUNT_NAME_MIN_LENGTH, ACCOUNT_NAME_MAX_LENGTH
        )));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(AccountError::validation(format!(
            "Account name '{}' may only contain letters, digits, '-' and '_'",
            name
        )));
    }
    Ok(())
}

/// Validate a BIP39 mnemonic without keeping it around
pub fn validate_mnemonic(mnemonic: &str) -> Result<(), AccountError> {
    let word_count = mnemonic.split_whitespace().count();
    if !SUPPORTED_MNEMONIC_WORD_COUNTS.contains(&word_count) {
        return Err(AccountError::validation(format!(
            "Mnemonic must have 12, 15, 18, 21 or 24 words, got {}",
            word_count
        )));
    }
    Mnemonic::parse_in_normalized(bip39::Language::English, mnemonic)?;
    Ok(())
}

/// Parse a raw private key given as 64 hex characters, with or without `0x`
pub fn parse_private_key_hex(
    private_key: &str,
) -> Result<zeroize::Zeroizing<Vec<u8>>, AccountError> {
    let trimmed = private_key.trim().trim_start_matches("0x");
    if trimmed.len() != PRIVATE_KEY_SIZE * 2 {
        return Err(AccountError::invalid_format(format!(
            "Private key must be {} hex characters",
            PRIVATE_KEY_SIZE * 2
        )));
    }
    let bytes = hex::decode(trimmed)?;
    Ok(zeroize::Zeroizing::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALICE: &str = "archway19rl4cm2hmr8afy4kldpxz3fka4jguq0aft3e4z";
    const ALICE_PUBKEY: &str = "024f4e2ad99c34d60b9ba6283c9431a8418af8673212961f97a77b6377fcd05b62";

    #[test]
    fn test_address_from_public_key() {
        let public_key = hex::decode(ALICE_PUBKEY).unwrap();
        assert_eq!(address_from_public_key(&public_key, "archway").unwrap(), ALICE);
        assert_eq!(
            address_from_public_key(&public_key, "cosmos").unwrap(),
            "cosmos19rl4cm2hmr8afy4kldpxz3fka4jguq0auqdal4"
        );
    }

    #[test]
    fn test_address_from_short_public_key_fails() {
        assert!(matches!(
            address_from_public_key(&[2u8; 20], "archway"),
            Err(AccountError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_valid_address_with_and_without_prefix() {
        assert!(is_valid_address(ALICE, None));
        assert!(is_valid_address(ALICE, Some("archway")));
        assert!(!is_valid_address(ALICE, Some("cosmos")));
    }

    #[test]
    fn test_address_word_count_boundaries() {
        // 20 and 32 byte payloads
        assert!(is_valid_address(
            "archway1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq7evy9g",
            None
        ));
        // 19 bytes -> 31 words, 33 bytes -> 53 words
        assert!(!is_valid_address("archway1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqlvy8lx", None));
        assert!(!is_valid_address(
            "archway1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqwkt57c",
            None
        ));
    }

    #[test]
    fn test_malformed_separator_is_rejected() {
        assert!(!is_valid_address("archwayqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq", None));
        assert!(!is_valid_address("1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq", None));
        assert!(!is_valid_address("", None));
        // checksum broken by an extra separator inside the payload
        assert!(!is_valid_address("archway19rl4cm2hmr8afy4kldpxz3fka4jguq01ft3e4z", None));
    }

    #[test]
    fn test_bad_checksum_is_rejected() {
        assert!(!is_valid_address("archway19rl4cm2hmr8afy4kldpxz3fka4jguq0aft3e4y", None));
    }

    #[test]
    fn test_validate_address_error() {
        assert!(validate_address(ALICE, Some("archway")).is_ok());
        assert!(matches!(
            validate_address("not-an-address", None),
            Err(AccountError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_address_to_bytes() {
        let (prefix, bytes) = address_to_bytes(ALICE).unwrap();
        assert_eq!(prefix, "archway");
        assert_eq!(bytes.len(), 20);
    }

    #[test]
    fn test_account_name_validation() {
        assert!(validate_account_name("alice").is_ok());
        assert!(validate_account_name("deployer_01-test").is_ok());
        assert!(validate_account_name("").is_err());
        assert!(validate_account_name("has.dot").is_err());
        assert!(validate_account_name("with space").is_err());
        assert!(validate_account_name(&"a".repeat(ACCOUNT_NAME_MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_mnemonic_validation() {
        let valid = concat!(
            "abandon abandon abandon abandon abandon abandon ",
            "abandon abandon abandon abandon abandon about"
        );
        assert!(validate_mnemonic(valid).is_ok());
        let bad_checksum = concat!(
            "abandon abandon abandon abandon abandon abandon ",
            "abandon abandon abandon abandon abandon abandon"
        );
        assert!(validate_mnemonic(bad_checksum).is_err());
        assert!(validate_mnemonic("abandon about").is_err());
    }

    #[test]
    fn test_parse_private_key_hex() {
        let key = "c4a48e2fce1481cd3294b4490f6678090ea98d3d0e5cd984558ab0968741b104";
        assert_eq!(parse_private_key_hex(key).unwrap().len(), 32);
        assert_eq!(parse_private_key_hex(&format!("0x{}", key)).unwrap().len(), 32);
        assert!(parse_private_key_hex("abcd").is_err());
        assert!(parse_private_key_hex(&"zz".repeat(32)).is_err());
    }

    proptest! {
        #[test]
        fn prop_address_validation_never_panics(input in "\\PC*") {
            let _ = is_valid_address(&input, None);
            let _ = is_valid_address(&input, Some("archway"));
        }

        #[test]
        fn prop_any_twenty_bytes_make_a_valid_address(
            bytes in proptest::collection::vec(any::<u8>(), 20)
        ) {
            let address = bech32::encode("archway", bytes.to_base32(), Variant::Bech32).unwrap();
            prop_assert!(is_valid_address(&address, Some("archway")));
        }
    }
}
