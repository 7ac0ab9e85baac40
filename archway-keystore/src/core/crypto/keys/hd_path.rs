//! BIP44 derivation paths
//!
//! `m / 44' / coin_type' / account' / change / index`

use crate::shared::constants::*;
use crate::shared::error::AccountError;
use bip32::DerivationPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HARDENED_BIT: u32 = 1 << 31;

/// BIP44 path with the purpose fixed at 44'
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HdPath {
    pub coin_type: u32,
    pub account: u32,
    pub change: u32,
    pub index: u32,
}

impl Default for HdPath {
    fn default() -> Self {
        Self {
            coin_type: DEFAULT_COIN_TYPE,
            account: DEFAULT_ACCOUNT_INDEX,
            change: DEFAULT_CHANGE,
            index: DEFAULT_ADDRESS_INDEX,
        }
    }
}

impl HdPath {
    pub fn new(
        coin_type: u32,
        account: u32,
        change: u32,
        index: u32,
    ) -> Result<Self, AccountError> {
        for component in [coin_type, account, change, index] {
            if component >= HARDENED_BIT {
                return Err(AccountError::invalid_format(format!(
                    "Derivation path component {} is out of range",
                    component
                )));
            }
        }
        Ok(Self { coin_type, account, change, index })
    }

    /// Default Cosmos path for a given address index
    pub fn with_index(index: u32) -> Result<Self, AccountError> {
        Self::new(DEFAULT_COIN_TYPE, DEFAULT_ACCOUNT_INDEX, DEFAULT_CHANGE, index)
    }

    pub fn to_derivation_path(&self) -> Result<DerivationPath, AccountError> {
        DerivationPath::from_str(&self.to_string())
            .map_err(|e| AccountError::invalid_format(format!("Invalid derivation path: {}", e)))
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/{}'/{}'/{}'/{}/{}",
            BIP44_PURPOSE, self.coin_type, self.account, self.change, self.index
        )
    }
}

impl FromStr for HdPath {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AccountError::invalid_format(format!("Invalid BIP44 path: {}", s));

        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 6 || parts[0] != "m" {
            return Err(invalid());
        }

        let hardened = |part: &str| -> Result<u32, AccountError> {
            part.strip_suffix('\'')
                .ok_or_else(|| invalid())?
                .parse::<u32>()
                .map_err(|_| invalid())
        };
        let normal = |part: &str| -> Result<u32, AccountError> {
            part.parse::<u32>().map_err(|_| invalid())
        };

        if hardened(parts[1])? != BIP44_PURPOSE {
            return Err(invalid());
        }

        Self::new(hardened(parts[2])?, hardened(parts[3])?, normal(parts[4])?, normal(parts[5])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        assert_eq!(HdPath::default().to_string(), "m/44'/118'/0'/0/0");
    }

    #[test]
    fn test_custom_components() {
        let path = HdPath::new(118, 2, 1, 7).expect("valid path");
        assert_eq!(path.to_string(), "m/44'/118'/2'/1/7");
        assert_eq!(HdPath::with_index(3).unwrap().index, 3);
    }

    #[test]
    fn test_parse_path() {
        let path: HdPath = "m/44'/118'/1'/0/5".parse().expect("valid path");
        assert_eq!(path, HdPath::new(118, 1, 0, 5).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        assert!("m/44'/118'/0'/0".parse::<HdPath>().is_err());
        assert!("m/49'/118'/0'/0/0".parse::<HdPath>().is_err());
        assert!("m/44'/118/0'/0/0".parse::<HdPath>().is_err());
        assert!("x/44'/118'/0'/0/0".parse::<HdPath>().is_err());
        assert!("m/44'/118'/0'/0/abc".parse::<HdPath>().is_err());
    }

    #[test]
    fn test_hardened_range_is_enforced() {
        assert!(HdPath::new(118, HARDENED_BIT, 0, 0).is_err());
    }

    #[test]
    fn test_to_derivation_path() {
        let path = HdPath::default().to_derivation_path().expect("bip32 path");
        assert_eq!(path.into_iter().count(), 5);
    }
}
