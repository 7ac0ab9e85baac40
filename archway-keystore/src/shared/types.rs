use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::AccountError;

// Basic types for account operations
pub type Address = String;
pub type AccountName = String;
pub type Tag = String;

pub type AccountResult<T> = Result<T, AccountError>;

/// Where an account's key material lives. Fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Os,
    File,
    Ledger,
    Test,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Os => "os",
            AccountType::File => "file",
            AccountType::Ledger => "ledger",
            AccountType::Test => "test",
        }
    }

    /// Ledger accounts never hold a private key or mnemonic in the keystore
    pub fn holds_secret(&self) -> bool {
        !matches!(self, AccountType::Ledger)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "os" => Ok(AccountType::Os),
            "file" => Ok(AccountType::File),
            "ledger" => Ok(AccountType::Ledger),
            "test" => Ok(AccountType::Test),
            other => Err(AccountError::invalid_format(format!("Unknown account type: {}", other))),
        }
    }
}

/// Keystore backend a facade is bound to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum KeystoreBackendType {
    Os,
    File,
    Test,
}

impl KeystoreBackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeystoreBackendType::Os => "os",
            KeystoreBackendType::File => "file",
            KeystoreBackendType::Test => "test",
        }
    }

    /// Account type recorded for keys created through this backend
    pub fn account_type(&self) -> AccountType {
        match self {
            KeystoreBackendType::Os => AccountType::Os,
            KeystoreBackendType::File => AccountType::File,
            KeystoreBackendType::Test => AccountType::Test,
        }
    }
}

impl fmt::Display for KeystoreBackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeystoreBackendType {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "os" => Ok(KeystoreBackendType::Os),
            "file" => Ok(KeystoreBackendType::File),
            "test" => Ok(KeystoreBackendType::Test),
            other => Err(AccountError::config(format!("Unknown keystore backend: {}", other))),
        }
    }
}
