//! Keystore configuration
//!
//! Defaults, overridable from the environment (and a `.env` file).

use crate::core::crypto::keys::HdPath;
use crate::core::crypto::password::KdfParams;
use crate::shared::constants::*;
use crate::shared::error::AccountError;
use crate::shared::types::{AccountResult, KeystoreBackendType};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystoreConfig {
    pub backend: KeystoreBackendType,
    pub keystore_dir: PathBuf,
    pub address_prefix: String,
    pub hd_path: HdPath,
    pub ledger_open_timeout_ms: u64,
    pub ledger_listen_timeout_ms: u64,
    pub kdf: KdfParams,
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self {
            backend: KeystoreBackendType::File,
            keystore_dir: default_keystore_dir(),
            address_prefix: DEFAULT_ADDRESS_PREFIX.to_string(),
            hd_path: HdPath::default(),
            ledger_open_timeout_ms: LEDGER_OPEN_TIMEOUT_MS,
            ledger_listen_timeout_ms: LEDGER_LISTEN_TIMEOUT_MS,
            kdf: KdfParams::default(),
        }
    }
}

/// `<data_dir>/archway/keys`, falling back to the working directory
pub fn default_keystore_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(KEYSTORE_DIR_NAME)
        .join(KEYSTORE_SUBDIR)
}

impl KeystoreConfig {
    /// Defaults overridden by `ARCHWAY_*` environment variables
    pub fn from_env() -> AccountResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> AccountResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(backend) = lookup(ENV_BACKEND) {
            config.backend = KeystoreBackendType::from_str(&backend)?;
        }
        if let Some(dir) = lookup(ENV_KEYSTORE_DIR) {
            config.keystore_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = lookup(ENV_ADDRESS_PREFIX) {
            config.address_prefix = prefix.trim().to_string();
        }
        if let Some(timeout) = lookup(ENV_LEDGER_OPEN_TIMEOUT) {
            config.ledger_open_timeout_ms = parse_millis(ENV_LEDGER_OPEN_TIMEOUT, &timeout)?;
        }
        if let Some(timeout) = lookup(ENV_LEDGER_LISTEN_TIMEOUT) {
            config.ledger_listen_timeout_ms = parse_millis(ENV_LEDGER_LISTEN_TIMEOUT, &timeout)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AccountResult<()> {
        if self.address_prefix.is_empty()
            || !self.address_prefix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(AccountError::config(format!(
                "Address prefix '{}' must be lowercase alphanumeric",
                self.address_prefix
            )));
        }
        if self.ledger_open_timeout_ms == 0 || self.ledger_listen_timeout_ms == 0 {
            return Err(AccountError::config(
                "Ledger timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ledger_open_timeout(&self) -> Duration {
        Duration::from_millis(self.ledger_open_timeout_ms)
    }

    pub fn ledger_listen_timeout(&self) -> Duration {
        Duration::from_millis(self.ledger_listen_timeout_ms)
    }
}

fn parse_millis(key: &str, value: &str) -> AccountResult<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        AccountError::config(format!("{} must be a number of milliseconds, got '{}'", key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = KeystoreConfig::default();
        assert_eq!(config.backend, KeystoreBackendType::File);
        assert_eq!(config.address_prefix, "archway");
        assert_eq!(config.hd_path.to_string(), "m/44'/118'/0'/0/0");
        assert_eq!(config.ledger_open_timeout(), Duration::from_secs(5));
        assert_eq!(config.ledger_listen_timeout(), Duration::from_secs(60));
        assert!(config.keystore_dir.ends_with("archway/keys"));
    }

    #[test]
    fn test_overrides() {
        let config = KeystoreConfig::from_lookup(lookup_from(&[
            (ENV_BACKEND, "test"),
            (ENV_KEYSTORE_DIR, "/tmp/archway-keys"),
            (ENV_ADDRESS_PREFIX, "cosmos"),
            (ENV_LEDGER_OPEN_TIMEOUT, "250"),
        ]))
        .expect("config");

        assert_eq!(config.backend, KeystoreBackendType::Test);
        assert_eq!(config.keystore_dir, PathBuf::from("/tmp/archway-keys"));
        assert_eq!(config.address_prefix, "cosmos");
        assert_eq!(config.ledger_open_timeout_ms, 250);
        assert_eq!(config.ledger_listen_timeout_ms, LEDGER_LISTEN_TIMEOUT_MS);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = KeystoreConfig::from_lookup(lookup_from(&[(ENV_BACKEND, "  ")])).unwrap();
        assert_eq!(config.backend, KeystoreBackendType::File);
    }

    #[test]
    fn test_malformed_values_are_config_errors() {
        let result =
            KeystoreConfig::from_lookup(lookup_from(&[(ENV_LEDGER_LISTEN_TIMEOUT, "soon")]));
        assert!(matches!(result, Err(AccountError::Config(_))));

        let result = KeystoreConfig::from_lookup(lookup_from(&[(ENV_BACKEND, "ledger")]));
        assert!(matches!(result, Err(AccountError::Config(_))));

        let result = KeystoreConfig::from_lookup(lookup_from(&[(ENV_ADDRESS_PREFIX, "Arch Way")]));
        assert!(matches!(result, Err(AccountError::Config(_))));

        let result = KeystoreConfig::from_lookup(lookup_from(&[(ENV_LEDGER_OPEN_TIMEOUT, "0")]));
        assert!(matches!(result, Err(AccountError::Config(_))));
    }
}
