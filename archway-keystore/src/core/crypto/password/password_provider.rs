use crate::shared::constants::ENV_PASSWORD;
use crate::shared::error::AccountError;
use crate::shared::types::AccountResult;
use std::env;
use zeroize::Zeroizing;

/// Why a password is being asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPurpose {
    /// Protect a newly saved account
    Encrypt,
    /// Unlock an existing account
    Decrypt,
}

/// Source of keystore passwords.
///
/// Injected into the file keystore so headless runs and tests can supply a
/// fixed credential instead of an interactive prompt. Implementations may
/// block; the file keystore calls them on the blocking thread pool.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordProvider: Send + Sync {
    fn password(&self, account: &str, purpose: PasswordPurpose) -> AccountResult<Zeroizing<String>>;
}

/// Reads `ARCHWAY_KEYSTORE_PASSWORD` when set, otherwise prompts on the terminal
#[derive(Debug, Default, Clone)]
pub struct PromptPasswordProvider;

impl PromptPasswordProvider {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordProvider for PromptPasswordProvider {
    fn password(
        &self,
        account: &str,
        purpose: PasswordPurpose,
    ) -> AccountResult<Zeroizing<String>> {
        if let Ok(password) = env::var(ENV_PASSWORD) {
            return Ok(Zeroizing::new(password));
        }

        let prompt = match purpose {
            PasswordPurpose::Encrypt => {
                format!("Enter a password to encrypt account '{}': ", account)
            }
            PasswordPurpose::Decrypt => format!("Enter the password for account '{}': ", account),
        };
        let password = rpassword::prompt_password(prompt)
            .map_err(|e| AccountError::storage(format!("Password prompt failed: {}", e)))?;

        if password.is_empty() {
            return Err(AccountError::cancelled("empty password".to_string()));
        }
        Ok(Zeroizing::new(password))
    }
}

/// Always answers with the same password
pub struct StaticPasswordProvider {
    password: Zeroizing<String>,
}

impl StaticPasswordProvider {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Zeroizing::new(password.into()),
        }
    }
}

impl PasswordProvider for StaticPasswordProvider {
    fn password(
        &self,
        _account: &str,
        _purpose: PasswordPurpose,
    ) -> AccountResult<Zeroizing<String>> {
        Ok(self.password.clone())
    }
}

impl std::fmt::Debug for StaticPasswordProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticPasswordProvider([REDACTED])")
    }
}
