//! User confirmation before destructive or secret-revealing operations

use crate::shared::error::AccountError;
use crate::shared::types::AccountResult;
use std::io::{self, BufRead, Write};

#[cfg_attr(test, mockall::automock)]
pub trait Confirmation: Send + Sync {
    /// Ask the user a yes/no question
    fn confirm(&self, message: &str) -> AccountResult<bool>;
}

/// `[y/N]` prompt on the terminal; anything but `y`/`yes` declines
#[derive(Debug, Default, Clone)]
pub struct TerminalConfirmation;

impl TerminalConfirmation {
    pub fn new() -> Self {
        Self
    }
}

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, message: &str) -> AccountResult<bool> {
        let mut stderr = io::stderr();
        write!(stderr, "{} [y/N]: ", message)?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

/// Fixed answer, for headless runs (`--yes`) and tests
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirmation(pub bool);

impl Confirmation for StaticConfirmation {
    fn confirm(&self, _message: &str) -> AccountResult<bool> {
        Ok(self.0)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Declining surfaces as `Cancelled`
pub fn require_confirmation(confirmation: &dyn Confirmation, message: &str) -> AccountResult<()> {
    if confirmation.confirm(message)? {
        Ok(())
    } else {
        Err(AccountError::cancelled(message.to_string()))
    }
}
