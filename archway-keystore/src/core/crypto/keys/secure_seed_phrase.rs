use std::fmt;
use zeroize::Zeroize;

/// Secure seed phrase wrapper, cleared on drop
pub struct SecureSeedPhrase {
    phrase: String,
}

impl SecureSeedPhrase {
    /// Create a new secure seed phrase
    pub fn new(phrase: String) -> Self {
        Self { phrase }
    }

    /// Get the seed phrase as a &str
    pub fn as_str(&self) -> &str {
        &self.phrase
    }

    /// Get the seed phrase as `Vec<String>`
    pub fn as_words(&self) -> Vec<String> {
        self.phrase.split_whitespace().map(|s| s.to_string()).collect()
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }
}

impl fmt::Debug for SecureSeedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureSeedPhrase([REDACTED; {} words])", self.word_count())
    }
}

impl Drop for SecureSeedPhrase {
    fn drop(&mut self) {
        self.phrase.zeroize();
    }
}
