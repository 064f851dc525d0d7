//! API token storage in the operating system's credential store:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)
//!
//! Tokens are keyed by a fixed service name plus the normalized Jenkins URL,
//! so the same URL string must be used to save and to look up a token.

use keyring::Entry;
use std::fmt;
use thiserror::Error;

/// The service name used for keyring entries.
pub const SERVICE_NAME: &str = "jenkins-cli";

#[derive(Debug, Error)]
pub enum SecretError {
    /// No token stored for this URL.
    #[error("no token stored for {0}")]
    NotFound(String),

    /// Failed to access the system keyring.
    #[error("failed to access system keyring: {0}")]
    Access(String),

    /// Failed to store the token.
    #[error("failed to store token in system keyring: {0}")]
    StoreFailed(String),
}

/// A Jenkins API token that never shows up in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the raw token.
    ///
    /// Only for building the Authorization header; never log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token([REDACTED])")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Opaque secret storage keyed by Jenkins URL.
pub trait SecretStore: Send + Sync {
    fn set_token(&self, url: &str, token: &Token) -> Result<(), SecretError>;
    fn get_token(&self, url: &str) -> Result<Token, SecretError>;
}

/// Secret store backed by the OS keyring.
#[derive(Debug)]
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    fn entry(&self, url: &str) -> Result<Entry, SecretError> {
        Entry::new(&self.service, url).map_err(|e| SecretError::Access(e.to_string()))
    }
}

impl SecretStore for KeyringStore {
    fn set_token(&self, url: &str, token: &Token) -> Result<(), SecretError> {
        self.entry(url)?
            .set_password(token.expose())
            .map_err(|e| SecretError::StoreFailed(e.to_string()))
    }

    fn get_token(&self, url: &str) -> Result<Token, SecretError> {
        match self.entry(url)?.get_password() {
            Ok(password) => Ok(Token::new(password)),
            Err(keyring::Error::NoEntry) => Err(SecretError::NotFound(url.to_string())),
            Err(e) => Err(SecretError::Access(e.to_string())),
        }
    }
}

/// In-memory secret store for tests
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    tokens: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, url: &str, token: &str) -> Self {
        self.tokens
            .lock()
            .unwrap()
            .insert(url.to_string(), token.to_string());
        self
    }
}

#[cfg(test)]
impl SecretStore for MemoryStore {
    fn set_token(&self, url: &str, token: &Token) -> Result<(), SecretError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(url.to_string(), token.expose().to_string());
        Ok(())
    }

    fn get_token(&self, url: &str) -> Result<Token, SecretError> {
        self.tokens
            .lock()
            .unwrap()
            .get(url)
            .map(|token| Token::new(token.as_str()))
            .ok_or_else(|| SecretError::NotFound(url.to_string()))
    }
}
