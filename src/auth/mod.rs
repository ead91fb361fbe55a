//! Credential acquisition.
//!
//! A credential can come from the environment (`GEMINI_API_KEY`, then
//! `API_KEY`), from the OS keyring where a previous selection was saved, or
//! from an interactive prompt. Every source implements [`CredentialSource`],
//! whose `select_credential` hands the key back directly instead of leaving
//! it in ambient state for the caller to re-read.

mod ui;

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

pub use self::ui::prompt_api_key;

const KEYRING_SERVICE: &str = "tutor";
const KEYRING_ENTRY: &str = "gemini";

/// Environment variables consulted for a key, in order.
pub const ENV_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug)]
pub enum AuthError {
    /// The keyring backend refused or failed the request.
    Keyring(keyring::Error),

    /// A key was entered but it was blank.
    EmptyKey,

    /// Reading the key from the terminal failed.
    Io(std::io::Error),
}

impl AuthError {
    /// True when the keyring was temporarily unavailable (locked keychain,
    /// missing secret service) rather than permanently broken.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AuthError::Keyring(keyring::Error::PlatformFailure(_))
                | AuthError::Keyring(keyring::Error::NoStorageAccess(_))
        )
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Keyring(err) => write!(f, "Keyring error: {err}"),
            AuthError::EmptyKey => write!(f, "API key cannot be empty"),
            AuthError::Io(err) => write!(f, "Failed to read API key: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AuthError::Keyring(err) => Some(err),
            AuthError::Io(err) => Some(err),
            AuthError::EmptyKey => None,
        }
    }
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        AuthError::Keyring(err)
    }
}

/// Trims a candidate key and rejects blanks.
pub fn validate_key(raw: &str) -> Result<String, AuthError> {
    let key = raw.trim();
    if key.is_empty() {
        Err(AuthError::EmptyKey)
    } else {
        Ok(key.to_string())
    }
}

#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Whether a credential is already available without asking the user.
    async fn has_selected_credential(&self) -> bool;

    /// Produces the credential, asking the user if this source is
    /// interactive. `Ok(None)` means the source has nothing to offer.
    async fn select_credential(&self) -> Result<Option<String>, AuthError>;
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads the key from process environment variables.
pub struct EnvCredentials {
    lookup: EnvLookup,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }

    fn read(&self) -> Option<String> {
        ENV_KEY_VARS
            .iter()
            .filter_map(|name| (self.lookup)(name))
            .find_map(|value| validate_key(&value).ok())
    }
}

#[async_trait]
impl CredentialSource for EnvCredentials {
    async fn has_selected_credential(&self) -> bool {
        self.read().is_some()
    }

    async fn select_credential(&self) -> Result<Option<String>, AuthError> {
        Ok(self.read())
    }
}

/// Key saved in the OS keyring by a previous selection.
#[derive(Debug, Clone)]
pub struct KeyringCredentials {
    service: String,
    entry: String,
}

impl Default for KeyringCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringCredentials {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            entry: KEYRING_ENTRY.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry, AuthError> {
        Ok(Entry::new(&self.service, &self.entry)?)
    }

    pub fn get(&self) -> Result<Option<String>, AuthError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub fn store(&self, key: &str) -> Result<(), AuthError> {
        let key = validate_key(key)?;
        self.entry()?.set_password(&key)?;
        debug!(service = %self.service, "stored API key in keyring");
        Ok(())
    }

    /// Deletes the stored key. Returns false when nothing was stored.
    pub fn remove(&self) -> Result<bool, AuthError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl CredentialSource for KeyringCredentials {
    async fn has_selected_credential(&self) -> bool {
        matches!(self.get(), Ok(Some(_)))
    }

    async fn select_credential(&self) -> Result<Option<String>, AuthError> {
        self.get()
    }
}

/// Asks for a key on the terminal and saves it to the keyring.
pub struct PromptCredentials {
    keyring: KeyringCredentials,
}

impl PromptCredentials {
    pub fn new(keyring: KeyringCredentials) -> Self {
        Self { keyring }
    }
}

#[async_trait]
impl CredentialSource for PromptCredentials {
    async fn has_selected_credential(&self) -> bool {
        false
    }

    async fn select_credential(&self) -> Result<Option<String>, AuthError> {
        let raw = tokio::task::spawn_blocking(prompt_api_key)
            .await
            .map_err(|err| AuthError::Io(std::io::Error::other(err)))?
            .map_err(AuthError::Io)?;
        let key = validate_key(&raw)?;
        self.keyring.store(&key)?;
        Ok(Some(key))
    }
}

/// Tries each source in order.
#[derive(Default)]
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    /// Environment first, then the keyring.
    pub fn standard() -> Self {
        Self::default()
            .with(EnvCredentials::new())
            .with(KeyringCredentials::new())
    }

    pub fn with(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

#[async_trait]
impl CredentialSource for CredentialChain {
    async fn has_selected_credential(&self) -> bool {
        for source in &self.sources {
            if source.has_selected_credential().await {
                return true;
            }
        }
        false
    }

    async fn select_credential(&self) -> Result<Option<String>, AuthError> {
        for source in &self.sources {
            if !source.has_selected_credential().await {
                continue;
            }
            match source.select_credential().await {
                Ok(Some(key)) => return Ok(Some(key)),
                Ok(None) => continue,
                Err(err) if err.is_recoverable() => {
                    warn!(error = %err, "credential source unavailable, trying next");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }
}

/// Resolves a credential without prompting. `None` means the key screen
/// has to be shown.
pub async fn resolve_credential(source: &dyn CredentialSource) -> Option<String> {
    if !source.has_selected_credential().await {
        return None;
    }
    match source.select_credential().await {
        Ok(key) => key,
        Err(err) => {
            warn!(error = %err, "failed to read stored credential");
            None
        }
    }
}
