//! Access credentials and providers.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// An immutable credential set.
///
/// Cloning is cheap enough for the signing hot path; the secret never
/// appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Public access key identifier.
    pub access_key_id: String,
    /// Secret used to derive signing keys. Never logged.
    pub access_key_secret: String,
    /// STS session token, when the credentials are temporary.
    pub security_token: Option<String>,
}

impl Credentials {
    /// Creates long-lived credentials without a session token.
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            security_token: None,
        }
    }

    /// Attaches an STS session token.
    #[must_use]
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .field("security_token", &self.security_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Source of credentials for a signer.
pub trait CredentialsProvider: Send + Sync + fmt::Debug {
    /// Returns the current credential set.
    fn credentials(&self) -> Credentials;

    /// Returns the current access key id without cloning the secret.
    fn access_key_id(&self) -> String {
        self.credentials().access_key_id
    }
}

/// Provider holding a fixed credential set.
#[derive(Debug, Clone)]
pub struct StaticCredentialsProvider {
    credentials: Credentials,
}

impl StaticCredentialsProvider {
    /// Wraps a fixed credential set.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentialsProvider {
    fn credentials(&self) -> Credentials {
        self.credentials.clone()
    }
}

/// Provider whose credentials can be swapped at runtime, e.g. when an STS
/// token is refreshed. Readers always observe a complete old or new set,
/// never a torn mix.
#[derive(Debug, Clone)]
pub struct RotatingCredentialsProvider {
    inner: Arc<RwLock<Credentials>>,
}

impl RotatingCredentialsProvider {
    /// Wraps an initial credential set.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credentials)),
        }
    }

    /// Atomically replaces the whole credential set.
    pub fn set(&self, credentials: Credentials) {
        *self.inner.write() = credentials;
    }
}

impl CredentialsProvider for RotatingCredentialsProvider {
    fn credentials(&self) -> Credentials {
        self.inner.read().clone()
    }
}
