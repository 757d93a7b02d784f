//! Credential storage capability.

use parking_lot::RwLock;

/// Holds the authentication token the client relays on every exchange.
///
/// The client never inspects the token; it reads it before sending and
/// replaces it when a successful response carries a fresh one. Overlapping
/// requests write in completion order, last write wins.
pub trait CredentialStore: Send + Sync {
    /// Current token, if any.
    fn get_token(&self) -> Option<String>;

    /// Replace the stored token.
    fn set_token(&self, token: String);
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Forget the stored token.
    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get_token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set_token(&self, token: String) {
        *self.token.write() = Some(token);
    }
}
