// Bearer token storage shared between the API client and its owners.
//
// The client reads the token on every request and revokes it when the
// server answers 401; session logic in core subscribes to the state
// channel to learn about revocations.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::debug;

/// Observable lifecycle of the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// No token has been set, or it was cleared by an explicit logout.
    Absent,
    /// A token is held and attached to authenticated calls.
    Present,
    /// The server rejected the token (HTTP 401); it has been dropped.
    Revoked,
}

/// Cheaply cloneable handle to the current bearer token.
///
/// All clones share the same slot, so a token set through one handle is
/// visible to every client built with another.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<TokenInner>,
}

struct TokenInner {
    token: RwLock<Option<SecretString>>,
    state: watch::Sender<TokenState>,
}

impl TokenStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(TokenState::Absent);
        Self {
            inner: Arc::new(TokenInner {
                token: RwLock::new(None),
                state,
            }),
        }
    }

    /// Store a freshly issued token.
    pub fn set(&self, token: SecretString) {
        debug!("storing bearer token");
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
        self.inner.state.send_replace(TokenState::Present);
    }

    /// Drop the token on explicit logout.
    pub fn clear(&self) {
        self.take();
        self.inner.state.send_replace(TokenState::Absent);
    }

    /// Drop the token because the server rejected it.
    pub(crate) fn revoke(&self) {
        if self.take() {
            debug!("bearer token revoked after 401");
        }
        self.inner.state.send_replace(TokenState::Revoked);
    }

    /// The current token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_present(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn state(&self) -> TokenState {
        *self.inner.state.borrow()
    }

    /// Subscribe to token state changes.
    pub fn subscribe(&self) -> watch::Receiver<TokenState> {
        self.inner.state.subscribe()
    }

    fn take(&self) -> bool {
        self.inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn clones_share_the_same_slot() {
        let a = TokenStore::new();
        let b = a.clone();
        a.set(SecretString::from("abc".to_string()));

        assert!(b.is_present());
        assert_eq!(b.token().map(|t| t.expose_secret().to_owned()), Some("abc".into()));
        assert_eq!(b.state(), TokenState::Present);
    }

    #[test]
    fn revoke_differs_from_logout() {
        let store = TokenStore::new();
        store.set(SecretString::from("abc".to_string()));
        store.revoke();
        assert!(!store.is_present());
        assert_eq!(store.state(), TokenState::Revoked);

        store.set(SecretString::from("def".to_string()));
        store.clear();
        assert_eq!(store.state(), TokenState::Absent);
    }

    #[test]
    fn subscribers_see_revocation() {
        let store = TokenStore::new();
        let mut rx = store.subscribe();
        store.set(SecretString::from("abc".to_string()));
        store.revoke();
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), TokenState::Revoked);
    }
}
