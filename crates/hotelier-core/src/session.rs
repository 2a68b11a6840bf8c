// ── Session service ──
//
// Wraps the account endpoints and caches the signed-in user. A 401 from
// any call clears the bearer token (done by the API client) and is
// surfaced here as `AuthEvent::LoginRequired`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use hotelier_api::{ApiClient, TokenState};
use secrecy::SecretString;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedOut,
    SignedIn,
    /// The server rejected the token; send the user to the login view.
    LoginRequired,
}

/// Where a user lands after signing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingView {
    Admin,
    Reception,
    MyBookings,
}

impl LandingView {
    pub fn path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Reception => "/reception",
            Self::MyBookings => "/my-bookings",
        }
    }
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: ApiClient,
    user: ArcSwapOption<User>,
    events: watch::Sender<AuthEvent>,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        let (events, _) = watch::channel(AuthEvent::SignedOut);
        Self {
            inner: Arc::new(SessionInner {
                client,
                user: ArcSwapOption::empty(),
                events,
            }),
        }
    }

    // ── Account operations ───────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        let outcome = self.inner.client.login(email, password).await?;
        Ok(self.signed_in(User::from(outcome.user)))
    }

    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
        full_name: &str,
    ) -> Result<User, CoreError> {
        let outcome = self.inner.client.register(email, password, full_name).await?;
        Ok(self.signed_in(User::from(outcome.user)))
    }

    /// Fetch the user behind the current token and cache it.
    pub async fn current_user(&self) -> Result<User, CoreError> {
        let record = self
            .observe(self.inner.client.current_user().await.map_err(CoreError::from))?;
        Ok(self.signed_in(User::from(record)))
    }

    /// Resume with a token issued earlier (e.g. read from the keyring).
    pub async fn restore(&self, token: SecretString) -> Result<User, CoreError> {
        self.inner.client.tokens().set(token);
        self.current_user().await
    }

    /// Client-side only: the token is forgotten, nothing is sent.
    pub fn logout(&self) {
        self.inner.client.logout();
        self.inner.user.store(None);
        self.inner.events.send_replace(AuthEvent::SignedOut);
        info!("signed out");
    }

    // ── State ────────────────────────────────────────────────────────

    pub fn user(&self) -> Option<User> {
        self.inner.user.load_full().map(|u| User::clone(&u))
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.client.tokens().is_present()
    }

    /// The bearer token, for persisting between runs.
    pub fn token(&self) -> Option<SecretString> {
        self.inner.client.tokens().token()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.inner.user.load_full().is_some_and(|u| u.has_role(role))
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.inner.user.load_full().is_some_and(|u| u.has_any_role(roles))
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.inner
            .user
            .load_full()
            .is_some_and(|u| u.has_permission(permission))
    }

    /// Landing view for the signed-in user; `None` when signed out.
    pub fn landing_view(&self) -> Option<LandingView> {
        self.inner.user.load_full().map(|u| match u.primary_role() {
            Role::Admin => LandingView::Admin,
            Role::Receptionist => LandingView::Reception,
            Role::Guest => LandingView::MyBookings,
        })
    }

    pub fn events(&self) -> watch::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }

    // ── 401 handling ─────────────────────────────────────────────────

    /// Pass a result through, turning `LoginRequired` into an event.
    pub fn observe<T>(&self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if matches!(result, Err(CoreError::LoginRequired)) {
            self.login_required();
        }
        result
    }

    /// Watch the shared token store so that 401s seen by any user of the
    /// API client (the booking flow included) raise `LoginRequired`.
    pub fn spawn_watcher(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let session = self.clone();
        let mut rx = self.inner.client.tokens().subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let state = *rx.borrow_and_update();
                        if state == TokenState::Revoked {
                            session.login_required();
                        }
                    }
                }
            }
            debug!("session watcher stopped");
        })
    }

    fn login_required(&self) {
        self.inner.user.store(None);
        self.inner.events.send_replace(AuthEvent::LoginRequired);
        info!("login required");
    }

    fn signed_in(&self, user: User) -> User {
        debug!(email = %user.email, role = %user.role, "session established");
        self.inner.user.store(Some(Arc::new(user.clone())));
        self.inner.events.send_replace(AuthEvent::SignedIn);
        user
    }
}
