//! Authentication session collaborator.
//!
//! The dashboard never performs authentication itself; it only needs
//! to know whether a user is currently signed in (gating favorite
//! creation) and to hear about session changes. `SessionProvider` is
//! an explicit object handed to the components that need it rather
//! than ambient global state.

use tokio::sync::watch;

/// An authenticated user session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Backend user id; favorites are owned by this user.
    pub user_id: String,

    /// Bearer token presented to the storage backend.
    pub access_token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }
}

/// Holds the current session and notifies subscribers when it changes.
#[derive(Debug, Clone)]
pub struct SessionProvider {
    tx: watch::Sender<Option<Session>>,
}

impl SessionProvider {
    /// Create a provider with no session (signed out).
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Create a provider with an already-established session.
    pub fn with_session(session: Session) -> Self {
        let (tx, _rx) = watch::channel(Some(session));
        Self { tx }
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Whether a user is currently signed in.
    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Replace the current session.
    pub fn sign_in(&self, session: Session) {
        self.tx.send_replace(Some(session));
    }

    /// Clear the current session.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }

    /// Subscribe to session changes.
    ///
    /// The receiver observes every sign-in and sign-out; the favorites
    /// list is re-synced on these transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

impl Default for SessionProvider {
    fn default() -> Self {
        Self::new()
    }
}
