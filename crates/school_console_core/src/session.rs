//! crates/school_console_core/src/session.rs
//!
//! The explicit session context: one place that owns the bearer token and
//! one event for "session expired". Gateway adapters read the token fresh at
//! call time; screens subscribe to the status channel instead of poking at
//! ambient storage.

use std::sync::RwLock;
use tokio::sync::watch;

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token held; the login screen is the only usable surface.
    SignedOut,
    /// A bearer token is held and presumed valid.
    Active,
    /// The server answered 401; every screen must fall back to login.
    Expired,
}

/// Shared session state, created once at startup and injected into the
/// gateway adapter and every screen.
pub struct SessionContext {
    token: RwLock<Option<String>>,
    status_tx: watch::Sender<SessionStatus>,
}

impl SessionContext {
    pub fn new() -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::SignedOut);
        Self {
            token: RwLock::new(None),
            status_tx,
        }
    }

    /// The single update path: called by the auth adapter after a successful
    /// login.
    pub fn sign_in(&self, token: String) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
        // send_replace: the status must move even with no subscribers.
        self.status_tx.send_replace(SessionStatus::Active);
    }

    /// Voluntary logout: token dropped, status back to signed-out.
    pub fn sign_out(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.status_tx.send_replace(SessionStatus::SignedOut);
    }

    /// Forced logout on a 401. Clears the token and broadcasts `Expired` so
    /// every subscribed screen abandons its state uniformly.
    pub fn expire(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.status_tx.send_replace(SessionStatus::Expired);
    }

    /// Current token, read fresh at call time — never capture this in a
    /// long-lived closure.
    pub fn bearer_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn status(&self) -> SessionStatus {
        *self.status_tx.borrow()
    }

    /// Subscribe to status changes (the "session expired" event the UI
    /// listens on).
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_read_fresh_after_updates() {
        let session = SessionContext::new();
        assert_eq!(session.bearer_token(), None);
        assert_eq!(session.status(), SessionStatus::SignedOut);

        session.sign_in("tok-1".to_string());
        assert_eq!(session.bearer_token().as_deref(), Some("tok-1"));
        assert_eq!(session.status(), SessionStatus::Active);

        session.sign_in("tok-2".to_string());
        assert_eq!(session.bearer_token().as_deref(), Some("tok-2"));
    }

    #[test]
    fn expire_clears_token_and_broadcasts() {
        let session = SessionContext::new();
        session.sign_in("tok".to_string());
        let mut rx = session.subscribe();

        session.expire();
        assert_eq!(session.bearer_token(), None);
        assert_eq!(session.status(), SessionStatus::Expired);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SessionStatus::Expired);
    }
}
