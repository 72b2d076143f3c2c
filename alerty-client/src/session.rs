//! # Session store — explicit login state
//!
//! One session object holds everything the backend hands back at login:
//! the bearer token and the profile fields (username, dni, role, company,
//! user id). Presence implies logged in; there is no other invariant.
//! Created by `BackendClient::login`, read when signing requests, cleared on
//! logout or expiry.

use alerty_core::types::Role;
use parking_lot::RwLock;

/// An authenticated backend session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub dni: Option<String>,
    pub role: Role,
    pub company_id: Option<String>,
    pub user_id: Option<String>,
    /// Unix seconds when the session was established.
    pub issued_at: i64,
}

/// Shared holder for the current session.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly issued session, replacing any previous one.
    pub fn establish(&self, session: Session) {
        *self.inner.write() = Some(session);
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.read().clone()
    }

    /// Token for signing outgoing requests, if logged in.
    pub fn bearer_token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.token.clone())
    }

    pub fn company_id(&self) -> Option<String> {
        self.inner.read().as_ref().and_then(|s| s.company_id.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Logout: drop the session.
    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    pub fn is_expired(&self, ttl_secs: i64, now: i64) -> bool {
        match self.inner.read().as_ref() {
            Some(s) => now - s.issued_at > ttl_secs,
            None => false,
        }
    }

    /// Clear the session if it has outlived `ttl_secs`. Returns whether a
    /// session was dropped.
    pub fn expire_if_stale(&self, ttl_secs: i64, now: i64) -> bool {
        let mut inner = self.inner.write();
        match inner.as_ref() {
            Some(s) if now - s.issued_at > ttl_secs => {
                *inner = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(issued_at: i64) -> Session {
        Session {
            token: "tok".into(),
            username: "maria".into(),
            dni: Some("12345678".into()),
            role: Role::Supervisor,
            company_id: Some("c1".into()),
            user_id: Some("u1".into()),
            issued_at,
        }
    }

    #[test]
    fn test_lifecycle() {
        let store = SessionStore::new();
        assert!(!store.is_logged_in());
        assert!(store.bearer_token().is_none());

        store.establish(session(100));
        assert!(store.is_logged_in());
        assert_eq!(store.bearer_token().as_deref(), Some("tok"));
        assert_eq!(store.company_id().as_deref(), Some("c1"));

        store.clear();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_expiry() {
        let store = SessionStore::new();
        store.establish(session(100));
        assert!(!store.is_expired(50, 140));
        assert!(store.is_expired(50, 200));

        assert!(!store.expire_if_stale(50, 140));
        assert!(store.is_logged_in());
        assert!(store.expire_if_stale(50, 200));
        assert!(!store.is_logged_in());
        // No session: nothing to expire.
        assert!(!store.is_expired(50, 1000));
    }
}
