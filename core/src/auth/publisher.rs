//! Process-wide auth state.
//!
//! Every view that cares whether someone is signed in reads [`AuthState`]
//! and subscribes to its changes. Nothing else holds a signed-in flag.

use std::sync::{Arc, OnceLock};

use tokio::sync::watch;

use super::{AuthUser, Session};

/// Publisher of "current session, or none".
///
/// Cloning shares the same underlying state.
#[derive(Debug, Clone)]
pub struct AuthState {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// The state shared by the whole process.
    pub fn global() -> &'static AuthState {
        static GLOBAL: OnceLock<AuthState> = OnceLock::new();
        GLOBAL.get_or_init(AuthState::new)
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.tx.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Replace the current session. Subscribers are only woken when the
    /// value actually changes.
    pub fn publish(&self, session: Option<Session>) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
        if changed {
            tracing::debug!(signed_in = self.is_signed_in(), "auth state changed");
        }
        changed
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live subscription. Dropping it (or calling [`unsubscribe`]) ends it.
///
/// [`unsubscribe`]: AuthSubscription::unsubscribe
#[derive(Debug)]
pub struct AuthSubscription {
    rx: watch::Receiver<Option<Session>>,
}

impl AuthSubscription {
    /// Wait for the next change and return the new session.
    ///
    /// Returns `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> Session {
        Session {
            access_token: format!("token-{id}"),
            refresh_token: "refresh".into(),
            expires_at: None,
            user: AuthUser {
                id: id.into(),
                email: Some(format!("{id}@example.com")),
                profile: None,
            },
        }
    }

    #[tokio::test]
    async fn test_subscriber_sees_sign_in_and_out() {
        let state = AuthState::new();
        let mut sub = state.subscribe();
        assert!(!state.is_signed_in());

        assert!(state.publish(Some(session("u1"))));
        assert_eq!(sub.changed().await.unwrap().unwrap().user.id, "u1");

        assert!(state.publish(None));
        assert_eq!(sub.changed().await, Some(None));
        assert!(!state.is_signed_in());
    }

    #[tokio::test]
    async fn test_same_value_does_not_notify() {
        let state = AuthState::new();
        state.publish(Some(session("u1")));
        let mut sub = state.subscribe();
        assert!(!state.publish(Some(session("u1"))));
        state.publish(Some(session("u2")));
        // The first observed change is u2, not a duplicate u1
        assert_eq!(sub.changed().await.unwrap().unwrap().user.id, "u2");
    }

    #[test]
    fn test_unsubscribe_drops_receiver() {
        let state = AuthState::new();
        let a = state.subscribe();
        let b = state.subscribe();
        assert_eq!(state.subscriber_count(), 2);
        a.unsubscribe();
        drop(b);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let state = AuthState::new();
        let view = state.clone();
        state.publish(Some(session("u9")));
        assert_eq!(view.user().unwrap().id, "u9");
        assert_eq!(view.subscribe().current().unwrap().user.id, "u9");
    }

    #[tokio::test]
    async fn test_changed_ends_when_publisher_dropped() {
        let state = AuthState::new();
        let mut sub = state.subscribe();
        drop(state);
        assert_eq!(sub.changed().await, None);
    }
}
