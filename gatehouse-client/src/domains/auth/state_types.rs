//! Session state machine types
//!
//! The session is an enum so that "authenticated" and "has a user" cannot
//! disagree: only the `Authenticated` variant carries a user.

use futures::Stream;
use gatehouse_model::{CredentialToken, User, UserId};
use std::sync::Arc;
use tokio::sync::watch;

/// The client's belief about who is logged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Nobody is logged in
    Unauthenticated,

    /// A stored or fresh token is being resolved to a user
    Loading,

    /// Token accepted and the current user resolved
    Authenticated { user: User, token: CredentialToken },

    /// A token was issued but could not be kept; treated as logged out
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Unauthenticated,
    Loading,
    Authenticated,
    Failed,
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        match self {
            Session::Unauthenticated => SessionStatus::Unauthenticated,
            Session::Loading => SessionStatus::Loading,
            Session::Authenticated { .. } => SessionStatus::Authenticated,
            Session::Failed { .. } => SessionStatus::Failed,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Loading)
    }

    /// Get the current user if authenticated
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user().map(|user| &user.id)
    }

    pub fn token(&self) -> Option<&CredentialToken> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }
}

/// Session store built on a watch channel
///
/// Readers borrow the latest value without locking. Only the
/// `SessionController` holds the store; everyone else gets a
/// [`SessionWatch`].
#[derive(Clone, Debug)]
pub struct SessionStore {
    sender: Arc<watch::Sender<Session>>,
    receiver: watch::Receiver<Session>,
}

impl SessionStore {
    pub fn new(initial: Session) -> Self {
        let (sender, receiver) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn current(&self) -> Session {
        self.receiver.borrow().clone()
    }

    /// Access state without cloning
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        f(&self.receiver.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.receiver.clone()
    }

    pub fn watch(&self) -> SessionWatch {
        SessionWatch {
            receiver: self.receiver.clone(),
        }
    }

    pub fn set(&self, session: Session) {
        // send_replace never fails, even with no receivers left
        self.sender.send_replace(session);
    }

    pub fn logout(&self) {
        self.set(Session::Unauthenticated);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Session::Unauthenticated)
    }
}

/// Read-only view of the session for consumers other than the controller
#[derive(Clone, Debug)]
pub struct SessionWatch {
    receiver: watch::Receiver<Session>,
}

impl SessionWatch {
    pub fn current(&self) -> Session {
        self.receiver.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.receiver.borrow().status()
    }

    pub fn current_user(&self) -> Option<User> {
        self.receiver.borrow().user().cloned()
    }

    pub fn current_user_id(&self) -> Option<UserId> {
        self.receiver.borrow().user_id().cloned()
    }

    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        f(&self.receiver.borrow())
    }

    /// Wait for the next session change
    pub async fn changed(&mut self) -> Option<Session> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Every session change from now on, for UI subscriptions
    ///
    /// Intermediate values may be skipped when several changes land before
    /// the stream is polled; the latest one is always delivered.
    pub fn into_stream(self) -> impl Stream<Item = Session> + Send + 'static {
        futures::stream::unfold(self, |mut watch| async move {
            let session = watch.changed().await?;
            Some((session, watch))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_model::{Role, UserStatus};

    fn admin() -> User {
        User::new("u1", "admin@example.com", Role::Admin, UserStatus::Active)
    }

    #[test]
    fn only_authenticated_carries_a_user() {
        let sessions = [
            Session::Unauthenticated,
            Session::Loading,
            Session::Failed {
                reason: "disk full".into(),
            },
            Session::Authenticated {
                user: admin(),
                token: CredentialToken::new("t"),
            },
        ];

        for session in sessions {
            assert_eq!(
                session.status() == SessionStatus::Authenticated,
                session.user().is_some()
            );
            assert_eq!(session.is_authenticated(), session.token().is_some());
        }
    }

    #[test]
    fn watch_sees_store_updates() {
        let store = SessionStore::new(Session::Loading);
        let watch = store.watch();
        assert_eq!(watch.status(), SessionStatus::Loading);

        store.set(Session::Authenticated {
            user: admin(),
            token: CredentialToken::new("t"),
        });
        assert_eq!(watch.current_user_id(), Some(UserId::new("u1")));

        store.logout();
        assert_eq!(watch.current_user(), None);
    }

    #[tokio::test]
    async fn changed_yields_the_new_session() {
        let store = SessionStore::new(Session::Loading);
        let mut watch = store.watch();

        store.logout();
        assert_eq!(watch.changed().await, Some(Session::Unauthenticated));
    }

    #[tokio::test]
    async fn stream_ends_when_the_store_is_dropped() {
        use futures::StreamExt;

        let store = SessionStore::new(Session::Loading);
        let mut changes = Box::pin(store.watch().into_stream());

        store.logout();
        assert_eq!(changes.next().await, Some(Session::Unauthenticated));

        drop(store);
        assert_eq!(changes.next().await, None);
    }
}
