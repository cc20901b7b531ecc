//! Session controller
//!
//! Sole writer of the [`Session`]. Combines the credential store and the
//! auth gateway into one state machine:
//!
//! ```text
//! Loading ──(token resolves)──────────► Authenticated
//!    │                                        │
//!    └──(no token / fetch fails)──► Unauthenticated ◄──(logout / fetch fails)
//! ```
//!
//! Every user fetch is tagged with a generation. Only the newest generation
//! may publish its result, and `logout` bumps the generation so an in-flight
//! fetch cannot bring a torn-down session back. Writes to the credential
//! store and the gateway's token slot are serialized and re-check the
//! generation once they hold the lock, so a superseded teardown can never
//! delete the token a newer login just saved.

use gatehouse_model::{
    CredentialToken, PasswordChange, ProfileUpdate, SecretString, SignupForm, User,
};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, watch};

use super::errors::{AuthError, AuthResult};
use super::policy::{AccessPolicy, Requirement, Verdict};
use super::state_types::{Session, SessionStatus, SessionStore, SessionWatch};
use super::storage::CredentialStore;
use crate::infrastructure::services::auth::AuthGateway;

pub struct SessionController {
    gateway: Arc<dyn AuthGateway>,
    credentials: Arc<dyn CredentialStore>,
    store: SessionStore,
    generation: AtomicU64,
    credential_lock: Mutex<()>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("status", &self.status())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

impl SessionController {
    /// The session starts out `Loading` until [`initialize`](Self::initialize)
    /// has looked for a stored token, so guards hold instead of redirecting.
    pub fn new(
        gateway: Arc<dyn AuthGateway>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            gateway,
            credentials,
            store: SessionStore::new(Session::Loading),
            generation: AtomicU64::new(0),
            credential_lock: Mutex::new(()),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.store.current()
    }

    pub fn status(&self) -> SessionStatus {
        self.store.with_state(Session::status)
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.with_state(|session| session.user().cloned())
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.store.subscribe()
    }

    /// Read-only handle for guards and other controllers
    pub fn watch(&self) -> SessionWatch {
        self.store.watch()
    }

    pub fn decide(&self, requirement: Requirement) -> Verdict {
        self.store
            .with_state(|session| AccessPolicy::new(session).decide(requirement))
    }

    /// Restore the session from the credential store
    ///
    /// Issues at most one network call: none when no token is stored.
    pub async fn initialize(&self) -> AuthResult<SessionStatus> {
        let generation = self.next_generation();

        let stored = match self.credentials.load().await {
            Ok(stored) => stored,
            Err(err) => {
                warn!("[SessionController] Could not read stored credential: {}", err);
                self.publish(generation, Session::Unauthenticated);
                return Err(err.into());
            }
        };

        match stored {
            Some(token) => {
                debug!("[SessionController] Found stored credential, validating");
                {
                    let _guard = self.credential_lock.lock().await;
                    if !self.is_current(generation) {
                        return Ok(self.status());
                    }
                    self.gateway.set_token(Some(token.clone())).await;
                    self.publish(generation, Session::Loading);
                }
                self.resolve_user(generation, token).await
            }
            None => {
                debug!("[SessionController] No stored credential");
                self.publish(generation, Session::Unauthenticated);
                Ok(SessionStatus::Unauthenticated)
            }
        }
    }

    /// Log in with email and password
    ///
    /// A rejected login leaves the session exactly as it was.
    pub async fn login(
        &self,
        email: &str,
        password: impl Into<SecretString>,
    ) -> AuthResult<User> {
        let password = password.into();
        let token = self.gateway.login(email, &password).await.map_err(|err| {
            info!("[SessionController] Login rejected: {}", err);
            AuthError::from(err)
        })?;

        self.establish(token).await
    }

    /// Register a new account and log straight into it
    pub async fn signup(&self, form: SignupForm) -> AuthResult<User> {
        form.validate()?;

        let token = self.gateway.signup(&form).await.map_err(|err| {
            info!("[SessionController] Signup rejected: {}", err);
            AuthError::from(err)
        })?;

        self.establish(token).await
    }

    /// Drop the session; never fails
    pub async fn logout(&self) {
        let generation = self.next_generation();
        self.teardown(generation).await;
        info!("[SessionController] Logged out");
    }

    /// Re-resolve the current user against the existing token
    pub async fn refresh(&self) -> AuthResult<SessionStatus> {
        let Some(token) = self.store.with_state(|session| session.token().cloned()) else {
            return Err(AuthError::NotAuthenticated);
        };

        let generation = self.next_generation();
        self.resolve_user(generation, token).await
    }

    /// Edit the signed-in user's own name and email
    pub async fn update_profile(&self, update: ProfileUpdate) -> AuthResult<User> {
        self.require_authenticated()?;
        update.validate()?;

        self.gateway.update_profile(&update).await?;
        info!("[SessionController] Profile updated");

        self.refresh().await?;
        self.current_user().ok_or(AuthError::NotAuthenticated)
    }

    /// Change the password; the session ends on success
    pub async fn change_password(&self, change: PasswordChange) -> AuthResult<()> {
        self.require_authenticated()?;
        change.validate()?;

        self.gateway.change_password(&change).await?;
        info!("[SessionController] Password changed, signing out");

        self.logout().await;
        Ok(())
    }

    /// Persist a freshly issued token, then resolve its user
    ///
    /// A login overtaken by a later login or logout before its token is
    /// saved persists nothing and reports `NotAuthenticated`.
    async fn establish(&self, token: CredentialToken) -> AuthResult<User> {
        let generation = self.next_generation();

        let guard = self.credential_lock.lock().await;
        if !self.is_current(generation) {
            debug!("[SessionController] Login superseded before its token was saved");
            return Err(AuthError::NotAuthenticated);
        }

        if let Err(err) = self.credentials.save(&token).await {
            error!("[SessionController] Could not persist credential: {}", err);
            self.gateway.set_token(None).await;
            self.publish(
                generation,
                Session::Failed {
                    reason: err.to_string(),
                },
            );
            return Err(err.into());
        }

        self.gateway.set_token(Some(token.clone())).await;
        self.publish(generation, Session::Loading);
        drop(guard);

        self.resolve_user(generation, token).await?;
        self.current_user().ok_or(AuthError::NotAuthenticated)
    }

    /// Fetch the current user and publish the outcome if still current
    async fn resolve_user(
        &self,
        generation: u64,
        token: CredentialToken,
    ) -> AuthResult<SessionStatus> {
        let result = self.gateway.fetch_current_user().await;

        if !self.is_current(generation) {
            debug!(
                "[SessionController] Discarding superseded user fetch (generation {})",
                generation
            );
            return Ok(self.status());
        }

        match result {
            Ok(user) => {
                info!("[SessionController] Authenticated as {}", user.email);
                self.publish(generation, Session::Authenticated { user, token });
                Ok(SessionStatus::Authenticated)
            }
            Err(err) => {
                warn!("[SessionController] Session validation failed: {}", err);
                self.teardown(generation).await;
                Err(err.into())
            }
        }
    }

    async fn teardown(&self, generation: u64) {
        let _guard = self.credential_lock.lock().await;
        if !self.is_current(generation) {
            debug!(
                "[SessionController] Skipping superseded teardown (generation {})",
                generation
            );
            return;
        }

        self.gateway.set_token(None).await;
        if let Err(err) = self.credentials.clear().await {
            warn!("[SessionController] Failed to clear stored credential: {}", err);
        }
        self.publish(generation, Session::Unauthenticated);
    }

    fn require_authenticated(&self) -> AuthResult<()> {
        if self.store.with_state(Session::is_authenticated) {
            Ok(())
        } else {
            Err(AuthError::NotAuthenticated)
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn publish(&self, generation: u64, session: Session) {
        if self.is_current(generation) {
            self.store.set(session);
        }
    }
}
