use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use gatehouse_model::{
    CredentialToken, PasswordChange, ProfileUpdate, Role, SecretString, SignupForm, User,
    UserId, UserStatus,
};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::infrastructure::errors::{GatewayError, GatewayResult};
use crate::infrastructure::services::auth::AuthGateway;

/// How many times each gateway operation was invoked
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AuthCalls {
    pub login: usize,
    pub signup: usize,
    pub fetch_current_user: usize,
    pub update_profile: usize,
    pub change_password: usize,
}

#[derive(Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Debug, Default)]
struct InnerAuthState {
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    installed: Option<String>,
    issued: u64,
    calls: AuthCalls,
    fetch_failures: VecDeque<GatewayError>,
    fetch_gates: VecDeque<oneshot::Receiver<()>>,
}

impl InnerAuthState {
    fn issue(&mut self, id: UserId) -> CredentialToken {
        self.issued += 1;
        let token = format!("stub-token-{}", self.issued);
        self.tokens.insert(token.clone(), id);
        CredentialToken::new(token)
    }

    fn account_for_token(&mut self, token: Option<&str>) -> Option<&mut Account> {
        let id = self.tokens.get(token?)?.clone();
        self.accounts.iter_mut().find(|a| a.user.id == id)
    }
}

/// In-memory auth server.
///
/// Tokens are opaque strings minted per login; revoking one makes every
/// later `fetch_current_user` carrying it answer `Unauthorized`.
#[derive(Debug, Clone, Default)]
pub struct StubAuthGateway {
    inner: Arc<Mutex<InnerAuthState>>,
}

impl StubAuthGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, user: User, password: &str) -> Self {
        self.add_account(user, password);
        self
    }

    pub fn add_account(&self, user: User, password: &str) {
        self.inner.lock().accounts.push(Account {
            user,
            password: password.to_string(),
        });
    }

    /// Mint a valid token without going through login
    pub fn issue_token(&self, id: &UserId) -> CredentialToken {
        self.inner.lock().issue(id.clone())
    }

    pub fn revoke(&self, token: &CredentialToken) {
        self.inner.lock().tokens.remove(token.expose_secret());
    }

    /// Change the server-side record of an account
    pub fn update_user(&self, id: &UserId, change: impl FnOnce(&mut User)) {
        let mut inner = self.inner.lock();
        if let Some(account) = inner.accounts.iter_mut().find(|a| &a.user.id == id) {
            change(&mut account.user);
        }
    }

    pub fn user(&self, id: &UserId) -> Option<User> {
        self.inner
            .lock()
            .accounts
            .iter()
            .find(|a| &a.user.id == id)
            .map(|a| a.user.clone())
    }

    pub fn fail_next_fetch(&self, error: GatewayError) {
        self.inner.lock().fetch_failures.push_back(error);
    }

    /// Park the next `fetch_current_user` until the returned sender fires
    /// or is dropped
    pub fn hold_next_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().fetch_gates.push_back(rx);
        tx
    }

    pub fn calls(&self) -> AuthCalls {
        self.inner.lock().calls
    }

    pub fn installed_token(&self) -> Option<String> {
        self.inner.lock().installed.clone()
    }
}

#[async_trait]
impl AuthGateway for StubAuthGateway {
    async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> GatewayResult<CredentialToken> {
        let mut inner = self.inner.lock();
        inner.calls.login += 1;

        let email = email.trim().to_lowercase();
        let (id, active) = inner
            .accounts
            .iter()
            .find(|a| a.user.email == email && a.password == password.expose_secret())
            .map(|a| (a.user.id.clone(), a.user.is_active()))
            .ok_or(GatewayError::InvalidCredentials)?;
        if !active {
            return Err(GatewayError::Forbidden("Account is inactive".into()));
        }
        Ok(inner.issue(id))
    }

    async fn signup(&self, form: &SignupForm) -> GatewayResult<CredentialToken> {
        let mut inner = self.inner.lock();
        inner.calls.signup += 1;

        let email = form.email.trim().to_lowercase();
        if inner.accounts.iter().any(|a| a.user.email == email) {
            return Err(GatewayError::Conflict("Email already exists".into()));
        }
        let id = UserId::new(format!("new-{}", inner.accounts.len() + 1));
        let user = User::new(id.clone(), email, Role::Member, UserStatus::Active)
            .with_full_name(form.full_name.trim());
        inner.accounts.push(Account {
            user,
            password: form.password.expose_secret().to_string(),
        });
        Ok(inner.issue(id))
    }

    async fn fetch_current_user(&self) -> GatewayResult<User> {
        // The token is captured when the request goes out, not when it lands
        let (token, gate) = {
            let mut inner = self.inner.lock();
            inner.calls.fetch_current_user += 1;
            (inner.installed.clone(), inner.fetch_gates.pop_front())
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut inner = self.inner.lock();
        if let Some(error) = inner.fetch_failures.pop_front() {
            return Err(error);
        }
        inner
            .account_for_token(token.as_deref())
            .map(|a| a.user.clone())
            .ok_or(GatewayError::Unauthorized)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> GatewayResult<User> {
        let mut inner = self.inner.lock();
        inner.calls.update_profile += 1;

        let token = inner.installed.clone();
        let email = update.email.trim().to_lowercase();
        let current = inner
            .account_for_token(token.as_deref())
            .map(|a| a.user.id.clone())
            .ok_or(GatewayError::Unauthorized)?;
        if inner
            .accounts
            .iter()
            .any(|a| a.user.email == email && a.user.id != current)
        {
            return Err(GatewayError::Conflict("Email already in use".into()));
        }

        let account = inner
            .account_for_token(token.as_deref())
            .ok_or(GatewayError::Unauthorized)?;
        account.user.email = email;
        account.user.full_name = Some(update.full_name.trim().to_string());
        Ok(account.user.clone())
    }

    async fn change_password(&self, change: &PasswordChange) -> GatewayResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.change_password += 1;

        let token = inner.installed.clone();
        let account = inner
            .account_for_token(token.as_deref())
            .ok_or(GatewayError::Unauthorized)?;
        if account.password != change.current_password.expose_secret() {
            return Err(GatewayError::InvalidCurrentPassword);
        }
        account.password = change.new_password.expose_secret().to_string();
        Ok(())
    }

    async fn set_token(&self, token: Option<CredentialToken>) {
        self.inner.lock().installed = token.map(|t| t.expose_secret().to_string());
    }
}
