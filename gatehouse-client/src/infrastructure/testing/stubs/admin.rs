use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use gatehouse_model::{BulkAction, PageResult, Role, User, UserId, UserQuery, UserStatus};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::infrastructure::errors::{GatewayError, GatewayResult};
use crate::infrastructure::services::admin::AdminGateway;

/// One request as the stub received it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCall {
    ListUsers(UserQuery),
    SetStatus(UserId, UserStatus),
    SetRole(UserId, Role),
    BulkSetStatus(Vec<UserId>, BulkAction),
}

impl AdminCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, AdminCall::ListUsers(_))
    }
}

#[derive(Debug, Default)]
struct InnerAdminState {
    users: Vec<User>,
    calls: Vec<AdminCall>,
    list_failures: VecDeque<GatewayError>,
    mutation_failures: VecDeque<GatewayError>,
    list_gates: VecDeque<oneshot::Receiver<()>>,
}

impl InnerAdminState {
    fn page(&self, query: &UserQuery) -> PageResult {
        let needle = query.email_filter.trim().to_lowercase();
        let matching: Vec<&User> = self
            .users
            .iter()
            .filter(|u| needle.is_empty() || u.email.to_lowercase().contains(&needle))
            .filter(|u| query.status_filter.is_none_or(|s| u.status == s))
            .filter(|u| query.role_filter.is_none_or(|r| u.role == r))
            .collect();

        let size = query.page_size.max(1) as usize;
        let skip = (query.page.max(1) as usize - 1) * size;
        let items = matching.iter().skip(skip).take(size).map(|u| (*u).clone()).collect();
        PageResult::new(items, matching.len() as u64)
    }

    fn user_mut(&mut self, id: &UserId) -> GatewayResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| GatewayError::NotFound("User not found".into()))
    }
}

/// In-memory user directory that filters, pages and mutates like the server
#[derive(Debug, Clone, Default)]
pub struct StubAdminGateway {
    inner: Arc<Mutex<InnerAdminState>>,
}

impl StubAdminGateway {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InnerAdminState {
                users,
                ..Default::default()
            })),
        }
    }

    pub fn users(&self) -> Vec<User> {
        self.inner.lock().users.clone()
    }

    pub fn user(&self, id: &UserId) -> Option<User> {
        self.inner.lock().users.iter().find(|u| &u.id == id).cloned()
    }

    pub fn calls(&self) -> Vec<AdminCall> {
        self.inner.lock().calls.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.inner.lock().calls.iter().filter(|c| !c.is_mutation()).count()
    }

    pub fn mutation_calls(&self) -> usize {
        self.inner.lock().calls.iter().filter(|c| c.is_mutation()).count()
    }

    pub fn fail_next_list(&self, error: GatewayError) {
        self.inner.lock().list_failures.push_back(error);
    }

    pub fn fail_next_mutation(&self, error: GatewayError) {
        self.inner.lock().mutation_failures.push_back(error);
    }

    /// Park the next `list_users` until the returned sender fires or is
    /// dropped. The page is computed when the call arrives.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().list_gates.push_back(rx);
        tx
    }
}

#[async_trait]
impl AdminGateway for StubAdminGateway {
    async fn list_users(&self, query: &UserQuery) -> GatewayResult<PageResult> {
        let (result, gate) = {
            let mut inner = self.inner.lock();
            inner.calls.push(AdminCall::ListUsers(query.clone()));
            let result = match inner.list_failures.pop_front() {
                Some(error) => Err(error),
                None => Ok(inner.page(query)),
            };
            (result, inner.list_gates.pop_front())
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn set_status(&self, id: &UserId, status: UserStatus) -> GatewayResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(AdminCall::SetStatus(id.clone(), status));
        if let Some(error) = inner.mutation_failures.pop_front() {
            return Err(error);
        }
        inner.user_mut(id)?.status = status;
        Ok(())
    }

    async fn set_role(&self, id: &UserId, role: Role) -> GatewayResult<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(AdminCall::SetRole(id.clone(), role));
        if let Some(error) = inner.mutation_failures.pop_front() {
            return Err(error);
        }
        inner.user_mut(id)?.role = role;
        Ok(())
    }

    async fn bulk_set_status(&self, ids: &[UserId], action: BulkAction) -> GatewayResult<()> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(AdminCall::BulkSetStatus(ids.to_vec(), action));
        if let Some(error) = inner.mutation_failures.pop_front() {
            return Err(error);
        }

        let mut missing = 0;
        for id in ids {
            match inner.user_mut(id) {
                Ok(user) => user.status = action.target_status(),
                Err(_) => missing += 1,
            }
        }
        if missing > 0 {
            return Err(GatewayError::PartialFailure(format!(
                "{missing} of {} users could not be updated",
                ids.len()
            )));
        }
        Ok(())
    }
}
