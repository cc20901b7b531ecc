//! Admin user-collection controller
//!
//! Owns the listing query, the loaded page and the selection. Mutations are
//! never applied locally: each successful one is followed by a fresh fetch so
//! rows and page counts always reflect the server.
//!
//! Fetches are numbered. When several are in flight only the most recently
//! issued one may replace the page; older responses are dropped.

use gatehouse_model::query::{clamp_page_size, total_pages};
use gatehouse_model::{BulkAction, Role, User, UserFilter, UserId, UserQuery, UserStatus};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::errors::{AdminError, AdminResult};
use super::selection::SelectionSet;
use crate::domains::auth::SessionWatch;
use crate::infrastructure::errors::GatewayError;
use crate::infrastructure::services::admin::AdminGateway;
use crate::infrastructure::services::feedback::{ConfirmPrompt, Confirmation, Notice, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the loaded page
    Applied { total_count: u64 },
    /// A newer fetch was issued meanwhile; this response was dropped
    Superseded,
}

/// Snapshot of the collection for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionView {
    pub query: UserQuery,
    pub items: Vec<User>,
    pub total_count: u64,
    pub total_pages: u64,
    pub selection: SelectionSet,
    pub loading: bool,
    /// Active rows on this page only, not across the population
    pub active_on_page: usize,
    /// Admin rows on this page only, not across the population
    pub admins_on_page: usize,
    pub last_error: Option<GatewayError>,
}

#[derive(Debug, Default)]
struct CollectionState {
    query: UserQuery,
    items: Vec<User>,
    total_count: u64,
    selection: SelectionSet,
    loading: bool,
    last_error: Option<GatewayError>,
}

impl CollectionState {
    fn total_pages(&self) -> u64 {
        total_pages(self.total_count, self.query.page_size)
    }
}

pub struct UserCollectionController {
    gateway: Arc<dyn AdminGateway>,
    session: SessionWatch,
    confirmation: Arc<dyn Confirmation>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<CollectionState>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for UserCollectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("UserCollectionController")
            .field("query", &state.query)
            .field("items", &state.items.len())
            .field("total_count", &state.total_count)
            .field("selected", &state.selection.len())
            .finish()
    }
}

impl UserCollectionController {
    pub fn new(
        gateway: Arc<dyn AdminGateway>,
        session: SessionWatch,
        confirmation: Arc<dyn Confirmation>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            session,
            confirmation,
            notifier,
            state: Mutex::new(CollectionState::default()),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn with_page_size(self, page_size: u32) -> Self {
        self.state.lock().query.page_size = clamp_page_size(page_size);
        self
    }

    pub fn view(&self) -> CollectionView {
        let state = self.state.lock();
        CollectionView {
            query: state.query.clone(),
            items: state.items.clone(),
            total_count: state.total_count,
            total_pages: state.total_pages(),
            selection: state.selection.clone(),
            loading: state.loading,
            active_on_page: count_active(&state.items),
            admins_on_page: count_admins(&state.items),
            last_error: state.last_error.clone(),
        }
    }

    pub fn query(&self) -> UserQuery {
        self.state.lock().query.clone()
    }

    pub fn items(&self) -> Vec<User> {
        self.state.lock().items.clone()
    }

    pub fn total_count(&self) -> u64 {
        self.state.lock().total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.state.lock().total_pages()
    }

    pub fn selection(&self) -> SelectionSet {
        self.state.lock().selection.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Active users on the loaded page
    pub fn active_count(&self) -> usize {
        count_active(&self.state.lock().items)
    }

    /// Admins on the loaded page
    pub fn admin_count(&self) -> usize {
        count_admins(&self.state.lock().items)
    }

    /// Change one filter; the caller decides when to fetch
    pub fn set_filter(&self, filter: UserFilter) {
        self.state.lock().query.apply_filter(filter);
    }

    /// Move to `page`, clamped to the known page range; returns the page used
    pub fn set_page(&self, page: u32) -> u32 {
        let mut state = self.state.lock();
        let last = state.total_pages().max(1);
        let clamped = u64::from(page).clamp(1, last);
        state.query.page = u32::try_from(clamped).unwrap_or(u32::MAX);
        state.query.page
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&self, page_size: u32) -> u32 {
        let mut state = self.state.lock();
        state.query.page_size = clamp_page_size(page_size);
        state.query.page = 1;
        state.query.page_size
    }

    /// Load the page described by the current query
    ///
    /// On success the page is replaced and the selection cleared. On failure
    /// the previous rows stay visible.
    pub async fn fetch(&self) -> AdminResult<FetchOutcome> {
        let (sequence, query) = {
            let mut state = self.state.lock();
            state.loading = true;
            let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            (sequence, state.query.clone())
        };

        debug!(
            "[UserCollection] Fetch #{} page {} (size {})",
            sequence, query.page, query.page_size
        );
        let result = self.gateway.list_users(&query).await;

        let error = {
            let mut state = self.state.lock();
            if self.sequence.load(Ordering::SeqCst) != sequence {
                debug!("[UserCollection] Dropping stale response #{}", sequence);
                return Ok(FetchOutcome::Superseded);
            }
            state.loading = false;

            match result {
                Ok(page) => {
                    state.items = page.items;
                    state.total_count = page.total_count;
                    state.selection.clear();
                    state.last_error = None;
                    return Ok(FetchOutcome::Applied {
                        total_count: state.total_count,
                    });
                }
                Err(err) => {
                    state.last_error = Some(err.clone());
                    err
                }
            }
        };

        warn!("[UserCollection] Failed to load users: {}", error);
        self.notifier.notify(Notice::error("Failed to load users"));
        Err(AdminError::ListFailed(error))
    }

    /// Flip selection of one row on the loaded page
    pub fn toggle_select(&self, id: &UserId) -> bool {
        let mut state = self.state.lock();
        let CollectionState {
            items, selection, ..
        } = &mut *state;
        selection.toggle(id, items)
    }

    /// Select the whole page, or clear it if already fully selected
    pub fn toggle_select_all(&self) {
        let mut state = self.state.lock();
        let CollectionState {
            items, selection, ..
        } = &mut *state;
        selection.toggle_all(items);
    }

    pub fn select_all(&self) {
        let mut state = self.state.lock();
        let CollectionState {
            items, selection, ..
        } = &mut *state;
        selection.select_all(items);
    }

    pub fn clear_selection(&self) {
        self.state.lock().selection.clear();
    }

    /// Activate or deactivate one user
    ///
    /// Deactivating your own account is refused before anything is sent.
    pub async fn set_user_status(&self, user: &User, target: UserStatus) -> AdminResult<()> {
        let me = self.current_user_id()?;
        if user.id == me && target == UserStatus::Inactive {
            return Err(self.reject(AdminError::SelfActionForbidden));
        }

        self.confirm(ConfirmPrompt::SetStatus {
            user_id: user.id.clone(),
            target,
        })
        .await?;

        if let Err(err) = self.gateway.set_status(&user.id, target).await {
            return Err(self.reject(err.into()));
        }

        let verb = BulkAction::for_status(target);
        info!("[UserCollection] {} -> {}", user.id, target);
        self.notifier
            .notify(Notice::success(format!("User {}d successfully", verb)));
        self.refetch().await;
        Ok(())
    }

    /// Flip a user between active and inactive
    pub async fn toggle_user_status(&self, user: &User) -> AdminResult<()> {
        self.set_user_status(user, user.status.toggled()).await
    }

    pub async fn set_user_role(&self, id: &UserId, target: Role) -> AdminResult<()> {
        self.current_user_id()?;

        self.confirm(ConfirmPrompt::SetRole {
            user_id: id.clone(),
            target,
        })
        .await?;

        if let Err(err) = self.gateway.set_role(id, target).await {
            return Err(self.reject(err.into()));
        }

        info!("[UserCollection] {} role -> {}", id, target.as_str());
        self.notifier
            .notify(Notice::success(format!("Role updated to {}", target)));
        self.refetch().await;
        Ok(())
    }

    /// Apply `action` to every selected user
    ///
    /// The whole batch is refused when it would deactivate the signed-in
    /// admin; nothing is partially applied.
    pub async fn apply_bulk_action(&self, action: BulkAction) -> AdminResult<()> {
        let ids = self.state.lock().selection.to_vec();
        if ids.is_empty() {
            return Err(self.reject(AdminError::EmptySelection));
        }

        let me = self.current_user_id()?;
        if action == BulkAction::Deactivate && ids.contains(&me) {
            return Err(self.reject(AdminError::SelfActionForbidden));
        }

        self.confirm(ConfirmPrompt::Bulk {
            action,
            count: ids.len(),
        })
        .await?;

        if let Err(err) = self.gateway.bulk_set_status(&ids, action).await {
            return Err(self.reject(err.into()));
        }

        info!("[UserCollection] Bulk {} applied to {} users", action, ids.len());
        self.notifier.notify(Notice::success("Bulk action completed"));
        self.refetch().await;
        Ok(())
    }

    fn current_user_id(&self) -> AdminResult<UserId> {
        self.session
            .current_user_id()
            .ok_or(AdminError::NotAuthenticated)
    }

    async fn confirm(&self, prompt: ConfirmPrompt) -> AdminResult<()> {
        if self.confirmation.confirm(&prompt).await {
            Ok(())
        } else {
            debug!("[UserCollection] Declined: {}", prompt.message());
            Err(AdminError::Cancelled)
        }
    }

    /// Report a failure to the notifier and hand it back
    fn reject(&self, err: AdminError) -> AdminError {
        warn!("[UserCollection] {}", err);
        self.notifier.notify(Notice::error(err.to_string()));
        err
    }

    // The mutation already succeeded; a failed reload is reported by `fetch`
    // and leaves the previous rows on screen.
    async fn refetch(&self) {
        match self.fetch().await {
            Ok(FetchOutcome::Applied { .. }) if self.pull_back_to_last_page() => {
                if let Err(err) = self.fetch().await {
                    debug!("[UserCollection] Reload of last page failed: {}", err);
                }
            }
            Ok(_) => {}
            Err(err) => debug!("[UserCollection] Reload after mutation failed: {}", err),
        }
    }

    /// Move the query back onto the last page when the total shrank below
    /// it; reports whether the page changed
    fn pull_back_to_last_page(&self) -> bool {
        let mut state = self.state.lock();
        let last = state.total_pages().max(1);
        if u64::from(state.query.page) <= last {
            return false;
        }
        state.query.page = u32::try_from(last).unwrap_or(u32::MAX);
        debug!(
            "[UserCollection] Page fell past the end, moving to page {}",
            state.query.page
        );
        true
    }
}

fn count_active(items: &[User]) -> usize {
    items.iter().filter(|user| user.is_active()).count()
}

fn count_admins(items: &[User]) -> usize {
    items.iter().filter(|user| user.is_admin()).count()
}
