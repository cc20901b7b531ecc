//! Gatehouse client library
//!
//! Session state machine, route access policy and the admin user-collection
//! controller for the Gatehouse user management API. Rendering, routing and
//! toast display are left to the embedding UI; this crate hands it session
//! snapshots, access verdicts and notices.
//!
//! Notes
//! - The HTTP transport lives behind the [`AuthGateway`] and
//!   [`AdminGateway`] traits so controllers can be driven by stubs in tests.
//! - [`bootstrap()`] wires the production graph from a [`ClientConfig`].

pub mod app;
pub mod domains;
pub mod infrastructure;
pub mod logging;

pub use app::bootstrap::{App, ClientConfig, bootstrap, bootstrap_with};
pub use domains::auth::{
    AccessPolicy, AuthError, AuthResult, CredentialStore, FileCredentialStore,
    MemoryCredentialStore, RedirectTarget, Requirement, Session, SessionController,
    SessionStatus, SessionWatch, StorageError, Verdict,
};
pub use domains::user_management::{
    AdminError, AdminResult, CollectionView, FetchOutcome, SelectionSet,
    UserCollectionController,
};
pub use infrastructure::errors::{GatewayError, GatewayResult};
pub use infrastructure::services::{
    admin::{AdminGateway, HttpAdminGateway},
    auth::{AuthGateway, HttpAuthGateway},
    feedback::{
        AutoConfirm, ConfirmPrompt, Confirmation, LogNotifier, Notice, NoticeLevel, Notifier,
    },
};

pub use gatehouse_model as model;
