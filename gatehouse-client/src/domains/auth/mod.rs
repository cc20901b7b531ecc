//! Authentication domain
//!
//! Session state, the controller that owns it, route access decisions and
//! local credential persistence.

pub mod controller;
pub mod errors;
pub mod policy;
pub mod state_types;
pub mod storage;

pub use controller::SessionController;
pub use errors::{AuthError, AuthResult, StorageError};
pub use policy::{AccessPolicy, RedirectTarget, Requirement, Verdict, decide};
pub use state_types::{Session, SessionStatus, SessionStore, SessionWatch};
pub use storage::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
